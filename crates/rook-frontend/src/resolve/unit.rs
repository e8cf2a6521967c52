use std::collections::HashMap;

use rook_common::ir::{
    Instruction, LabelId, LabelInfo, LabelTable, Opcode, Operand, PhysReg, Reg, RegClass,
    RegInfo, RegName, RegisterTable, SymReg, Unit, UnitKind,
};
use rook_common::message::{Messages, Span};
use rook_common::names::{Actual, Name, Names, Path};

use crate::parse::tree::{Arg, ArgNode, Stmt, StmtNode};

#[derive(Clone, Debug)]
struct Declared {
    class: RegClass,
    span: Span,
    param: bool,
}

/// Resolves one allocation unit: assigns dense register indices in order of
/// first appearance, resolves label references, and checks operand classes.
pub(super) struct UnitResolver<'a> {
    names: &'a mut Names,
    globals: &'a HashMap<String, (RegClass, Span)>,
    msgs: Messages,
    kind: UnitKind,
    ctx: Name,

    registers: RegisterTable,
    labels: LabelTable,
    label_ids: HashMap<String, LabelId>,
    declared: HashMap<String, Declared>,
    assigned: HashMap<String, SymReg>,
    numbered: HashMap<(RegClass, u32), SymReg>,

    instructions: Vec<Instruction>,
}

impl<'a> UnitResolver<'a> {
    pub fn new(
        names: &'a mut Names,
        globals: &'a HashMap<String, (RegClass, Span)>,
        kind: UnitKind,
        ctx: Name,
    ) -> Self {
        Self {
            names,
            globals,
            msgs: Messages::new(),
            kind,
            ctx,

            registers: RegisterTable::new(),
            labels: LabelTable::new(),
            label_ids: HashMap::new(),
            declared: HashMap::new(),
            assigned: HashMap::new(),
            numbered: HashMap::new(),

            instructions: Vec::new(),
        }
    }

    /// Resolve the unit. A unit with any error produces no output; its
    /// diagnostics are merged into `out` either way.
    pub fn resolve(mut self, span: Span, stmts: Vec<Stmt>, out: &mut Messages) -> Option<Unit> {
        self.declare(&stmts);

        for stmt in &stmts {
            self.stmt(stmt);
        }

        let failed = self.msgs.has_errors();
        out.merge(self.msgs);

        (!failed).then(|| Unit {
            kind: self.kind,
            span,
            instructions: self.instructions,
            labels: self.labels,
            registers: self.registers,
        })
    }

    /// First pass: bind labels to instruction indices and record named
    /// register declarations, so both may be referenced before their
    /// defining statement.
    fn declare(&mut self, stmts: &[Stmt]) {
        let mut index = 0;

        for stmt in stmts {
            match &stmt.node {
                StmtNode::Label(name) => {
                    if let Some(id) = self.label_ids.get(name) {
                        let prev = self.labels.get(*id).span;
                        self.msgs.at(stmt.span).resolve_duplicate_label(name, prev);
                    } else {
                        let id = self.labels.add(LabelInfo {
                            name: name.clone(),
                            target: index,
                            span: stmt.span,
                        });
                        self.label_ids.insert(name.clone(), id);
                    }
                }

                StmtNode::Instruction { .. } => index += 1,

                StmtNode::Local { class, name }
                | StmtNode::Param { class, name }
                | StmtNode::Global { class, name } => {
                    let param = matches!(stmt.node, StmtNode::Param { .. });
                    self.declare_named(name, *class, stmt.span, param);
                }

                _ => {}
            }
        }
    }

    fn declare_named(&mut self, name: &str, class: RegClass, span: Span, param: bool) {
        if let Some(prev) = self.declared.get(name) {
            if prev.class != class {
                self.msgs
                    .at(span)
                    .resolve_register_class_mismatch(name, prev.class, class);
            } else {
                self.msgs.at(span).resolve_duplicate_register(name, prev.span);
            }
            return;
        }

        self.declared.insert(
            name.into(),
            Declared { class, span, param },
        );
    }

    fn stmt(&mut self, stmt: &Stmt) {
        match &stmt.node {
            StmtNode::Label(_) => {}

            StmtNode::Local { name, .. }
            | StmtNode::Param { name, .. }
            | StmtNode::Global { name, .. } => {
                if self.is_emit() {
                    self.msgs.at(stmt.span).resolve_directive_inside_emit();
                } else {
                    // Assign the register its index at the declaration site.
                    self.named(name, stmt.span);
                }
            }

            StmtNode::Instruction { opcode, args } => {
                self.instruction(*opcode, args, stmt.span)
            }

            StmtNode::Sub(_)
            | StmtNode::End
            | StmtNode::Namespace(_)
            | StmtNode::Class(_)
            | StmtNode::EndClass
            | StmtNode::Emit
            | StmtNode::Eom => {
                if self.is_emit() {
                    self.msgs.at(stmt.span).resolve_directive_inside_emit();
                } else {
                    self.msgs.at(stmt.span).resolve_stray_directive(directive_name(&stmt.node));
                }
            }

            // Macros never survive expansion.
            StmtNode::MacroDef { .. } | StmtNode::MacroCall { .. } => {
                self.msgs.at(stmt.span).resolve_stray_directive(".macro");
            }
        }
    }

    fn instruction(&mut self, opcode: Opcode, args: &[Arg], span: Span) {
        let operands = match opcode {
            Opcode::Goto => self.shape(args, &[Shape::Label]),
            Opcode::If | Opcode::Unless => self.shape(args, &[Shape::Value, Shape::Label]),
            Opcode::IfCmp(_) => self.shape(args, &[Shape::Value, Shape::Value, Shape::Label]),
            Opcode::Call => self.shape(args, &[Shape::Name]),
            Opcode::New => self.shape(args, &[Shape::Value, Shape::Name]),
            Opcode::Addr => self.shape(args, &[Shape::Value, Shape::Label]),
            _ => self.shape(args, &vec![Shape::Value; args.len()]),
        };

        let operands = match operands {
            Some(operands) => operands,
            None => return,
        };

        self.check_classes(opcode, &operands, span);

        self.instructions
            .push(Instruction::new(opcode, operands, span));
    }

    fn shape(&mut self, args: &[Arg], shapes: &[Shape]) -> Option<Vec<Operand>> {
        debug_assert_eq!(args.len(), shapes.len());

        let mut operands = Vec::with_capacity(args.len());
        let mut failed = false;

        for (arg, shape) in args.iter().zip(shapes) {
            let operand = match shape {
                Shape::Value => self.value(arg),
                Shape::Label => self.label_ref(arg),
                Shape::Name => self.name_ref(arg),
            };

            match operand {
                Some(operand) => operands.push(operand),
                None => failed = true,
            }
        }

        (!failed).then_some(operands)
    }

    fn value(&mut self, arg: &Arg) -> Option<Operand> {
        match &arg.node {
            ArgNode::Sym(class, index) => {
                if self.is_emit() {
                    self.msgs.at(arg.span).resolve_symbolic_inside_emit();
                    return None;
                }

                let reg = self.numbered(*class, *index, arg.span);
                Some(Operand::Reg(Reg::Symbolic(reg)))
            }

            ArgNode::Phys(class, index) => {
                if !self.is_emit() {
                    self.msgs.at(arg.span).resolve_physical_outside_emit();
                    return None;
                }

                Some(Operand::Reg(Reg::Physical(PhysReg {
                    class: *class,
                    index: *index as usize,
                })))
            }

            ArgNode::Ident(name) => {
                if self.is_emit() {
                    self.msgs.at(arg.span).resolve_symbolic_inside_emit();
                    return None;
                }

                let reg = self.named(name, arg.span)?;
                Some(Operand::Reg(Reg::Symbolic(reg)))
            }

            ArgNode::Int(value) => Some(Operand::Int(*value)),
            ArgNode::Num(value) => Some(Operand::Num(*value)),
            ArgNode::Str(value) => Some(Operand::Str(value.clone())),
        }
    }

    fn label_ref(&mut self, arg: &Arg) -> Option<Operand> {
        match &arg.node {
            ArgNode::Ident(name) => match self.label_ids.get(name) {
                Some(id) => Some(Operand::Label(*id)),
                None => {
                    self.msgs.at(arg.span).resolve_undefined_label(name);
                    None
                }
            },

            _ => {
                self.msgs.at(arg.span).resolve_expected_symbol("a label name");
                None
            }
        }
    }

    fn name_ref(&mut self, arg: &Arg) -> Option<Operand> {
        match &arg.node {
            ArgNode::Ident(name) => {
                let name = self
                    .names
                    .add(arg.span, Path::new(self.ctx, Actual::Lit(name.clone())));
                Some(Operand::Name(name))
            }

            _ => {
                self.msgs.at(arg.span).resolve_expected_symbol("a name");
                None
            }
        }
    }

    /// Look up a numbered register like `$I3`, introducing it on first sight.
    fn numbered(&mut self, class: RegClass, index: u32, span: Span) -> SymReg {
        *self
            .numbered
            .entry((class, index))
            .or_insert_with(|| {
                self.registers.add(
                    class,
                    RegInfo {
                        name: RegName::Numbered(index),
                        span,
                        param: false,
                        spillable: true,
                    },
                )
            })
    }

    /// Look up a named register, assigning its dense index on first sight.
    fn named(&mut self, name: &str, span: Span) -> Option<SymReg> {
        if let Some(reg) = self.assigned.get(name) {
            return Some(*reg);
        }

        let (class, decl_span, param) = if let Some(decl) = self.declared.get(name) {
            (decl.class, decl.span, decl.param)
        } else if let Some((class, decl_span)) = self.globals.get(name) {
            (*class, *decl_span, false)
        } else {
            self.msgs.at(span).resolve_undefined_register(name);
            return None;
        };

        let reg = self.registers.add(
            class,
            RegInfo {
                name: RegName::Named(name.into()),
                span: decl_span,
                param,
                spillable: true,
            },
        );

        self.assigned.insert(name.into(), reg);
        Some(reg)
    }

    fn check_classes(&mut self, opcode: Opcode, operands: &[Operand], span: Span) {
        match opcode {
            Opcode::Add
            | Opcode::Sub
            | Opcode::Mul
            | Opcode::Div
            | Opcode::Mod
            | Opcode::Pow => {
                let Some(dst) = self.dst_reg(operands, span) else { return };

                if !matches!(dst.class(), RegClass::Int | RegClass::Num) {
                    self.msgs
                        .at(span)
                        .resolve_operand_class_mismatch("an int or num destination");
                    return;
                }

                self.check_values(&operands[1..], dst.class(), span);
            }

            Opcode::And
            | Opcode::Or
            | Opcode::Xor
            | Opcode::Not
            | Opcode::Shl
            | Opcode::Shr => {
                let Some(dst) = self.dst_reg(operands, span) else { return };

                if dst.class() != RegClass::Int {
                    self.msgs
                        .at(span)
                        .resolve_operand_class_mismatch("an int destination");
                    return;
                }

                self.check_values(&operands[1..], RegClass::Int, span);
            }

            Opcode::Inc | Opcode::Dec => {
                let Some(dst) = self.dst_reg(operands, span) else { return };

                if dst.class() != RegClass::Int {
                    self.msgs
                        .at(span)
                        .resolve_operand_class_mismatch("an int register");
                }
            }

            Opcode::Set => {
                let Some(dst) = self.dst_reg(operands, span) else { return };
                self.check_values(&operands[1..], dst.class(), span);
            }

            Opcode::New | Opcode::Addr => {
                let Some(dst) = self.dst_reg(operands, span) else { return };

                if dst.class() != RegClass::Obj {
                    self.msgs
                        .at(span)
                        .resolve_operand_class_mismatch("an obj destination");
                }
            }

            Opcode::Clone => {
                let Some(dst) = self.dst_reg(operands, span) else { return };

                if dst.class() != RegClass::Obj {
                    self.msgs
                        .at(span)
                        .resolve_operand_class_mismatch("an obj destination");
                    return;
                }

                self.check_values(&operands[1..], RegClass::Obj, span);
            }

            Opcode::Defined => {
                let Some(dst) = self.dst_reg(operands, span) else { return };

                if dst.class() != RegClass::Int {
                    self.msgs
                        .at(span)
                        .resolve_operand_class_mismatch("an int destination");
                }
            }

            Opcode::IfCmp(_) => {
                if let (Some(Operand::Reg(left)), Some(Operand::Reg(right))) =
                    (operands.first(), operands.get(1))
                {
                    if left.class() != right.class() {
                        self.msgs.at(span).resolve_operand_class_mismatch(
                            "operands of the same class",
                        );
                    }
                }
            }

            Opcode::Result | Opcode::Pop => {
                let _ = self.dst_reg(operands, span);
            }

            _ => {}
        }
    }

    fn dst_reg(&mut self, operands: &[Operand], span: Span) -> Option<Reg> {
        match operands.first() {
            Some(Operand::Reg(reg)) => Some(*reg),
            _ => {
                self.msgs
                    .at(span)
                    .resolve_expected_symbol("a destination register");
                None
            }
        }
    }

    fn check_values(&mut self, operands: &[Operand], class: RegClass, span: Span) {
        for operand in operands {
            if !value_matches(operand, class) {
                self.msgs
                    .at(span)
                    .resolve_operand_class_mismatch(&format!("a {class} value"));
            }
        }
    }

    fn is_emit(&self) -> bool {
        matches!(self.kind, UnitKind::Emit)
    }
}

#[derive(Clone, Copy)]
enum Shape {
    Value,
    Label,
    Name,
}

fn value_matches(operand: &Operand, class: RegClass) -> bool {
    match operand {
        Operand::Reg(reg) => reg.class() == class,
        Operand::Int(_) => matches!(class, RegClass::Int | RegClass::Num),
        Operand::Num(_) => class == RegClass::Num,
        Operand::Str(_) => class == RegClass::Str,
        _ => false,
    }
}

fn directive_name(node: &StmtNode) -> &'static str {
    match node {
        StmtNode::Sub(_) => ".sub",
        StmtNode::End => ".end",
        StmtNode::Namespace(_) => ".namespace",
        StmtNode::Class(_) => ".class",
        StmtNode::EndClass => ".endclass",
        StmtNode::Emit => ".emit",
        StmtNode::Eom => ".eom",
        _ => ".macro",
    }
}
