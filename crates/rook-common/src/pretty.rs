use pretty::{Arena, DocAllocator, DocBuilder};

use crate::ir::{
    Instruction, Opcode, Operand, Program, Reg, RegName, SymReg, Unit, UnitKind,
};
use crate::names::{Actual, Name, Names, Path};

pub struct Prettier<'a> {
    names: &'a Names,
    allocator: Arena<'a>,
    width: usize,
}

impl<'a> Prettier<'a> {
    pub fn new(names: &'a Names) -> Self {
        Self {
            names,
            allocator: Arena::new(),
            width: 80,
        }
    }

    pub fn with_width(self, width: usize) -> Self {
        Self { width, ..self }
    }

    #[must_use]
    pub fn pretty_program(&'a self, program: &Program) -> String {
        let doc = self.allocator.intersperse(
            program.units.iter().map(|unit| self.doc_unit(unit)),
            self.allocator.hardline(),
        );

        let mut res = Vec::new();
        doc.render(self.width, &mut res).unwrap();
        String::from_utf8(res).unwrap()
    }

    #[must_use]
    pub fn pretty_unit(&'a self, unit: &Unit) -> String {
        let doc = self.doc_unit(unit);
        let mut res = Vec::new();
        doc.render(self.width, &mut res).unwrap();
        String::from_utf8(res).unwrap()
    }

    #[must_use]
    pub fn pretty_name(&'a self, name: &Name) -> String {
        let doc = self.doc_name(name);
        let mut res = Vec::new();
        doc.render(self.width, &mut res).unwrap();
        String::from_utf8(res).unwrap()
    }

    fn doc_unit(&'a self, unit: &Unit) -> DocBuilder<Arena<'a>> {
        let header = match unit.kind {
            UnitKind::Sub(name) => self
                .allocator
                .text(".sub ")
                .append(self.doc_name(&name)),
            UnitKind::TopLevel => self.allocator.text("# top level"),
            UnitKind::Emit => self.allocator.text(".emit"),
        };

        let footer = match unit.kind {
            UnitKind::Sub(_) => ".end",
            UnitKind::TopLevel => "# end top level",
            UnitKind::Emit => ".eom",
        };

        let mut lines = Vec::new();
        for (index, instruction) in unit.instructions.iter().enumerate() {
            for (_, info) in unit.labels.iter().filter(|(_, info)| info.target == index) {
                lines.push(self.allocator.text(format!("{}:", info.name)));
            }

            lines.push(
                self.allocator
                    .text("  ")
                    .append(self.doc_instruction(unit, instruction)),
            );
        }

        let end = unit.instructions.len();
        for (_, info) in unit.labels.iter().filter(|(_, info)| info.target == end) {
            lines.push(self.allocator.text(format!("{}:", info.name)));
        }

        header
            .append(self.allocator.hardline())
            .append(
                self.allocator
                    .intersperse(lines, self.allocator.hardline()),
            )
            .append(self.allocator.hardline())
            .append(self.allocator.text(footer))
            .append(self.allocator.hardline())
    }

    fn doc_instruction(
        &'a self,
        unit: &Unit,
        instruction: &Instruction,
    ) -> DocBuilder<Arena<'a>> {
        let mnemonic = self.allocator.text(instruction.opcode.mnemonic());

        if instruction.operands.is_empty() {
            return mnemonic;
        }

        // Branches read back as surface syntax rather than operand lists.
        match instruction.opcode {
            Opcode::If | Opcode::Unless => {
                let cond = self.doc_operand(unit, &instruction.operands[0]);
                let target = self.doc_operand(unit, &instruction.operands[1]);
                return mnemonic
                    .append(self.allocator.space())
                    .append(cond)
                    .append(self.allocator.text(" goto "))
                    .append(target);
            }

            Opcode::IfCmp(op) => {
                let left = self.doc_operand(unit, &instruction.operands[0]);
                let right = self.doc_operand(unit, &instruction.operands[1]);
                let target = self.doc_operand(unit, &instruction.operands[2]);
                return mnemonic
                    .append(self.allocator.space())
                    .append(left)
                    .append(self.allocator.text(format!(" {op} ")))
                    .append(right)
                    .append(self.allocator.text(" goto "))
                    .append(target);
            }

            _ => {}
        }

        mnemonic.append(self.allocator.space()).append(
            self.allocator.intersperse(
                instruction
                    .operands
                    .iter()
                    .map(|operand| self.doc_operand(unit, operand)),
                self.allocator.text(", "),
            ),
        )
    }

    fn doc_operand(&'a self, unit: &Unit, operand: &Operand) -> DocBuilder<Arena<'a>> {
        match operand {
            Operand::Reg(Reg::Symbolic(reg)) => self.doc_sym_reg(unit, *reg),
            Operand::Reg(Reg::Physical(reg)) => self
                .allocator
                .text(format!("{}{}", reg.class.prefix(), reg.index)),
            Operand::Int(value) => self.allocator.text(format!("{value}")),
            Operand::Num(value) => self.allocator.text(format!("{value:?}")),
            Operand::Str(value) => self.allocator.text(format!("{value:?}")),
            Operand::Label(id) => self.allocator.text(unit.labels.get(*id).name.clone()),
            Operand::Name(name) => self.doc_name(name),
            Operand::Slot(slot) => self.allocator.text(format!("[{slot}]")),
        }
    }

    fn doc_sym_reg(&'a self, unit: &Unit, reg: SymReg) -> DocBuilder<Arena<'a>> {
        let prefix = reg.class.prefix();
        match &unit.registers.get(reg).name {
            RegName::Numbered(index) => self.allocator.text(format!("${prefix}{index}")),
            RegName::Named(name) => self.allocator.text(name.clone()),
            RegName::Temp(id) => self.allocator.text(format!("${prefix}.t{id}")),
        }
    }

    fn doc_name(&'a self, name: &Name) -> DocBuilder<Arena<'a>> {
        let Path(ctx, actual) = self.names.get_path(name);

        let actual = match actual {
            Actual::Root => self.allocator.text("<root>"),
            Actual::Lit(lit) => self.allocator.text(lit.clone()),
        };

        match ctx {
            Some(ctx) if !matches!(self.names.get_path(ctx), Path(None, Actual::Root)) => self
                .doc_name(ctx)
                .append(self.allocator.text("."))
                .append(actual),
            _ => actual,
        }
    }
}
