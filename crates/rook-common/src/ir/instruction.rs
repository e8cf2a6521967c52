use std::fmt;

use crate::message::Span;
use crate::names::Name;

use super::register::{Reg, SymReg};
use super::unit::LabelId;

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Relop {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl fmt::Display for Relop {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Eq => write!(f, "=="),
            Self::Ne => write!(f, "!="),
            Self::Lt => write!(f, "<"),
            Self::Le => write!(f, "<="),
            Self::Gt => write!(f, ">"),
            Self::Ge => write!(f, ">="),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Opcode {
    Set,

    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,

    And,
    Or,
    Xor,
    Not,
    Shl,
    Shr,

    Inc,
    Dec,

    Goto,
    /// Truthiness branch: `if REG goto LABEL`.
    If,
    /// Inverted truthiness branch: `unless REG goto LABEL`.
    Unless,
    /// Comparison branch: `if A OP B goto LABEL`.
    IfCmp(Relop),

    Call,
    /// `.arg VALUE`: push an outgoing call argument.
    Arg,
    /// `.result REG`: fetch the last call's result.
    Result,
    Ret,
    /// `.return VALUE`: return with a value.
    Return,
    End,

    Print,
    Push,
    Pop,
    SaveAll,
    RestoreAll,

    New,
    Clone,
    Addr,
    Defined,

    /// Spill reload, inserted by the rewriter. Operands: register, slot.
    Load,
    /// Spill store, inserted by the rewriter. Operands: register, slot.
    Store,
}

impl Opcode {
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Self::Set => "set",
            Self::Add => "add",
            Self::Sub => "sub",
            Self::Mul => "mul",
            Self::Div => "div",
            Self::Mod => "mod",
            Self::Pow => "pow",
            Self::And => "and",
            Self::Or => "or",
            Self::Xor => "xor",
            Self::Not => "not",
            Self::Shl => "shl",
            Self::Shr => "shr",
            Self::Inc => "inc",
            Self::Dec => "dec",
            Self::Goto => "goto",
            Self::If | Self::IfCmp(_) => "if",
            Self::Unless => "unless",
            Self::Call => "call",
            Self::Arg => ".arg",
            Self::Result => ".result",
            Self::Ret => "ret",
            Self::Return => ".return",
            Self::End => "end",
            Self::Print => "print",
            Self::Push => "push",
            Self::Pop => "pop",
            Self::SaveAll => "saveall",
            Self::RestoreAll => "restoreall",
            Self::New => "new",
            Self::Clone => "clone",
            Self::Addr => "addr",
            Self::Defined => "defined",
            Self::Load => "load",
            Self::Store => "store",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Operand {
    Reg(Reg),
    Int(i64),
    Num(f64),
    Str(String),
    Label(LabelId),
    /// A call target or type name.
    Name(Name),
    /// A spill slot index within the unit's frame.
    Slot(usize),
}

impl Operand {
    pub fn reg(&self) -> Option<Reg> {
        match self {
            Self::Reg(reg) => Some(*reg),
            _ => None,
        }
    }

    pub fn sym(&self) -> Option<SymReg> {
        self.reg().and_then(|reg| reg.sym())
    }
}

/// How control leaves an instruction.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Flow {
    /// Execution continues with the next instruction.
    Fallthrough,
    /// Unconditional jump.
    Jump(LabelId),
    /// Conditional branch: fall through or take the label.
    Branch(LabelId),
    /// Execution stops here (return or halt).
    Stop,
}

#[derive(Clone, Debug)]
pub struct Instruction {
    pub opcode: Opcode,
    pub operands: Vec<Operand>,
    pub span: Span,
}

impl Instruction {
    pub fn new(opcode: Opcode, operands: Vec<Operand>, span: Span) -> Self {
        Self {
            opcode,
            operands,
            span,
        }
    }

    /// The register this instruction writes, if any.
    pub fn def(&self) -> Option<Reg> {
        match self.opcode {
            Opcode::Set
            | Opcode::Add
            | Opcode::Sub
            | Opcode::Mul
            | Opcode::Div
            | Opcode::Mod
            | Opcode::Pow
            | Opcode::And
            | Opcode::Or
            | Opcode::Xor
            | Opcode::Not
            | Opcode::Shl
            | Opcode::Shr
            | Opcode::Inc
            | Opcode::Dec
            | Opcode::Result
            | Opcode::Pop
            | Opcode::New
            | Opcode::Clone
            | Opcode::Addr
            | Opcode::Defined
            | Opcode::Load => self.operands.first().and_then(Operand::reg),

            Opcode::Goto
            | Opcode::If
            | Opcode::Unless
            | Opcode::IfCmp(_)
            | Opcode::Call
            | Opcode::Arg
            | Opcode::Ret
            | Opcode::Return
            | Opcode::End
            | Opcode::Print
            | Opcode::Push
            | Opcode::SaveAll
            | Opcode::RestoreAll
            | Opcode::Store => None,
        }
    }

    /// The registers this instruction reads, in operand order.
    pub fn uses(&self) -> Vec<Reg> {
        let operands: &[Operand] = match self.opcode {
            // First operand is a pure destination.
            Opcode::Set
            | Opcode::Add
            | Opcode::Sub
            | Opcode::Mul
            | Opcode::Div
            | Opcode::Mod
            | Opcode::Pow
            | Opcode::And
            | Opcode::Or
            | Opcode::Xor
            | Opcode::Not
            | Opcode::Shl
            | Opcode::Shr
            | Opcode::New
            | Opcode::Clone
            | Opcode::Addr
            | Opcode::Defined
            | Opcode::Load => &self.operands[1..],

            // Read-modify-write: the destination is also a use.
            Opcode::Inc | Opcode::Dec => &self.operands,

            Opcode::If
            | Opcode::Unless
            | Opcode::IfCmp(_)
            | Opcode::Arg
            | Opcode::Return
            | Opcode::Print
            | Opcode::Push
            | Opcode::Store => &self.operands,

            Opcode::Goto
            | Opcode::Call
            | Opcode::Result
            | Opcode::Ret
            | Opcode::End
            | Opcode::Pop
            | Opcode::SaveAll
            | Opcode::RestoreAll => &[],
        };

        operands.iter().filter_map(Operand::reg).collect()
    }

    pub fn flow(&self) -> Flow {
        match self.opcode {
            Opcode::Goto => match self.operands.first() {
                Some(Operand::Label(label)) => Flow::Jump(*label),
                _ => Flow::Fallthrough,
            },

            Opcode::If | Opcode::Unless | Opcode::IfCmp(_) => {
                match self.operands.last() {
                    Some(Operand::Label(label)) => Flow::Branch(*label),
                    _ => Flow::Fallthrough,
                }
            }

            Opcode::Ret | Opcode::Return | Opcode::End => Flow::Stop,

            _ => Flow::Fallthrough,
        }
    }

    pub fn is_call(&self) -> bool {
        matches!(self.opcode, Opcode::Call)
    }
}
