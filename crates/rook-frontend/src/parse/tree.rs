use rook_common::ir::{Opcode, RegClass};
use rook_common::message::Span;

#[derive(Clone, Debug, PartialEq)]
pub struct Stmt {
    pub node: StmtNode,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub enum StmtNode {
    /// `NAME:` at statement start.
    Label(String),

    /// An opcode with its raw operands. Branch targets, call targets, and
    /// named registers are all still [`Arg::Ident`]s at this point.
    Instruction { opcode: Opcode, args: Vec<Arg> },

    Sub(String),
    End,
    Namespace(String),
    Class(String),
    EndClass,

    /// `.local` and its `.sym` synonym.
    Local { class: RegClass, name: String },
    Param { class: RegClass, name: String },
    Global { class: RegClass, name: String },

    MacroDef {
        name: String,
        params: Vec<String>,
        body: Vec<Stmt>,
    },
    MacroCall { name: String, args: Vec<Arg> },

    Emit,
    Eom,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Arg {
    pub node: ArgNode,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ArgNode {
    Sym(RegClass, u32),
    Phys(RegClass, u32),
    Ident(String),
    Int(i64),
    Num(f64),
    Str(String),
}
