use logos::Logos;

#[derive(Logos, Debug)]
pub enum FreeToken<'src> {
    #[token(".sub")]
    Sub,

    #[token(".end")]
    End,

    #[token(".namespace")]
    Namespace,

    #[token(".class")]
    Class,

    #[token(".endclass")]
    EndClass,

    #[token(".local")]
    Local,

    #[token(".sym")]
    Sym,

    #[token(".param")]
    Param,

    #[token(".global")]
    Global,

    #[token(".arg")]
    Arg,

    #[token(".result")]
    Result,

    #[token(".return")]
    Return,

    #[token(".macro")]
    Macro,

    #[token(".endm")]
    Endm,

    #[token(".emit")]
    Emit,

    #[token(".eom")]
    Eom,

    #[regex(r"\.[a-zA-Z_][a-zA-Z0-9_]*", |lex| &lex.slice()[1..])]
    MacroName(&'src str),

    #[token(",")]
    Comma,

    #[token(":")]
    Colon,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token("==")]
    EqEq,

    #[token("!=")]
    BangEq,

    #[token("<")]
    Lt,

    #[token("<=")]
    LtEq,

    #[token(">")]
    Gt,

    #[token(">=")]
    GtEq,

    #[regex(r"\$[INSP][0-9]+")]
    SymReg(&'src str),

    #[regex(r"[INSP][0-9]+", priority = 3)]
    PhysReg(&'src str),

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Name(&'src str),

    #[regex(r"-?[0-9]+\.[0-9]+([eE][+-]?[0-9]+)?")]
    Float(&'src str),

    #[regex(r"-?[0-9]+")]
    DecNumber(&'src str),

    #[regex(r#""([^"\\\n]|\\.)*""#)]
    Str(&'src str),

    #[regex(r#""([^"\\\n]|\\.)*"#)]
    UnterminatedStr,

    #[regex(r"\r?\n")]
    Newline,

    #[error]
    #[regex(r"[ \t\v\f]+", logos::skip)]
    #[regex(r"#[^\n]*", logos::skip)]
    Error,
}
