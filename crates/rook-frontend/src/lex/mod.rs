mod convert;
mod token;

#[cfg(test)]
mod tests;

use log::{info, trace};
use logos::Logos;

use rook_common::ir::{RegClass, Relop};
use rook_common::message::{File, Messages, Span};
use rook_common::Driver;

use convert::{parse_dec, parse_float, parse_reg, unescape};
use token::FreeToken;

#[derive(Clone, Debug, PartialEq)]
pub enum Token {
    Sub,
    End,
    Namespace,
    Class,
    EndClass,
    Local,
    SymDecl,
    Param,
    Global,
    Arg,
    Result,
    Return,
    Macro,
    Endm,
    Emit,
    Eom,
    MacroName(String),

    Comma,
    Colon,
    LParen,
    RParen,
    Eol,

    Relop(Relop),

    SymReg(RegClass, u32),
    PhysReg(RegClass, u32),
    Name(String),
    Int(i64),
    Num(f64),
    Str(String),

    Invalid,
}

pub fn lex(driver: &mut impl Driver, src: impl AsRef<str>, file: File) -> Vec<(Token, Span)> {
    info!("lexing file with id {file}");
    let mut lexer = Lexer::new(src.as_ref(), file);
    lexer.lex();
    driver.report(lexer.msgs);
    trace!("done lexing {file}");
    lexer.res
}

struct Lexer<'src> {
    lex: logos::SpannedIter<'src, FreeToken<'src>>,
    file: File,
    res: Vec<(Token, Span)>,
    msgs: Messages,
}

impl<'src> Lexer<'src> {
    fn new(src: &'src str, file: File) -> Self {
        Self {
            lex: FreeToken::lexer(src).spanned(),
            file,
            res: Vec::new(),
            msgs: Messages::new(),
        }
    }

    fn lex(&mut self) {
        while self.dispatch() {}
    }

    fn dispatch(&mut self) -> bool {
        if let Some((tok, span)) = self.lex.next() {
            let span = Span::new(self.file, span.start, span.end);
            let tok = match tok {
                FreeToken::Sub => Token::Sub,
                FreeToken::End => Token::End,
                FreeToken::Namespace => Token::Namespace,
                FreeToken::Class => Token::Class,
                FreeToken::EndClass => Token::EndClass,
                FreeToken::Local => Token::Local,
                FreeToken::Sym => Token::SymDecl,
                FreeToken::Param => Token::Param,
                FreeToken::Global => Token::Global,
                FreeToken::Arg => Token::Arg,
                FreeToken::Result => Token::Result,
                FreeToken::Return => Token::Return,
                FreeToken::Macro => Token::Macro,
                FreeToken::Endm => Token::Endm,
                FreeToken::Emit => Token::Emit,
                FreeToken::Eom => Token::Eom,
                FreeToken::MacroName(name) => Token::MacroName(name.into()),

                FreeToken::Comma => Token::Comma,
                FreeToken::Colon => Token::Colon,
                FreeToken::LParen => Token::LParen,
                FreeToken::RParen => Token::RParen,

                FreeToken::EqEq => Token::Relop(Relop::Eq),
                FreeToken::BangEq => Token::Relop(Relop::Ne),
                FreeToken::Lt => Token::Relop(Relop::Lt),
                FreeToken::LtEq => Token::Relop(Relop::Le),
                FreeToken::Gt => Token::Relop(Relop::Gt),
                FreeToken::GtEq => Token::Relop(Relop::Ge),

                FreeToken::SymReg(text) => {
                    let (class, index) = parse_reg(text);
                    Token::SymReg(class, index)
                }

                FreeToken::PhysReg(text) => {
                    let (class, index) = parse_reg(text);
                    Token::PhysReg(class, index)
                }

                FreeToken::Name(name) => Token::Name(name.into()),
                FreeToken::Float(num) => Token::Num(parse_float(num)),
                FreeToken::DecNumber(num) => Token::Int(parse_dec(num)),
                FreeToken::Str(text) => Token::Str(unescape(text)),

                FreeToken::UnterminatedStr => {
                    self.msgs.at(span).lex_unterminated_string();
                    Token::Invalid
                }

                FreeToken::Newline => {
                    // Blank lines collapse into a single statement break.
                    if matches!(self.res.last(), Some((Token::Eol, _)) | None) {
                        return true;
                    }

                    Token::Eol
                }

                FreeToken::Error => {
                    self.msgs.at(span).lex_invalid();
                    Token::Invalid
                }
            };

            self.res.push((tok, span));

            true
        } else {
            false
        }
    }
}
