use crate::lex::Token;

pub trait Matcher {
    fn matches(&self, tok: &Token) -> bool;
}

impl Matcher for Token {
    fn matches(&self, tok: &Token) -> bool {
        match (self, tok) {
            (_, Token::Invalid) => true,
            (Token::Name(..), Token::Name(..)) => true,
            (Token::MacroName(..), Token::MacroName(..)) => true,
            (Token::Int(..), Token::Int(..)) => true,
            (Token::Num(..), Token::Num(..)) => true,
            (Token::Str(..), Token::Str(..)) => true,
            (Token::SymReg(..), Token::SymReg(..)) => true,
            (Token::PhysReg(..), Token::PhysReg(..)) => true,
            (Token::Relop(..), Token::Relop(..)) => true,
            (t, u) => t == u,
        }
    }
}

impl Matcher for &[Token] {
    fn matches(&self, tok: &Token) -> bool {
        self.iter().any(|other| other.matches(tok))
    }
}

impl<F: Fn(&Token) -> bool> Matcher for F {
    fn matches(&self, tok: &Token) -> bool {
        self(tok)
    }
}
