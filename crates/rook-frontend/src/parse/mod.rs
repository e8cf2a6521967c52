pub mod tree;

mod matcher;
mod stmt;

#[cfg(test)]
mod tests;

use log::{info, trace};

use rook_common::message::{File, Messages, Span};
use rook_common::Driver;

use crate::lex::Token;
use matcher::Matcher;
use tree::Stmt;

pub fn parse(
    driver: &mut impl Driver,
    tokens: impl IntoIterator<Item = (Token, Span)>,
    file: File,
) -> Vec<Stmt> {
    info!("parsing file with id {file}");

    let mut parser = Parser::new(tokens, file);
    let stmts = parser.parse_program();

    driver.report(parser.msgs);

    trace!("done parsing file {file}");

    stmts
}

#[derive(Debug)]
struct Parser<I> {
    tokens: I,
    curr: Option<(Token, Span)>,
    prev: Option<(Token, Span)>,
    msgs: Messages,
    default_span: Span,
}

impl<I> Parser<I>
where
    I: Iterator<Item = (Token, Span)>,
{
    pub fn new<In>(tokens: In, file: File) -> Self
    where
        In: IntoIterator<Item = (Token, Span), IntoIter = I>,
    {
        let mut parser = Self {
            tokens: tokens.into_iter(),

            curr: None,
            prev: None,

            msgs: Messages::new(),
            default_span: Span::new(file, 0, 0),
        };

        parser.advance();
        parser
    }

    fn is_done(&self) -> bool {
        self.curr.is_none()
    }

    fn advance(&mut self) {
        self.prev = self.curr.take();
        if let Some(curr) = self.tokens.next() {
            self.curr = Some(curr);
        }
    }

    fn peek(&self, matcher: impl Matcher) -> bool {
        self.curr
            .as_ref()
            .map(|(tok, _)| matcher.matches(tok))
            .unwrap_or(false)
    }

    fn consume(&mut self, matcher: impl Matcher) -> bool {
        if self.peek(matcher) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn matches(&mut self, matcher: impl Matcher) -> Option<Span> {
        if self.peek(matcher) {
            self.advance();
            self.prev.as_ref().map(|(_, span)| *span)
        } else {
            None
        }
    }

    fn curr_span(&self) -> Span {
        self.curr
            .as_ref()
            .map(|(_, span)| *span)
            .or_else(|| self.prev.as_ref().map(|(_, span)| *span))
            .unwrap_or(self.default_span)
    }
}
