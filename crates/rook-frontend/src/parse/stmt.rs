use rook_common::ir::{Opcode, RegClass, Relop};
use rook_common::message::Span;

use super::tree::{Arg, ArgNode, Stmt, StmtNode};
use super::Parser;
use crate::lex::Token;

impl<I> Parser<I>
where
    I: Iterator<Item = (Token, Span)>,
{
    /// ```abnf
    /// prog = *(stmt EOL)
    /// ```
    pub fn parse_program(&mut self) -> Vec<Stmt> {
        let mut stmts = vec![];

        while !self.is_done() {
            if self.consume(Token::Eol) {
                continue;
            }

            match self.stmt() {
                Some(stmt) => {
                    // A label may share its line with the instruction it
                    // precedes.
                    let is_label = matches!(stmt.node, StmtNode::Label(_));
                    stmts.push(stmt);

                    if is_label {
                        continue;
                    }

                    if !self.is_done() && !self.peek(Token::Eol) {
                        let span = self.curr_span();
                        self.msgs.at(span).parse_expected_end_of_statement();
                        self.recover();
                    }
                }

                None => self.recover(),
            }
        }

        stmts
    }

    /// Skip to the start of the next line.
    fn recover(&mut self) {
        while !self.is_done() && !self.consume(Token::Eol) {
            self.advance();
        }
    }

    /// ```abnf
    /// stmt  = label / instruction / directive
    /// label = NAME ":"
    /// ```
    fn stmt(&mut self) -> Option<Stmt> {
        let (tok, span) = self.curr.clone()?;

        match tok {
            Token::Sub => {
                self.advance();
                let name = self.name()?;
                Some(self.close(StmtNode::Sub(name), span))
            }

            Token::End => {
                self.advance();
                Some(self.close(StmtNode::End, span))
            }

            Token::Namespace => {
                self.advance();
                let name = self.name()?;
                Some(self.close(StmtNode::Namespace(name), span))
            }

            Token::Class => {
                self.advance();
                let name = self.name()?;
                Some(self.close(StmtNode::Class(name), span))
            }

            Token::EndClass => {
                self.advance();
                Some(self.close(StmtNode::EndClass, span))
            }

            Token::Local | Token::SymDecl => {
                self.advance();
                let class = self.reg_class()?;
                let name = self.name()?;
                Some(self.close(StmtNode::Local { class, name }, span))
            }

            Token::Param => {
                self.advance();
                let class = self.reg_class()?;
                let name = self.name()?;
                Some(self.close(StmtNode::Param { class, name }, span))
            }

            Token::Global => {
                self.advance();
                let class = self.reg_class()?;
                let name = self.name()?;
                Some(self.close(StmtNode::Global { class, name }, span))
            }

            Token::Arg => {
                self.advance();
                let args = vec![self.arg()?];
                Some(self.close(
                    StmtNode::Instruction {
                        opcode: Opcode::Arg,
                        args,
                    },
                    span,
                ))
            }

            Token::Result => {
                self.advance();
                let args = vec![self.arg()?];
                Some(self.close(
                    StmtNode::Instruction {
                        opcode: Opcode::Result,
                        args,
                    },
                    span,
                ))
            }

            Token::Return => {
                self.advance();
                let args = vec![self.arg()?];
                Some(self.close(
                    StmtNode::Instruction {
                        opcode: Opcode::Return,
                        args,
                    },
                    span,
                ))
            }

            Token::Macro => self.macro_def(span),

            Token::MacroName(name) => {
                self.advance();
                self.macro_call(name, span)
            }

            Token::Emit => {
                self.advance();
                Some(self.close(StmtNode::Emit, span))
            }

            Token::Eom => {
                self.advance();
                Some(self.close(StmtNode::Eom, span))
            }

            Token::Name(name) => {
                self.advance();

                if self.consume(Token::Colon) {
                    Some(self.close(StmtNode::Label(name), span))
                } else {
                    self.instruction(name, span)
                }
            }

            _ => {
                self.msgs.at(span).parse_not_a_statement();
                None
            }
        }
    }

    /// ```abnf
    /// instruction = OPCODE [operand *("," operand)]
    /// instruction =/ branch
    /// ```
    fn instruction(&mut self, name: String, span: Span) -> Option<Stmt> {
        let (opcode, arity) = match name.as_str() {
            "set" => (Opcode::Set, 2),

            "add" => (Opcode::Add, 3),
            "sub" => (Opcode::Sub, 3),
            "mul" => (Opcode::Mul, 3),
            "div" => (Opcode::Div, 3),
            "mod" => (Opcode::Mod, 3),
            "pow" => (Opcode::Pow, 3),

            "and" => (Opcode::And, 3),
            "or" => (Opcode::Or, 3),
            "xor" => (Opcode::Xor, 3),
            "not" => (Opcode::Not, 2),
            "shl" => (Opcode::Shl, 3),
            "shr" => (Opcode::Shr, 3),

            "inc" => (Opcode::Inc, 1),
            "dec" => (Opcode::Dec, 1),

            "goto" => (Opcode::Goto, 1),
            "call" => (Opcode::Call, 1),
            "ret" => (Opcode::Ret, 0),
            "end" => (Opcode::End, 0),

            "print" => (Opcode::Print, 1),
            "push" => (Opcode::Push, 1),
            "pop" => (Opcode::Pop, 1),
            "saveall" => (Opcode::SaveAll, 0),
            "restoreall" => (Opcode::RestoreAll, 0),

            "new" => (Opcode::New, 2),
            "clone" => (Opcode::Clone, 2),
            "addr" => (Opcode::Addr, 2),
            "defined" => (Opcode::Defined, 2),

            "if" => return self.branch(false, span),
            "unless" => return self.branch(true, span),

            _ => {
                self.msgs.at(span).parse_not_a_statement();
                return None;
            }
        };

        let args = self.operands(arity)?;
        Some(self.close(StmtNode::Instruction { opcode, args }, span))
    }

    /// ```abnf
    /// branch = "if" operand [RELOP operand] "goto" NAME
    /// branch =/ "unless" operand "goto" NAME
    /// ```
    fn branch(&mut self, unless: bool, span: Span) -> Option<Stmt> {
        let first = self.arg()?;

        let (opcode, mut args) = if !unless && self.peek(Token::Relop(Relop::Eq)) {
            let op = match &self.curr {
                Some((Token::Relop(op), _)) => *op,
                _ => unreachable!(),
            };
            self.advance();

            let second = self.arg()?;
            (Opcode::IfCmp(op), vec![first, second])
        } else if unless {
            (Opcode::Unless, vec![first])
        } else {
            (Opcode::If, vec![first])
        };

        let goto = |tok: &Token| matches!(tok, Token::Name(name) if name.as_str() == "goto");
        if !self.consume(goto) {
            let at = self.curr_span();
            self.msgs.at(at).parse_expected_goto();
            return None;
        }

        match self.curr.clone() {
            Some((Token::Name(target), target_span)) => {
                self.advance();
                args.push(Arg {
                    node: ArgNode::Ident(target),
                    span: target_span,
                });
            }

            _ => {
                let at = self.curr_span();
                self.msgs.at(at).parse_expected_label();
                return None;
            }
        }

        Some(self.close(StmtNode::Instruction { opcode, args }, span))
    }

    /// ```abnf
    /// macro-def = ".macro" NAME ["(" [NAME *("," NAME)] ")"] EOL
    ///             *(stmt EOL)
    ///             ".endm"
    /// ```
    fn macro_def(&mut self, span: Span) -> Option<Stmt> {
        self.advance();
        let name = self.name()?;

        let mut params = vec![];
        if let Some(open) = self.matches(Token::LParen) {
            if !self.consume(Token::RParen) {
                loop {
                    params.push(self.name()?);

                    if self.consume(Token::Comma) {
                        continue;
                    }

                    if self.consume(Token::RParen) {
                        break;
                    }

                    self.msgs.at(open).parse_unclosed_parens();
                    return None;
                }
            }
        }

        if !self.is_done() && !self.consume(Token::Eol) {
            let at = self.curr_span();
            self.msgs.at(at).parse_expected_end_of_statement();
            self.recover();
        }

        let mut body = vec![];
        loop {
            if self.is_done() {
                self.msgs.at(span).parse_unterminated_macro();
                return None;
            }

            if self.consume(Token::Eol) {
                continue;
            }

            if self.consume(Token::Endm) {
                break;
            }

            if self.peek(Token::Macro) {
                let at = self.curr_span();
                self.msgs.at(at).parse_nested_macro();
                self.recover();
                continue;
            }

            match self.stmt() {
                Some(stmt) => {
                    let is_label = matches!(stmt.node, StmtNode::Label(_));
                    body.push(stmt);

                    if !is_label && !self.is_done() && !self.peek(Token::Eol) {
                        let at = self.curr_span();
                        self.msgs.at(at).parse_expected_end_of_statement();
                        self.recover();
                    }
                }

                None => self.recover(),
            }
        }

        Some(self.close(StmtNode::MacroDef { name, params, body }, span))
    }

    /// ```abnf
    /// macro-call = "." NAME ["(" [operand *("," operand)] ")"]
    /// ```
    fn macro_call(&mut self, name: String, span: Span) -> Option<Stmt> {
        let mut args = vec![];

        if let Some(open) = self.matches(Token::LParen) {
            if !self.consume(Token::RParen) {
                loop {
                    args.push(self.arg()?);

                    if self.consume(Token::Comma) {
                        continue;
                    }

                    if self.consume(Token::RParen) {
                        break;
                    }

                    self.msgs.at(open).parse_unclosed_parens();
                    return None;
                }
            }
        }

        Some(self.close(StmtNode::MacroCall { name, args }, span))
    }

    fn operands(&mut self, arity: usize) -> Option<Vec<Arg>> {
        let mut args = Vec::with_capacity(arity);

        for i in 0..arity {
            if i > 0 && !self.consume(Token::Comma) {
                let at = self.curr_span();
                self.msgs.at(at).parse_expected_operand();
                return None;
            }

            args.push(self.arg()?);
        }

        Some(args)
    }

    fn arg(&mut self) -> Option<Arg> {
        let (tok, span) = match self.curr.clone() {
            Some(curr) => curr,
            None => {
                let at = self.curr_span();
                self.msgs.at(at).parse_expected_operand();
                return None;
            }
        };

        let node = match tok {
            Token::SymReg(class, index) => ArgNode::Sym(class, index),
            Token::PhysReg(class, index) => ArgNode::Phys(class, index),
            Token::Name(name) => ArgNode::Ident(name),
            Token::Int(value) => ArgNode::Int(value),
            Token::Num(value) => ArgNode::Num(value),
            Token::Str(value) => ArgNode::Str(value),

            _ => {
                self.msgs.at(span).parse_expected_operand();
                return None;
            }
        };

        self.advance();
        Some(Arg { node, span })
    }

    fn name(&mut self) -> Option<String> {
        match self.curr.clone() {
            Some((Token::Name(name), _)) => {
                self.advance();
                Some(name)
            }

            _ => {
                let at = self.curr_span();
                self.msgs.at(at).parse_expected_name();
                None
            }
        }
    }

    fn reg_class(&mut self) -> Option<RegClass> {
        if let Some((Token::Name(name), _)) = self.curr.clone() {
            let class = match name.as_str() {
                "int" => Some(RegClass::Int),
                "num" => Some(RegClass::Num),
                "str" => Some(RegClass::Str),
                "obj" => Some(RegClass::Obj),
                _ => None,
            };

            if let Some(class) = class {
                self.advance();
                return Some(class);
            }
        }

        let at = self.curr_span();
        self.msgs.at(at).parse_expected_register_class();
        None
    }

    fn close(&self, node: StmtNode, start: Span) -> Stmt {
        let end = self
            .prev
            .as_ref()
            .map(|(_, span)| *span)
            .unwrap_or(start);

        Stmt {
            node,
            span: start + end,
        }
    }
}
