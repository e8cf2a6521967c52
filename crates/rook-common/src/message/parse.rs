use codespan_reporting::diagnostic::{Diagnostic, Label};

use super::MessageAdder;

const NOT_A_STATEMENT: &str = "EP00";
const EXPECTED_OPERAND: &str = "EP01";
const EXPECTED_REGISTER_CLASS: &str = "EP02";
const EXPECTED_NAME: &str = "EP03";
const EXPECTED_GOTO: &str = "EP04";
const UNCLOSED_PARENS: &str = "EP05";
const EXPECTED_LABEL: &str = "EP06";
const NESTED_MACRO: &str = "EP07";
const UNTERMINATED_MACRO: &str = "EP08";
const EXPECTED_END_OF_STATEMENT: &str = "EP09";

impl<'a> MessageAdder<'a> {
    pub fn parse_not_a_statement(&mut self) {
        let labels = vec![Label::primary(self.at.file, self.at)
            .with_message("expected a label, an opcode, or a directive")];

        self.add(
            Diagnostic::error()
                .with_code(NOT_A_STATEMENT)
                .with_message("expected a statement")
                .with_labels(labels),
        );
    }

    pub fn parse_expected_operand(&mut self) {
        let labels = vec![Label::primary(self.at.file, self.at)];
        let notes = vec![String::from(
            "an operand is a register, a literal, or a name",
        )];

        self.add(
            Diagnostic::error()
                .with_code(EXPECTED_OPERAND)
                .with_message("expected an operand")
                .with_labels(labels)
                .with_notes(notes),
        );
    }

    pub fn parse_expected_register_class(&mut self) {
        let labels = vec![Label::primary(self.at.file, self.at)];
        let notes = vec![String::from(
            "a register class is one of 'int', 'num', 'str', or 'obj'",
        )];

        self.add(
            Diagnostic::error()
                .with_code(EXPECTED_REGISTER_CLASS)
                .with_message("expected a register class")
                .with_labels(labels)
                .with_notes(notes),
        );
    }

    pub fn parse_expected_name(&mut self) {
        let labels = vec![Label::primary(self.at.file, self.at)];

        self.add(
            Diagnostic::error()
                .with_code(EXPECTED_NAME)
                .with_message("expected a name")
                .with_labels(labels),
        );
    }

    pub fn parse_expected_goto(&mut self) {
        let labels = vec![Label::primary(self.at.file, self.at)
            .with_message("branches are written 'if <cond> goto <label>'")];

        self.add(
            Diagnostic::error()
                .with_code(EXPECTED_GOTO)
                .with_message("expected 'goto' after the branch condition")
                .with_labels(labels),
        );
    }

    pub fn parse_unclosed_parens(&mut self) {
        let labels = vec![Label::primary(self.at.file, self.at)];

        self.add(
            Diagnostic::error()
                .with_code(UNCLOSED_PARENS)
                .with_message("unclosed parenthesis")
                .with_labels(labels),
        );
    }

    pub fn parse_expected_label(&mut self) {
        let labels = vec![Label::primary(self.at.file, self.at)];

        self.add(
            Diagnostic::error()
                .with_code(EXPECTED_LABEL)
                .with_message("expected a label name")
                .with_labels(labels),
        );
    }

    pub fn parse_nested_macro(&mut self) {
        let labels = vec![Label::primary(self.at.file, self.at)];

        self.add(
            Diagnostic::error()
                .with_code(NESTED_MACRO)
                .with_message("macro definitions cannot nest")
                .with_labels(labels),
        );
    }

    pub fn parse_unterminated_macro(&mut self) {
        let labels = vec![Label::primary(self.at.file, self.at)
            .with_message("this macro is never closed by '.endm'")];

        self.add(
            Diagnostic::error()
                .with_code(UNTERMINATED_MACRO)
                .with_message("unterminated macro definition")
                .with_labels(labels),
        );
    }

    pub fn parse_expected_end_of_statement(&mut self) {
        let labels = vec![Label::primary(self.at.file, self.at)];

        self.add(
            Diagnostic::error()
                .with_code(EXPECTED_END_OF_STATEMENT)
                .with_message("expected the end of the statement")
                .with_labels(labels),
        );
    }
}
