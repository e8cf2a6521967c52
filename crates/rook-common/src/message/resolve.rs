use codespan_reporting::diagnostic::{Diagnostic, Label};

use super::MessageAdder;
use crate::ir::RegClass;

const UNDEFINED_LABEL: &str = "ES00";
const DUPLICATE_LABEL: &str = "ES01";
const REGISTER_CLASS_MISMATCH: &str = "ES02";
const DUPLICATE_REGISTER: &str = "ES03";
const OPERAND_CLASS_MISMATCH: &str = "ES04";
const PHYSICAL_OUTSIDE_EMIT: &str = "ES05";
const SYMBOLIC_INSIDE_EMIT: &str = "ES06";
const UNDEFINED_REGISTER: &str = "ES07";
const DIRECTIVE_INSIDE_EMIT: &str = "ES08";
const STRAY_DIRECTIVE: &str = "ES09";
const EXPECTED_SYMBOL: &str = "ES10";

impl<'a> MessageAdder<'a> {
    pub fn resolve_undefined_label(&mut self, name: &str) {
        let labels = vec![Label::primary(self.at.file, self.at)];

        self.add(
            Diagnostic::error()
                .with_code(UNDEFINED_LABEL)
                .with_message(format!("label '{name}' is never defined"))
                .with_labels(labels),
        );
    }

    pub fn resolve_duplicate_label(&mut self, name: &str, prev: crate::message::Span) {
        let labels = vec![
            Label::primary(self.at.file, self.at),
            Label::secondary(prev.file, prev).with_message("first defined here"),
        ];

        self.add(
            Diagnostic::error()
                .with_code(DUPLICATE_LABEL)
                .with_message(format!("label '{name}' is defined twice"))
                .with_labels(labels),
        );
    }

    pub fn resolve_register_class_mismatch(
        &mut self,
        name: &str,
        declared: RegClass,
        used: RegClass,
    ) {
        let labels = vec![Label::primary(self.at.file, self.at)];
        let notes = vec![format!(
            "'{name}' was declared as a {declared} register, not {used}"
        )];

        self.add(
            Diagnostic::error()
                .with_code(REGISTER_CLASS_MISMATCH)
                .with_message("register used at the wrong class")
                .with_labels(labels)
                .with_notes(notes),
        );
    }

    pub fn resolve_duplicate_register(&mut self, name: &str, prev: crate::message::Span) {
        let labels = vec![
            Label::primary(self.at.file, self.at),
            Label::secondary(prev.file, prev).with_message("first declared here"),
        ];

        self.add(
            Diagnostic::error()
                .with_code(DUPLICATE_REGISTER)
                .with_message(format!("register '{name}' is declared twice"))
                .with_labels(labels),
        );
    }

    pub fn resolve_operand_class_mismatch(&mut self, expected: &str) {
        let labels =
            vec![Label::primary(self.at.file, self.at).with_message(format!("expected {expected}"))];

        self.add(
            Diagnostic::error()
                .with_code(OPERAND_CLASS_MISMATCH)
                .with_message("operand has the wrong register class")
                .with_labels(labels),
        );
    }

    pub fn resolve_physical_outside_emit(&mut self) {
        let labels = vec![Label::primary(self.at.file, self.at)];
        let notes = vec![String::from(
            "physical registers may only appear inside '.emit' blocks",
        )];

        self.add(
            Diagnostic::error()
                .with_code(PHYSICAL_OUTSIDE_EMIT)
                .with_message("physical register outside an emit block")
                .with_labels(labels)
                .with_notes(notes),
        );
    }

    pub fn resolve_symbolic_inside_emit(&mut self) {
        let labels = vec![Label::primary(self.at.file, self.at)];
        let notes = vec![String::from(
            "emit blocks bypass allocation and may only use physical registers",
        )];

        self.add(
            Diagnostic::error()
                .with_code(SYMBOLIC_INSIDE_EMIT)
                .with_message("symbolic register inside an emit block")
                .with_labels(labels)
                .with_notes(notes),
        );
    }

    pub fn resolve_undefined_register(&mut self, name: &str) {
        let labels = vec![Label::primary(self.at.file, self.at)];
        let notes = vec![String::from(
            "named registers are declared with '.local', '.sym', '.param', or '.global'",
        )];

        self.add(
            Diagnostic::error()
                .with_code(UNDEFINED_REGISTER)
                .with_message(format!("no register named '{name}'"))
                .with_labels(labels)
                .with_notes(notes),
        );
    }

    pub fn resolve_directive_inside_emit(&mut self) {
        let labels = vec![Label::primary(self.at.file, self.at)];

        self.add(
            Diagnostic::error()
                .with_code(DIRECTIVE_INSIDE_EMIT)
                .with_message("directives are not allowed inside an emit block")
                .with_labels(labels),
        );
    }

    pub fn resolve_stray_directive(&mut self, directive: &str) {
        let labels = vec![Label::primary(self.at.file, self.at)];

        self.add(
            Diagnostic::error()
                .with_code(STRAY_DIRECTIVE)
                .with_message(format!("'{directive}' does not open or close anything here"))
                .with_labels(labels),
        );
    }

    pub fn resolve_unclosed_block(&mut self, opener: &str, closer: &str) {
        let labels = vec![Label::primary(self.at.file, self.at)
            .with_message(format!("this '{opener}' is never closed by '{closer}'"))];

        self.add(
            Diagnostic::error()
                .with_code(STRAY_DIRECTIVE)
                .with_message(format!("unclosed '{opener}' block"))
                .with_labels(labels),
        );
    }

    pub fn resolve_expected_symbol(&mut self, kind: &str) {
        let labels = vec![Label::primary(self.at.file, self.at)];

        self.add(
            Diagnostic::error()
                .with_code(EXPECTED_SYMBOL)
                .with_message(format!("expected {kind}"))
                .with_labels(labels),
        );
    }
}
