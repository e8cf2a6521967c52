use codespan_reporting::diagnostic::{Diagnostic, Label};

use super::MessageAdder;

const DEPTH_OVERFLOW: &str = "EM00";
const UNKNOWN_MACRO: &str = "EM01";
const WRONG_ARITY: &str = "EM02";
const DUPLICATE_MACRO: &str = "EM03";

impl<'a> MessageAdder<'a> {
    pub fn expand_depth_overflow(&mut self, limit: usize) {
        let labels = vec![Label::primary(self.at.file, self.at)];
        let notes = vec![format!("the expansion depth limit is {limit}")];

        self.add(
            Diagnostic::error()
                .with_code(DEPTH_OVERFLOW)
                .with_message("macro expansion is too deep")
                .with_labels(labels)
                .with_notes(notes),
        );
    }

    pub fn expand_unknown_macro(&mut self, name: &str) {
        let labels = vec![Label::primary(self.at.file, self.at)];

        self.add(
            Diagnostic::error()
                .with_code(UNKNOWN_MACRO)
                .with_message(format!("no macro named '{name}'"))
                .with_labels(labels),
        );
    }

    pub fn expand_wrong_arity(&mut self, name: &str, expected: usize, actual: usize) {
        let labels = vec![Label::primary(self.at.file, self.at)];

        self.add(
            Diagnostic::error()
                .with_code(WRONG_ARITY)
                .with_message(format!(
                    "macro '{name}' takes {expected} arguments but got {actual}"
                ))
                .with_labels(labels),
        );
    }

    pub fn expand_duplicate_macro(&mut self, name: &str) {
        let labels = vec![Label::primary(self.at.file, self.at)];

        self.add(
            Diagnostic::error()
                .with_code(DUPLICATE_MACRO)
                .with_message(format!("macro '{name}' is defined twice"))
                .with_labels(labels),
        );
    }
}
