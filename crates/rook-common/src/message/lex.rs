use codespan_reporting::diagnostic::{Diagnostic, Label};

use super::MessageAdder;

const INVALID: &str = "EL00";
const UNTERMINATED_STRING: &str = "EL01";

impl<'a> MessageAdder<'a> {
    pub fn lex_invalid(&mut self) {
        let labels = vec![Label::primary(self.at.file, self.at)];

        self.add(
            Diagnostic::error()
                .with_code(INVALID)
                .with_message("unrecognized character")
                .with_labels(labels),
        );
    }

    pub fn lex_unterminated_string(&mut self) {
        let labels = vec![Label::primary(self.at.file, self.at)
            .with_message("string is missing a closing quote")];

        self.add(
            Diagnostic::error()
                .with_code(UNTERMINATED_STRING)
                .with_message("unterminated string literal")
                .with_labels(labels),
        );
    }
}
