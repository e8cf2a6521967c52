use codespan_reporting::diagnostic::{Diagnostic, Label};

use super::MessageAdder;

const UNREACHABLE_CODE: &str = "WC00";

impl<'a> MessageAdder<'a> {
    pub fn cfg_unreachable_code(&mut self) {
        let labels = vec![Label::primary(self.at.file, self.at)];
        let notes = vec![String::from(
            "these instructions can never execute and will not be allocated",
        )];

        self.add(
            Diagnostic::warning()
                .with_code(UNREACHABLE_CODE)
                .with_message("unreachable code")
                .with_labels(labels)
                .with_notes(notes),
        );
    }
}
