use codespan_reporting::diagnostic::{Diagnostic, Label};

use super::MessageAdder;
use crate::ir::RegClass;

const ZERO_BUDGET: &str = "EA00";
const OVERFULL_INSTRUCTION: &str = "EA01";

impl<'a> MessageAdder<'a> {
    pub fn alloc_zero_budget(&mut self, class: RegClass) {
        let labels = vec![Label::primary(self.at.file, self.at)];
        let notes = vec![format!(
            "the configured budget for {class} registers is zero, but this unit uses them"
        )];

        self.add(
            Diagnostic::error()
                .with_code(ZERO_BUDGET)
                .with_message("no physical registers available for this class")
                .with_labels(labels)
                .with_notes(notes),
        );
    }

    pub fn alloc_overfull_instruction(&mut self, class: RegClass, demand: usize, budget: usize) {
        let labels = vec![Label::primary(self.at.file, self.at).with_message(format!(
            "needs {demand} {class} registers at once, but only {budget} exist"
        ))];
        let notes = vec![String::from(
            "spilling cannot free registers that a single instruction needs simultaneously",
        )];

        self.add(
            Diagnostic::error()
                .with_code(OVERFULL_INSTRUCTION)
                .with_message("instruction needs more registers than the budget holds")
                .with_labels(labels)
                .with_notes(notes),
        );
    }
}
