//! Helpers shared by the stage tests.

use rook_common::message::Messages;
use rook_common::{Driver, IrOutput};

#[derive(Default)]
pub struct TestDriver {
    pub msgs: Messages,
}

impl Driver for TestDriver {
    fn report(&mut self, messages: Messages) {
        self.msgs.merge(messages);
    }

    fn output_ir(&mut self, _at: IrOutput, _data: impl FnOnce() -> String) {}
}

impl TestDriver {
    /// The codes of every reported error, in report order.
    pub fn codes(&self) -> Vec<String> {
        self.msgs
            .msgs
            .iter()
            .filter_map(|msg| msg.code.clone())
            .collect()
    }
}
