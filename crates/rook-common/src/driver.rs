use crate::message::Messages;

pub trait Driver {
    fn report(&mut self, messages: Messages);

    /// Output the IR at the given stage. The IR string is taken as a function,
    /// since generating it would usually be wasteful.
    fn output_ir(&mut self, at: IrOutput, data: impl FnOnce() -> String);
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum IrOutput {
    Resolved,
    Allocated,
}
