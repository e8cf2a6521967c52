//! Helpers shared by the allocator tests. Units are produced by running real
//! source text through the front end.

use rook_common::config::AllocConfig;
use rook_common::ir::{Program, Unit};
use rook_common::message::Messages;
use rook_common::names::Names;
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
    pub fn codes(&self) -> Vec<String> {
        self.msgs
            .msgs
            .iter()
            .filter_map(|msg| msg.code.clone())
            .collect()
    }
}

/// Run the front end over a snippet and return the resolved program. The
/// snippet must be clean.
pub fn program(source: &str) -> Program {
    let mut driver = TestDriver::default();
    let mut names = Names::new();

    let tokens = rook_frontend::lex::lex(&mut driver, source, 0);
    let stmts = rook_frontend::parse::parse(&mut driver, tokens, 0);
    let stmts = rook_frontend::expand::expand(&mut driver, stmts, &AllocConfig::default());
    let program = rook_frontend::resolve::resolve(&mut driver, &mut names, stmts, 0);

    assert!(driver.msgs.msgs.is_empty(), "{:?}", driver.codes());

    program
}

/// The single unit of a snippet.
pub fn unit(source: &str) -> Unit {
    let mut program = program(source);
    assert_eq!(1, program.units.len());
    program.units.remove(0)
}

/// A config with the given uniform budget for every class.
pub fn budget(n: usize) -> AllocConfig {
    AllocConfig {
        budgets: [n; 4],
        ..AllocConfig::default()
    }
}
