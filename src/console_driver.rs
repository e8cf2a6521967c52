use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};
use codespan_reporting::term::{self, Config, DisplayStyle};

use rook_common::message::Messages;
use rook_common::{Driver, IrOutput};

pub struct ConsoleDriver {
    files: SimpleFiles<String, String>,
    writer: StandardStream,
    config: Config,

    emit_resolved: bool,
    errors: usize,
}

impl ConsoleDriver {
    pub fn new(files: SimpleFiles<String, String>, emit_resolved: bool) -> Self {
        Self {
            files,
            writer: StandardStream::stderr(ColorChoice::Auto),
            config: Config {
                display_style: DisplayStyle::Rich,
                ..Default::default()
            },

            emit_resolved,
            errors: 0,
        }
    }

    pub fn num_errors(&self) -> usize {
        self.errors
    }
}

impl Driver for ConsoleDriver {
    fn report(&mut self, messages: Messages) {
        self.errors += messages.num_errors();
        for msg in messages.msgs {
            term::emit(&mut self.writer, &self.config, &self.files, &msg).unwrap();
        }
    }

    fn output_ir(&mut self, at: IrOutput, data: impl FnOnce() -> String) {
        match at {
            IrOutput::Resolved if self.emit_resolved => println!("{}", data()),
            IrOutput::Allocated => println!("{}", data()),
            _ => {}
        }
    }
}
