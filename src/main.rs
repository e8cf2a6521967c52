mod args;
mod console_driver;

use anyhow::Context;
use clap::Parser;
use codespan_reporting::files::SimpleFiles;

use rook_backend::allocate_program;
use rook_common::names::Names;
use rook_common::pretty::Prettier;
use rook_common::{Driver, IrOutput};
use rook_frontend::expand::expand;
use rook_frontend::lex::lex;
use rook_frontend::parse::parse;
use rook_frontend::resolve::resolve;

use args::Arguments;
use console_driver::ConsoleDriver;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Arguments::parse();
    let opts = args.options();
    let config = opts.config();

    let src = std::fs::read_to_string(&opts.path)
        .with_context(|| format!("couldn't read '{}'", opts.path.display()))?;

    let mut files = SimpleFiles::new();
    let file = files.add(opts.path.display().to_string(), src.clone());

    let mut driver = ConsoleDriver::new(files, opts.emit_resolved);
    let mut names = Names::new();

    let tokens = lex(&mut driver, &src, file);
    let stmts = parse(&mut driver, tokens, file);
    let stmts = expand(&mut driver, stmts, &config);
    let program = resolve(&mut driver, &mut names, stmts, file);

    driver.output_ir(IrOutput::Resolved, || {
        Prettier::new(&names).pretty_program(&program)
    });

    if args.command.build() && driver.num_errors() == 0 {
        let allocated = allocate_program(&mut driver, &config, program);

        driver.output_ir(IrOutput::Allocated, || {
            Prettier::new(&names).pretty_program(&allocated.to_program())
        });
    }

    match driver.num_errors() {
        0 => Ok(()),
        1 => anyhow::bail!("aborting due to previous error"),
        n => anyhow::bail!("aborting due to {n} previous errors"),
    }
}
