use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

use rook_common::config::{AllocConfig, TieBreak};

/// a register allocator for typed symbolic assembly.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
#[command(propagate_version = true)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Command,
}

impl Arguments {
    pub fn options(&self) -> &Options {
        self.command.options()
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    #[command(visible_alias = "b")]
    Build(Options),
    #[command(visible_alias = "c")]
    Check(Options),
}

impl Command {
    pub fn options(&self) -> &Options {
        match self {
            Self::Build(opts) => opts,
            Self::Check(opts) => opts,
        }
    }

    pub fn build(&self) -> bool {
        matches!(self, Self::Build(_))
    }
}

#[derive(Debug, Args)]
pub struct Options {
    /// The number of physical registers in every class.
    #[arg(short, long, default_value_t = 8)]
    pub budget: usize,

    /// The maximum macro expansion depth.
    #[arg(long, default_value_t = 64)]
    pub macro_depth: usize,

    /// Report warnings, such as unreachable code.
    #[arg(long, action = ArgAction::SetTrue)]
    pub diagnostics: bool,

    /// Print the resolved program before allocation.
    #[arg(long, action = ArgAction::SetTrue)]
    pub emit_resolved: bool,

    #[arg(required = true)]
    pub path: PathBuf,
}

impl Options {
    pub fn config(&self) -> AllocConfig {
        AllocConfig {
            budgets: [self.budget; 4],
            caller_saved: [true; 4],
            tie_break: TieBreak::DeclarationOrder,
            macro_depth: self.macro_depth,
            diagnostics: self.diagnostics,
        }
    }
}
