//! # Command Contract
//!
//! Every registry entry is exactly one of two shapes:
//!
//! - [`SimpleCommand`]: no option schema; the dispatcher calls [`SimpleCommand::run`]
//!   directly with the remaining arguments untouched.
//! - [`ParameterizedCommand`]: declares an [`OptionSchema`]; the dispatcher always
//!   routes it through the option adapter, which handles `--help` and parse errors
//!   before [`ParameterizedCommand::execute`] ever runs.
//!
//! A composite command is a parameterized command that owns a nested [`Registry`]
//! (see [`crate::composite::Composite`]). The shape is fixed when the entry is
//! registered and carried as an explicit [`Executable`] tag.
//!
//! Commands write their normal output to the `out` writer they are handed and
//! return an [`ExitStatus`]. Errors travel back through `Result` untouched.

use crate::context::InvocationContext;
use crate::error::Result;
use crate::options::{OptionSchema, ParsedOptions};
use crate::registry::Registry;
use std::io::Write;
use std::process::ExitCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    Failure,
}

impl ExitStatus {
    pub fn is_success(self) -> bool {
        self == ExitStatus::Success
    }
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        match status {
            ExitStatus::Success => ExitCode::SUCCESS,
            ExitStatus::Failure => ExitCode::FAILURE,
        }
    }
}

pub trait SimpleCommand {
    fn run(&self, ctx: &InvocationContext, out: &mut dyn Write) -> Result<ExitStatus>;
}

pub trait ParameterizedCommand {
    /// Declared options and positionals. The implicit help flag is never listed here.
    fn schema(&self) -> OptionSchema;

    /// The nested registry for composite commands.
    fn subcommands(&self) -> Option<&Registry> {
        None
    }

    fn execute(
        &self,
        ctx: &InvocationContext,
        options: ParsedOptions,
        out: &mut dyn Write,
    ) -> Result<ExitStatus>;
}

pub enum Executable {
    Simple(Box<dyn SimpleCommand>),
    Parameterized(Box<dyn ParameterizedCommand>),
}

impl Executable {
    pub fn subcommands(&self) -> Option<&Registry> {
        match self {
            Executable::Simple(_) => None,
            Executable::Parameterized(cmd) => cmd.subcommands(),
        }
    }
}

impl std::fmt::Debug for Executable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Executable::Simple(_) => f.write_str("Simple"),
            Executable::Parameterized(cmd) => match cmd.subcommands() {
                Some(registry) => write!(f, "Composite({} entries)", registry.len()),
                None => f.write_str("Parameterized"),
            },
        }
    }
}
