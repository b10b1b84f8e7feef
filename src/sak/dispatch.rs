//! # Dispatcher
//!
//! Matches the first argument against a registry and hands the rest to the
//! matching command. Matching is a linear, exact, case-sensitive scan; registries
//! hold a handful of entries.
//!
//! The dispatcher raises two errors of its own: [`SakError::MissingCommand`] when
//! there is nothing to match (the caller decides what a bare invocation means) and
//! [`SakError::UnknownCommand`]. Everything else, including a command's
//! [`ExitStatus`], comes back exactly as the command produced it.

use crate::command::{ExitStatus, Executable};
use crate::context::InvocationContext;
use crate::error::{Result, SakError};
use crate::options;
use crate::registry::{CommandDescriptor, Registry};
use std::io::Write;
use tracing::debug;

pub fn dispatch(
    registry: &Registry,
    ctx: &InvocationContext,
    out: &mut dyn Write,
) -> Result<ExitStatus> {
    let selector = ctx.selector().ok_or(SakError::MissingCommand)?;

    let Some(descriptor) = registry.lookup(selector) else {
        debug!(selector, known = ?registry.names(), "no command matches");
        return Err(SakError::UnknownCommand(selector.to_string()));
    };

    let child = ctx.descend();
    debug!(command = %child.command_line(), arguments = ?child.arguments(), "dispatching");
    invoke(descriptor, &child, out)
}

/// Runs `descriptor` with a context whose arguments are already its own.
pub fn invoke(
    descriptor: &CommandDescriptor,
    ctx: &InvocationContext,
    out: &mut dyn Write,
) -> Result<ExitStatus> {
    match descriptor.executable() {
        Executable::Simple(command) => command.run(ctx, out),
        Executable::Parameterized(command) => options::adapt(
            descriptor.name(),
            descriptor.description(),
            command.as_ref(),
            ctx,
            out,
        ),
    }
}
