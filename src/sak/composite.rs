use crate::command::{ExitStatus, ParameterizedCommand};
use crate::context::InvocationContext;
use crate::dispatch::dispatch;
use crate::error::Result;
use crate::help;
use crate::options::{OptionSchema, ParsedOptions, PositionalSpec};
use crate::registry::Registry;
use std::io::Write;

const SELECTOR: &str = "command";
const REMAINDER: &str = "args";

/// A command whose only job is to dispatch into its own registry.
///
/// The schema binds one optional sub-selector and hands every token after it,
/// untouched, to the selected child. Without a sub-selector the nested usage is
/// written and the command fails, same as a bare top-level invocation.
pub struct Composite {
    registry: Registry,
}

impl Composite {
    pub fn new(registry: Registry) -> Self {
        Self { registry }
    }
}

impl ParameterizedCommand for Composite {
    fn schema(&self) -> OptionSchema {
        OptionSchema::new()
            .positional(PositionalSpec::one(SELECTOR, "Subcommand to run"))
            .positional(PositionalSpec::rest(REMAINDER, "Arguments for the subcommand"))
    }

    fn subcommands(&self) -> Option<&Registry> {
        Some(&self.registry)
    }

    fn execute(
        &self,
        ctx: &InvocationContext,
        options: ParsedOptions,
        out: &mut dyn Write,
    ) -> Result<ExitStatus> {
        let Some(selector) = options.get(SELECTOR) else {
            out.write_all(help::usage(ctx, &self.registry)?.as_bytes())?;
            return Ok(ExitStatus::Failure);
        };

        let nested = ctx.with_arguments(
            std::iter::once(selector.to_string()).chain(options.get_all(REMAINDER).iter().cloned()),
        );
        dispatch(&self.registry, &nested, out)
    }
}
