//! `help` and `complete`: projections of the registry they live in.
//!
//! A registry can't hold a reference to itself, so both commands take a
//! constructor and rebuild the registry when they run.

use crate::command::{ExitStatus, SimpleCommand};
use crate::complete;
use crate::context::InvocationContext;
use crate::error::Result;
use crate::help;
use crate::registry::Registry;
use std::io::Write;

pub struct ShowHelp<F> {
    registry: F,
}

impl<F> ShowHelp<F>
where
    F: Fn() -> Result<Registry>,
{
    pub fn new(registry: F) -> Self {
        Self { registry }
    }
}

impl<F> SimpleCommand for ShowHelp<F>
where
    F: Fn() -> Result<Registry>,
{
    fn run(&self, ctx: &InvocationContext, out: &mut dyn Write) -> Result<ExitStatus> {
        let registry = (self.registry)()?;
        let usage = help::usage(&ctx.root(), &registry)?;
        out.write_all(usage.as_bytes())?;
        Ok(ExitStatus::Success)
    }
}

pub struct ShowCompletion<F> {
    registry: F,
}

impl<F> ShowCompletion<F>
where
    F: Fn() -> Result<Registry>,
{
    pub fn new(registry: F) -> Self {
        Self { registry }
    }
}

impl<F> SimpleCommand for ShowCompletion<F>
where
    F: Fn() -> Result<Registry>,
{
    fn run(&self, ctx: &InvocationContext, out: &mut dyn Write) -> Result<ExitStatus> {
        let registry = (self.registry)()?;
        out.write_all(complete::render(ctx.program_name(), &registry).as_bytes())?;
        Ok(ExitStatus::Success)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::dispatch;

    struct Noop;

    impl SimpleCommand for Noop {
        fn run(&self, _ctx: &InvocationContext, _out: &mut dyn Write) -> Result<ExitStatus> {
            Ok(ExitStatus::Success)
        }
    }

    fn registry() -> Result<Registry> {
        Registry::builder()
            .composite(
                "foo",
                "Foo option",
                Registry::builder()
                    .simple("bar", "Bar option", Noop)
                    .build()?,
            )
            .simple("help", "Show help", ShowHelp::new(registry))
            .simple("complete", "Show completion script", ShowCompletion::new(registry))
            .build()
    }

    fn run(args: &[&str]) -> String {
        let ctx = InvocationContext::new("n2", args.iter().copied());
        let mut out = Vec::new();
        let status = dispatch(&registry().unwrap(), &ctx, &mut out).unwrap();
        assert_eq!(status, ExitStatus::Success);
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_help_lists_itself_and_siblings() {
        let out = run(&["help"]);
        assert!(out.starts_with("Usage: n2 <command> [options]"));
        for name in ["foo", "help", "complete"] {
            assert!(out.contains(name), "missing {name}");
        }
        assert!(!out.contains("Bar option"));
    }

    #[test]
    fn test_complete_covers_the_tree() {
        let out = run(&["complete"]);
        assert!(out.starts_with("complete -c 'n2' -e -n '__fish_use_subcommand'\n"));
        assert!(out.contains("-a 'complete' -d 'Show completion script'"));
        assert!(out.contains(
            "-n '__fish_seen_subcommand_from foo; and not __fish_seen_subcommand_from bar' -a 'bar'"
        ));
    }
}
