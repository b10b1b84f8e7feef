//! Help listings, one registry level at a time.
//!
//! A listing never descends into nested registries: `sak help` shows `db` but
//! not `db query`. Users ask `sak db --help` for the next level down.

use crate::context::InvocationContext;
use crate::error::Result;
use crate::registry::Registry;
use crate::render::{render_with_color, COMMANDS_TEMPLATE, SAK_THEME, USAGE_TEMPLATE};
use serde::Serialize;
use unicode_width::UnicodeWidthStr;

#[derive(Serialize)]
struct CommandLine {
    name: &'static str,
    padding: String,
    description: &'static str,
}

#[derive(Serialize)]
struct CommandsData {
    commands: Vec<CommandLine>,
}

#[derive(Serialize)]
struct UsageData {
    command_line: String,
    commands: String,
}

/// One aligned `name  description` line per entry, in declaration order.
pub fn render(registry: &Registry, use_color: bool) -> Result<String> {
    let width = registry
        .iter()
        .map(|entry| entry.name().width())
        .max()
        .unwrap_or(0);

    let commands = registry
        .iter()
        .map(|entry| CommandLine {
            name: entry.name(),
            padding: " ".repeat(width - entry.name().width()),
            description: entry.description(),
        })
        .collect();

    render_with_color(
        COMMANDS_TEMPLATE,
        &CommandsData { commands },
        &SAK_THEME,
        use_color,
    )
}

/// Usage header plus the listing, for `ctx`'s level of the command tree.
pub fn usage(ctx: &InvocationContext, registry: &Registry) -> Result<String> {
    let data = UsageData {
        command_line: ctx.command_line(),
        commands: render(registry, ctx.use_color())?,
    };
    render_with_color(USAGE_TEMPLATE, &data, &SAK_THEME, ctx.use_color())
}

/// The `Commands:` block appended to a composite command's option help.
pub fn commands_section(registry: &Registry, use_color: bool) -> Result<String> {
    Ok(format!("\nCommands:\n{}", render(registry, use_color)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{ExitStatus, SimpleCommand};
    use std::io::Write;

    struct Noop;

    impl SimpleCommand for Noop {
        fn run(&self, _ctx: &InvocationContext, _out: &mut dyn Write) -> Result<ExitStatus> {
            Ok(ExitStatus::Success)
        }
    }

    fn tree() -> Registry {
        let nested = Registry::builder()
            .simple("inner-one", "Hidden one level down", Noop)
            .simple("inner-two", "Also hidden", Noop)
            .build()
            .unwrap();
        Registry::builder()
            .composite("A", "First entry", nested)
            .simple("B", "Second entry", Noop)
            .build()
            .unwrap()
    }

    #[test]
    fn test_listing_is_one_level_in_order() {
        let listing = render(&tree(), false).unwrap();
        assert_eq!(listing, "  A  First entry\n  B  Second entry\n");
        assert!(!listing.contains("inner"));
    }

    #[test]
    fn test_listing_aligns_descriptions() {
        let registry = Registry::builder()
            .simple("update-aws", "Update AWS credentials", Noop)
            .simple("db", "Query a database", Noop)
            .build()
            .unwrap();
        let listing = render(&registry, false).unwrap();
        let lines: Vec<&str> = listing.lines().collect();
        assert_eq!(lines[0], "  update-aws  Update AWS credentials");
        assert_eq!(lines[1], "  db          Query a database");
    }

    #[test]
    fn test_empty_registry_lists_nothing() {
        let registry = Registry::builder().build().unwrap();
        assert_eq!(render(&registry, false).unwrap(), "");
    }

    #[test]
    fn test_usage_header() {
        let ctx = InvocationContext::new("sak", Vec::<String>::new());
        let usage = usage(&ctx, &tree()).unwrap();
        assert!(usage.starts_with("Usage: sak <command> [options]\n\nCommands:\n"));
        assert!(usage.ends_with("  B  Second entry\n"));
    }

    #[test]
    fn test_usage_header_for_nested_level() {
        let ctx = InvocationContext::new("sak", ["A"]).descend();
        let usage = usage(&ctx, &tree()).unwrap();
        assert!(usage.starts_with("Usage: sak A <command> [options]"));
    }
}
