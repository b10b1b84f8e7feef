//! Fish completion scripts for a whole command tree.
//!
//! Unlike help, completion walks every nested registry: the shell needs all
//! levels up front. Rules come out breadth-first, so every root command is
//! listed before any of its children.
//!
//! A nested level is offered once its parent has been typed and stops being
//! offered as soon as one of its own entries has been typed, the same way
//! `__fish_use_subcommand` retires the root level.

use crate::registry::Registry;
use std::collections::VecDeque;

const ROOT_CONDITION: &str = "__fish_use_subcommand";

pub fn render(program: &str, registry: &Registry) -> String {
    let program = quote(program);
    let mut script = format!(
        "complete -c '{program}' -e -n '{ROOT_CONDITION}'\ncomplete -c '{program}' -f\n"
    );

    let mut pending: VecDeque<(Option<&str>, &Registry)> = VecDeque::from([(None, registry)]);
    while let Some((parent, registry)) = pending.pop_front() {
        let condition = match parent {
            None => ROOT_CONDITION.to_string(),
            Some(parent) => nested_condition(parent, registry),
        };

        for entry in registry {
            script.push_str(&format!(
                "complete -c '{program}' -n '{condition}' -a '{}' -d '{}'\n",
                quote(entry.name()),
                quote(entry.description())
            ));
            if let Some(nested) = entry.subcommands() {
                pending.push_back((Some(entry.name()), nested));
            }
        }
    }

    script
}

/// `parent` has been typed and none of its children has yet.
fn nested_condition(parent: &str, registry: &Registry) -> String {
    let children: Vec<String> = registry.iter().map(|entry| quote(entry.name())).collect();
    format!(
        "__fish_seen_subcommand_from {}; and not __fish_seen_subcommand_from {}",
        quote(parent),
        children.join(" ")
    )
}

fn quote(text: &str) -> String {
    text.replace('\\', "\\\\").replace('\'', "\\'")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{ExitStatus, SimpleCommand};
    use crate::context::InvocationContext;
    use crate::error::Result;
    use std::io::Write;

    struct Noop;

    impl SimpleCommand for Noop {
        fn run(&self, _ctx: &InvocationContext, _out: &mut dyn Write) -> Result<ExitStatus> {
            Ok(ExitStatus::Success)
        }
    }

    fn leaf(names: &[&'static str]) -> Registry {
        names
            .iter()
            .fold(Registry::builder(), |builder, &name| {
                builder.simple(name, "Leaf", Noop)
            })
            .build()
            .unwrap()
    }

    #[test]
    fn test_preamble_comes_first() {
        let script = render("sak", &leaf(&["bar"]));
        let lines: Vec<&str> = script.lines().collect();
        assert_eq!(lines[0], "complete -c 'sak' -e -n '__fish_use_subcommand'");
        assert_eq!(lines[1], "complete -c 'sak' -f");
        assert_eq!(
            lines[2],
            "complete -c 'sak' -n '__fish_use_subcommand' -a 'bar' -d 'Leaf'"
        );
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_empty_registry_is_just_the_preamble() {
        let script = render("sak", &leaf(&[]));
        assert_eq!(script.lines().count(), 2);
    }

    #[test]
    fn test_nested_rules_follow_their_parent() {
        let root = Registry::builder()
            .composite("X", "Parent", leaf(&["A", "B"]))
            .simple("Y", "Sibling", Noop)
            .build()
            .unwrap();
        let script = render("sak", &root);
        let position = |needle: &str| script.find(needle).unwrap();

        let x = position("-a 'X'");
        let y = position("-a 'Y'");
        let a = position("-a 'A'");
        let b = position("-a 'B'");
        assert!(x < a && x < b);
        assert!(y < a, "all root entries precede nested ones");
        assert!(a < b);
        assert!(script.contains(
            "-n '__fish_seen_subcommand_from X; and not __fish_seen_subcommand_from A B' -a 'A' -d 'Leaf'"
        ));
        assert!(script.contains(
            "-n '__fish_seen_subcommand_from X; and not __fish_seen_subcommand_from A B' -a 'B' -d 'Leaf'"
        ));
    }

    #[test]
    fn test_walks_every_depth() {
        let deepest = leaf(&["leaf"]);
        let middle = Registry::builder()
            .composite("middle", "Middle", deepest)
            .build()
            .unwrap();
        let root = Registry::builder()
            .composite("top", "Top", middle)
            .build()
            .unwrap();
        let script = render("sak", &root);
        assert!(script.contains(
            "-n '__fish_seen_subcommand_from middle; and not __fish_seen_subcommand_from leaf' -a 'leaf'"
        ));
        assert_eq!(script.lines().count(), 5);
    }

    #[test]
    fn test_descriptions_are_quoted() {
        let root = Registry::builder()
            .simple("say", "Don't panic", Noop)
            .build()
            .unwrap();
        let script = render("sak", &root);
        assert!(script.contains("-d 'Don\\'t panic'"));
    }

    #[test]
    fn test_program_is_quoted_everywhere() {
        let script = render("it's", &leaf(&["bar"]));
        for line in script.lines() {
            assert!(line.starts_with("complete -c 'it\\'s' "), "{line}");
        }
    }
}
