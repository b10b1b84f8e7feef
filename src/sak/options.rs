//! # Option Adapter
//!
//! Every [`ParameterizedCommand`] is run through [`adapt`], which:
//!
//! 1. Scans the command's argument slice against its [`OptionSchema`], splitting the
//!    tokens the schema can consume from the ones it cannot. `-h`/`--help` is always
//!    recognized and never declared by the command itself.
//! 2. On a help request, writes the command's usage (and, for composites, its
//!    immediate subcommands) and returns success without running anything else.
//! 3. Parses the consumable tokens with a `clap::Command` projected from the schema.
//!    Any clap failure is an [`SakError::OptionParse`].
//! 4. Rejects the invocation with [`SakError::UnrecognizedOptions`] if any token was
//!    left over, listing all of them.
//! 5. Hands the resulting [`ParsedOptions`] to [`ParameterizedCommand::execute`].
//!
//! The scan exists because clap stops at the first unknown argument, while users
//! should see every offending token at once.

use crate::command::{ExitStatus, ParameterizedCommand};
use crate::context::InvocationContext;
use crate::error::{Result, SakError};
use crate::help;
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::collections::BTreeMap;
use std::io::Write;
use tracing::{debug, trace};

/// Name of the implicit help flag. Reserved: schemas must not declare it.
pub const HELP: &str = "help";
const HELP_SHORT: char = 'h';

/// A named option: `--name`, optionally `-n`, either a flag or taking one value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionSpec {
    name: &'static str,
    short: Option<char>,
    help: &'static str,
    takes_value: bool,
    required: bool,
}

impl OptionSpec {
    pub fn flag(name: &'static str, help: &'static str) -> Self {
        Self {
            name,
            short: None,
            help,
            takes_value: false,
            required: false,
        }
    }

    pub fn value(name: &'static str, help: &'static str) -> Self {
        Self {
            takes_value: true,
            ..Self::flag(name, help)
        }
    }

    pub fn short(mut self, short: char) -> Self {
        self.short = Some(short);
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn takes_value(&self) -> bool {
        self.takes_value
    }
}

/// How many tokens a positional slot binds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    One,
    Many,
    /// Everything from this slot onwards, options included, taken verbatim.
    Rest,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionalSpec {
    name: &'static str,
    help: &'static str,
    required: bool,
    arity: Arity,
}

impl PositionalSpec {
    pub fn one(name: &'static str, help: &'static str) -> Self {
        Self {
            name,
            help,
            required: false,
            arity: Arity::One,
        }
    }

    pub fn many(name: &'static str, help: &'static str) -> Self {
        Self {
            arity: Arity::Many,
            ..Self::one(name, help)
        }
    }

    pub fn rest(name: &'static str, help: &'static str) -> Self {
        Self {
            arity: Arity::Rest,
            ..Self::one(name, help)
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn arity(&self) -> Arity {
        self.arity
    }
}

/// The options and positional slots a command accepts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionSchema {
    options: Vec<OptionSpec>,
    positionals: Vec<PositionalSpec>,
}

impl OptionSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn option(mut self, spec: OptionSpec) -> Self {
        debug_assert!(spec.name != HELP, "`{HELP}` is reserved for the help flag");
        debug_assert!(
            spec.short != Some(HELP_SHORT),
            "`-{HELP_SHORT}` is reserved for the help flag"
        );
        self.options.push(spec);
        self
    }

    pub fn positional(mut self, spec: PositionalSpec) -> Self {
        debug_assert!(
            self.positionals.iter().all(|p| p.arity == Arity::One),
            "only the last positional may bind more than one token"
        );
        self.positionals.push(spec);
        self
    }

    pub fn options(&self) -> &[OptionSpec] {
        &self.options
    }

    pub fn positionals(&self) -> &[PositionalSpec] {
        &self.positionals
    }

    fn find_long(&self, name: &str) -> Option<&OptionSpec> {
        self.options.iter().find(|spec| spec.name == name)
    }

    fn find_short(&self, short: char) -> Option<&OptionSpec> {
        self.options.iter().find(|spec| spec.short == Some(short))
    }

    /// Splits `tokens` into what the schema can consume and what it cannot.
    pub fn scan(&self, tokens: &[String]) -> Scan {
        let mut scan = Scan::default();
        let mut slot = 0;
        let mut escaped = false;
        let mut tokens = tokens.iter().peekable();

        while let Some(token) = tokens.next() {
            let current = self.positionals.get(slot);

            // Once a rest slot is reached, the remainder belongs to someone else.
            if current.is_some_and(|p| p.arity == Arity::Rest) && !scan.positionals.is_empty() {
                scan.rest.push(token.clone());
                scan.rest.extend(tokens.by_ref().cloned());
                break;
            }

            if !escaped && token.starts_with('-') && token.len() > 1 {
                if token == "--" {
                    escaped = true;
                } else if token == "--help" || token == "-h" {
                    scan.help = true;
                } else if let Some(long) = token.strip_prefix("--") {
                    let (name, inline_value) = match long.split_once('=') {
                        Some((name, _)) => (name, true),
                        None => (long, false),
                    };
                    match self.find_long(name) {
                        Some(spec) => {
                            scan.options.push(token.clone());
                            if spec.takes_value && !inline_value {
                                if let Some(value) = tokens.next_if(|t| is_value(t)) {
                                    scan.options.push(value.clone());
                                }
                            }
                        }
                        None => scan.unrecognized.push(token.clone()),
                    }
                } else if self.cluster_requests_help(&token[1..]) {
                    scan.help = true;
                } else if self.accepts_short_cluster(&token[1..]) {
                    scan.options.push(token.clone());
                    if self.cluster_wants_next_value(&token[1..]) {
                        if let Some(value) = tokens.next_if(|t| is_value(t)) {
                            scan.options.push(value.clone());
                        }
                    }
                } else {
                    scan.unrecognized.push(token.clone());
                }
                continue;
            }

            match current.map(|p| p.arity) {
                Some(Arity::Rest) => {
                    scan.rest.push(token.clone());
                    scan.rest.extend(tokens.by_ref().cloned());
                    break;
                }
                Some(Arity::Many) => scan.positionals.push(token.clone()),
                Some(Arity::One) => {
                    scan.positionals.push(token.clone());
                    slot += 1;
                }
                None => scan.unrecognized.push(token.clone()),
            }
        }

        trace!(?scan, "scanned arguments");
        scan
    }

    /// `-vh`: the help letter appears before anything that would read it as a value.
    fn cluster_requests_help(&self, cluster: &str) -> bool {
        for short in cluster.chars() {
            if short == HELP_SHORT {
                return true;
            }
            match self.find_short(short) {
                Some(spec) if spec.takes_value => return false,
                Some(_) => continue,
                None => return false,
            }
        }
        false
    }

    /// `-abc` is accepted when every letter up to the first value-taking one is declared.
    fn accepts_short_cluster(&self, cluster: &str) -> bool {
        for short in cluster.chars() {
            match self.find_short(short) {
                Some(spec) if spec.takes_value => return true,
                Some(_) => continue,
                None => return false,
            }
        }
        true
    }

    fn cluster_wants_next_value(&self, cluster: &str) -> bool {
        cluster
            .chars()
            .last()
            .and_then(|short| self.find_short(short))
            .is_some_and(|spec| spec.takes_value)
            && cluster
                .chars()
                .rev()
                .skip(1)
                .all(|short| self.find_short(short).is_some_and(|spec| !spec.takes_value))
    }

    /// Projects the schema onto a clap command used for parsing and usage output.
    pub fn command(&self, name: &'static str, about: &'static str, bin_name: String) -> Command {
        let mut command = Command::new(name)
            .bin_name(bin_name)
            .about(about)
            .no_binary_name(true)
            .disable_help_flag(true)
            .disable_version_flag(true)
            .arg(
                Arg::new(HELP)
                    .short(HELP_SHORT)
                    .long(HELP)
                    .action(ArgAction::SetTrue)
                    .help("Print help"),
            );

        for spec in &self.options {
            let mut arg = Arg::new(spec.name)
                .long(spec.name)
                .help(spec.help)
                .required(spec.required);
            if let Some(short) = spec.short {
                arg = arg.short(short);
            }
            arg = if spec.takes_value {
                arg.action(ArgAction::Set)
                    .value_name(spec.name.to_uppercase())
            } else {
                arg.action(ArgAction::SetTrue)
            };
            command = command.arg(arg);
        }

        for (index, spec) in self.positionals.iter().enumerate() {
            let arg = Arg::new(spec.name)
                .index(index + 1)
                .help(spec.help)
                .required(spec.required)
                .value_name(spec.name.to_uppercase());
            let arg = match spec.arity {
                Arity::One => arg.action(ArgAction::Set),
                Arity::Many => arg.action(ArgAction::Append).num_args(1..),
                Arity::Rest => arg
                    .action(ArgAction::Append)
                    .num_args(1..)
                    .trailing_var_arg(true)
                    .allow_hyphen_values(true),
            };
            command = command.arg(arg);
        }

        command
    }
}

fn is_value(token: &str) -> bool {
    token == "-" || !token.starts_with('-')
}

/// The outcome of matching raw tokens against a schema, before clap sees them.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Scan {
    pub help: bool,
    pub options: Vec<String>,
    pub positionals: Vec<String>,
    pub rest: Vec<String>,
    pub unrecognized: Vec<String>,
}

impl Scan {
    /// The consumable tokens in the order clap expects them.
    fn clap_args(&self) -> Vec<String> {
        let mut args = self.options.clone();
        if !self.positionals.is_empty() || !self.rest.is_empty() {
            args.push("--".to_string());
            args.extend(self.positionals.iter().cloned());
            args.extend(self.rest.iter().cloned());
        }
        args
    }
}

/// Option values and positionals for one command execution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedOptions {
    values: BTreeMap<String, Vec<String>>,
    positionals: Vec<String>,
    help_requested: bool,
}

impl ParsedOptions {
    fn from_matches(schema: &OptionSchema, matches: &ArgMatches, help_requested: bool) -> Self {
        let mut values = BTreeMap::new();
        let mut positionals = Vec::new();

        for spec in &schema.options {
            if spec.takes_value {
                if let Some(value) = matches.get_one::<String>(spec.name) {
                    values.insert(spec.name.to_string(), vec![value.clone()]);
                }
            } else if matches.get_flag(spec.name) {
                values.insert(spec.name.to_string(), Vec::new());
            }
        }

        for spec in &schema.positionals {
            if let Some(found) = matches.get_many::<String>(spec.name) {
                let found: Vec<String> = found.cloned().collect();
                positionals.extend(found.iter().cloned());
                values.insert(spec.name.to_string(), found);
            }
        }

        Self {
            values,
            positionals,
            help_requested,
        }
    }

    /// First value bound to an option or positional.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values
            .get(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    pub fn get_all(&self, name: &str) -> &[String] {
        self.values.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// True for set flags and for options or positionals that received a value.
    pub fn is_present(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// All positional values, in declaration order.
    pub fn positionals(&self) -> &[String] {
        &self.positionals
    }

    pub fn help_requested(&self) -> bool {
        self.help_requested
    }
}

/// Runs a parameterized command named `name` over the context's arguments.
pub fn adapt(
    name: &'static str,
    description: &'static str,
    command: &dyn ParameterizedCommand,
    ctx: &InvocationContext,
    out: &mut dyn Write,
) -> Result<ExitStatus> {
    let schema = command.schema();
    let scan = schema.scan(ctx.arguments());
    let mut clap_command = schema.command(name, description, ctx.command_line());

    if scan.help {
        debug!(command = %ctx.command_line(), "help requested");
        let mut usage = clap_command.render_help().to_string().trim_end().to_string();
        usage.push('\n');
        if let Some(registry) = command.subcommands() {
            usage.push_str(&help::commands_section(registry, ctx.use_color())?);
        }
        out.write_all(usage.as_bytes())?;
        return Ok(ExitStatus::Success);
    }

    let matches = clap_command
        .try_get_matches_from(scan.clap_args())
        .map_err(|e| SakError::OptionParse(clap_message(&e)))?;

    if !scan.unrecognized.is_empty() {
        return Err(SakError::UnrecognizedOptions(scan.unrecognized));
    }

    let options = ParsedOptions::from_matches(&schema, &matches, scan.help);
    command.execute(ctx, options, out)
}

fn clap_message(error: &clap::Error) -> String {
    let rendered = error.to_string();
    rendered
        .strip_prefix("error: ")
        .unwrap_or(&rendered)
        .trim_end()
        .to_string()
}
