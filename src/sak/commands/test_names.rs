//! `dj-test-names`: turn Django test runner output into a fish completion rule
//! for `manage.py test`.

use crate::command::{ExitStatus, ParameterizedCommand};
use crate::context::InvocationContext;
use crate::error::{Result, SakError};
use crate::options::{OptionSchema, OptionSpec, ParsedOptions};
use regex::Regex;
use std::fs;
use std::io::{self, IsTerminal, Read, Write};
use tracing::debug;

const STDIO: &str = "-";

/// `test_name (module.Case)`, as printed by the Django test runner.
const TEST_LINE: &str = r"(test_\w+) \((\w+(?:\.\w+)+)\)";

/// Dotted `module.Case.test_name` paths, in the order they appear.
pub fn extract(input: &str) -> Result<Vec<String>> {
    let pattern = Regex::new(TEST_LINE)?;
    Ok(pattern
        .captures_iter(input)
        .map(|caps| format!("{}.{}", &caps[2], &caps[1]))
        .collect())
}

pub fn completion_line(names: &[String]) -> String {
    format!(
        "complete -c manage.py -n '__fish_complete_suboption test' -a '{}'\n",
        names.join(" ")
    )
}

pub struct DjTestNames;

impl DjTestNames {
    fn read_input(input: Option<&str>) -> Result<String> {
        match input {
            Some(STDIO) => read_stdin(),
            Some(path) => fs::read_to_string(path)
                .map_err(|e| SakError::command(format!("Failed to open input file: {path}: {e}"))),
            None if io::stdin().is_terminal() => {
                Err(SakError::command("No input file specified"))
            }
            None => read_stdin(),
        }
    }
}

fn read_stdin() -> Result<String> {
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    Ok(buffer)
}

impl ParameterizedCommand for DjTestNames {
    fn schema(&self) -> OptionSchema {
        OptionSchema::new()
            .option(OptionSpec::value("input", "Input file, `-` for stdin").short('i'))
            .option(OptionSpec::value("output", "Output file, `-` for stdout").short('o'))
    }

    fn execute(
        &self,
        _ctx: &InvocationContext,
        options: ParsedOptions,
        out: &mut dyn Write,
    ) -> Result<ExitStatus> {
        let input = Self::read_input(options.get("input"))?;
        let names = extract(&input)?;
        debug!(count = names.len(), "extracted test names");

        if names.is_empty() {
            return Err(SakError::command("No test names found in input"));
        }

        let line = completion_line(&names);
        match options.get("output") {
            Some(STDIO) | None => out.write_all(line.as_bytes())?,
            Some(path) => fs::write(path, line).map_err(|e| {
                SakError::command(format!("Failed to open output file: {path}: {e}"))
            })?,
        }
        Ok(ExitStatus::Success)
    }
}
