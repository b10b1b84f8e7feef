//! # Sak CLI
//!
//! The binary is intentionally thin: the CLI lives in `src/sak/cli/`, while
//! this file only invokes `cli::run()` and turns its outcome into an exit code.
//!
//! ```text
//! sak <command> [options]
//! sak db query --sql 'select 1'
//! sak complete | source        # fish completions
//! ```
//!
//! Errors are printed once, here, on stderr. Commands never print their own
//! errors; see the library docs for the dispatch model.

use std::process::ExitCode;

mod cli;

fn main() -> ExitCode {
    match cli::run() {
        Ok(status) => status.into(),
        Err(e) => {
            eprintln!("{} {e}", console::style("Error:").red().for_stderr());
            ExitCode::FAILURE
        }
    }
}
