//! # CLI Layer
//!
//! The only place that knows about the process: argv, environment, stdout,
//! logging setup. Everything it hands to the library is plain values; the
//! library hands back an [`sak::command::ExitStatus`] or an error.
//!
//! - `commands`: `run()`, the whole life of one invocation
//! - `setup`: tracing initialization and the root registry

mod commands;
pub mod setup;

pub use commands::run;
