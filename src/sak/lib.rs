//! # Sak Architecture
//!
//! Sak is a bag of small admin commands (credential rotation, test-name
//! extraction, database queries, payload fetching). The commands themselves are
//! shallow; what they share is the **dispatch framework**: a declarative tree of
//! named subcommands that is projected three ways, into execution, help and shell
//! completion, from one registry.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Builds the root registry from configuration              │
//! │  - The ONLY place that knows about stderr and exit codes    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Dispatch Layer (dispatch.rs, options.rs, composite.rs)     │
//! │  - Selector matching against a Registry                     │
//! │  - Option adapter: schema scan, clap parse, implicit --help │
//! │  - Composite commands re-enter dispatch one level down      │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Leaf behavior behind SimpleCommand / ParameterizedCommand│
//! │  - Writes to the `out` it is handed, returns ExitStatus     │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Help ([`help`]) and completion ([`complete`]) read the same [`registry::Registry`]
//! the dispatcher does. Help shows one level; completion shows the whole tree.
//!
//! ## Key Principle: Errors Travel, Output Is Injected
//!
//! Below the CLI layer nothing touches stdout or stderr directly. Commands write
//! to a `&mut dyn Write`, and every failure comes back as a [`error::SakError`]
//! through `Result`. The dispatcher never rewrites a command's error or status.
//!
//! ## Module Overview
//!
//! - [`command`]: The command contract and [`command::ExitStatus`]
//! - [`registry`]: Ordered, duplicate-free command sets
//! - [`context`]: The immutable per-dispatch argument view
//! - [`dispatch`]: Selector matching and invocation
//! - [`options`]: Option schemas and the adapter around parameterized commands
//! - [`composite`]: Commands that own a nested registry
//! - [`help`], [`complete`], [`render`]: Help listings and fish completion scripts
//! - [`config`]: Configuration file and environment overrides
//! - [`commands`]: The leaf commands shipped with the `sak` binary

pub mod command;
pub mod commands;
pub mod complete;
pub mod composite;
pub mod config;
pub mod context;
pub mod dispatch;
pub mod error;
pub mod help;
pub mod options;
pub mod registry;
pub mod render;
