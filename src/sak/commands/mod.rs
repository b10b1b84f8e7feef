//! Leaf commands shipped with the `sak` binary.
//!
//! Each module exposes types implementing [`crate::command::SimpleCommand`] or
//! [`crate::command::ParameterizedCommand`]; the binary decides names,
//! descriptions and order when it builds the root registry.

pub mod aws;
pub mod builtin;
pub mod config;
pub mod db;
pub mod fetch;
pub mod test_names;
