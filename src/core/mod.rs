//! Core library components.
//!
//! Everything that touches the host lives here; the CLI only wires these
//! pieces together and prints the outcome.

pub mod cleanup;
pub mod config;
pub mod constants;
pub mod encode;
pub mod envfile;
pub mod prompt;
pub mod provision;
pub mod schedule;
pub mod system;
pub mod table;
pub mod types;
