//! CLI command handlers.
//!
//! This module provides testable command handlers that are invoked by main.rs.
//! Each handler implements the business logic for a specific CLI subcommand.

mod compile;
mod verify;

pub use compile::{run_compile, CompileConfig};
pub use verify::run_verify;
