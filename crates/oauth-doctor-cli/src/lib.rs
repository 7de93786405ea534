//! CLI argument models for the oauth-doctor binary.
//!
//! Exposes the clap-backed `Cli` plus value enums and the small parsers used
//! to validate numeric and identifier flags before any check runs.

pub mod cli_args;
pub mod cli_types;

pub use cli_args::{Cli, CliProbeFlags};
pub use cli_types::*;
