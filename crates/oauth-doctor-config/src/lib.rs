//! Local configuration loading for oauth-doctor.
//!
//! Reads the application's `KEY=VALUE` env file, extracts the Supabase URL and
//! anon key, and classifies them with the placeholder and length heuristics
//! that decide whether any network probe may run.

pub mod credentials;
pub mod env_file;

pub use credentials::*;
pub use env_file::*;
