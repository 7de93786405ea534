//! Manual-remediation guidance for oauth-doctor.
//!
//! Builds the advisory checklists for settings that cannot be verified over
//! HTTP and renders the bash fix script that walks an operator through them.

pub mod advisory;
pub mod fix_script;
pub mod provider_console;

pub use advisory::*;
pub use fix_script::*;
pub use provider_console::*;
