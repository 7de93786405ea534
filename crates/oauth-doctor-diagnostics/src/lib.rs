//! Checks, HTTP probes, and report rendering for oauth-doctor.
//!
//! Each probe issues one request against the configured Supabase project and
//! classifies the response into a tri-state `CheckResult`. Probes are listed as
//! ordered descriptors and executed by a single driver that skips any probe
//! whose prerequisites are missing and never lets one probe abort another.

pub mod check;
pub mod driver;
pub mod probes;
pub mod provider;
pub mod report;

pub use check::*;
pub use driver::*;
pub use probes::*;
pub use provider::*;
pub use report::*;
