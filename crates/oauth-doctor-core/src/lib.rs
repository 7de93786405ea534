//! Foundational file utilities shared across oauth-doctor crates.
//!
//! Provides atomic text writes and the executable-bit helper used when the
//! remediation script is persisted.

pub mod atomic_io;

pub use atomic_io::{mark_executable, write_text_atomic};
