//! Shared utilities for pakt.
//!
//! Cross-cutting concerns used by the other pakt crates: the unified error
//! type, filesystem path helpers and terminal status output.

pub mod errors;
pub mod fs;
pub mod progress;
