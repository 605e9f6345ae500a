//! # cadence-core
//!
//! Foundational pieces shared by the cadence crates: the error type and its
//! `ensure!` / `fail!` macros, the [`Settings`] value that carries
//! time-table limits, the observer pattern used by recurrence iterators, and
//! the lexical ISO-8601 scanners.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Public modules ───────────────────────────────────────────────────────────

/// Error types and the `ensure!` / `fail!` macros.
pub mod errors;

/// Design patterns: observable.
pub mod patterns;

/// Library settings (time-table limits).
pub mod settings;

/// ISO-8601 scanners.
pub mod utilities;

// ── Re-exports for convenience ────────────────────────────────────────────────

pub use errors::{Error, Result};
pub use patterns::observable::{Observable, ObservableImpl, Observer};
pub use settings::Settings;
