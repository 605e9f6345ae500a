//! Utilities sub-module: ISO-8601 scanners.

/// Lexical scanners for durations, repeat designators and date-times.
pub mod data_parsers;
