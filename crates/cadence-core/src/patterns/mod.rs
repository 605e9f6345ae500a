//! Patterns sub-module: observable.

/// Observer / Observable notification lists.
pub mod observable;
