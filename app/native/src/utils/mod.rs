//! Shared utilities.

pub mod random;
