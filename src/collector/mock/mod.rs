//! Mock sources for testing.
//!
//! This module provides `MockFs`, `MockHost` and pre-built scenarios for
//! testing collectors without a Linux kernel underneath.

mod filesystem;
mod scenarios;

pub use filesystem::{MockFs, MockHost};
