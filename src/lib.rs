//! sysmon - Linux metrics sampling engine and terminal dashboard.
//!
//! This library provides:
//! - `collector` - stateful per-domain samplers over `/proc`, `/sys` and a
//!   few system calls
//! - `rates` - previous-sample caches and rate computation
//! - `model` - snapshot value types
//! - `history` - ring buffers for graphing
//! - `tui` - the interactive dashboard used by the `sysmon` binary

pub mod collector;
pub mod fmt;
pub mod history;
pub mod model;
pub mod rates;
pub mod tui;
