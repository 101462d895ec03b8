//! Terminal User Interface for sysmon.
//!
//! Three panels (System, Memory & Processes, Network) drawn from the
//! snapshots of a [`Collector`](crate::collector::Collector).

mod app;
mod event;
mod input;
mod render;
mod state;
mod style;
mod widgets;

pub use app::App;
pub use state::{AppState, Panel};
