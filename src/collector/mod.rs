//! System metrics collectors for Linux.
//!
//! Each domain has its own stateful collector that reads raw kernel
//! counters, keeps the previous sample where a rate is derived, and returns
//! an owned snapshot value.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                          Collector                           │
//! │  Cpu  Memory  Disk  Network  Process  TaskStats  Sensor  Sys │
//! │     │            │               │                           │
//! │     │     ┌──────▼──────┐ ┌──────▼──────┐                    │
//! │     └────►│ SampleStore │ │   procfs    │ (parsers)          │
//! │           └─────────────┘ └─────────────┘                    │
//! │                 ┌─────────────┐   ┌───────────┐              │
//! │                 │  FileSystem │   │   Host    │ (traits)     │
//! │                 └──────┬──────┘   └─────┬─────┘              │
//! └────────────────────────┼────────────────┼────────────────────┘
//!                   ┌──────┴──────┐   ┌─────┴──────┐
//!                   │ RealFs      │   │ RealHost   │
//!                   │ MockFs      │   │ MockHost   │
//!                   └─────────────┘   └────────────┘
//! ```
//!
//! # Usage
//!
//! ## Production (Linux)
//!
//! ```ignore
//! use sysmon::collector::{Collector, CollectorConfig, RealFs, RealHost};
//!
//! let mut collector = Collector::new(RealFs::new(), RealHost::new(), CollectorConfig::default());
//! let snapshot = collector.snapshot();
//! ```
//!
//! ## Testing (with mocks)
//!
//! ```
//! use sysmon::collector::{Collector, CollectorConfig, MockFs, MockHost};
//!
//! let mut collector = Collector::new(
//!     MockFs::typical_system(),
//!     MockHost::typical_system(),
//!     CollectorConfig::default(),
//! );
//! let snapshot = collector.snapshot();
//! assert!(!snapshot.processes.is_empty());
//! ```

#[allow(clippy::module_inception)]
mod collector;
pub mod config;
pub mod cpu;
pub mod disk;
pub mod memory;
pub mod mock;
pub mod network;
pub mod process;
pub mod procfs;
pub mod sensors;
pub mod system;
pub mod tasks;
pub mod traits;

pub use collector::{Collector, CollectorTiming};
pub use config::{CollectorConfig, MemorySource};
pub use cpu::CpuCollector;
pub use disk::DiskCollector;
pub use memory::MemoryCollector;
pub use mock::{MockFs, MockHost};
pub use network::NetworkCollector;
pub use process::{CollectError, ProcessCollector};
pub use sensors::SensorCollector;
pub use system::SystemInfoCollector;
pub use tasks::TaskStatsCollector;
pub use traits::{FileSystem, Host, RealFs, RealHost};
