//! Application state management.

use std::collections::BTreeSet;
use std::time::Instant;

use crate::history::MetricHistory;
use crate::model::{ProcessInfo, SystemSnapshot};

/// Top-level panels of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Panel {
    #[default]
    System,
    MemoryProcesses,
    Network,
}

impl Panel {
    pub fn all() -> &'static [Panel] {
        &[Panel::System, Panel::MemoryProcesses, Panel::Network]
    }

    /// Returns the display name of the panel.
    pub fn name(&self) -> &'static str {
        match self {
            Panel::System => "System",
            Panel::MemoryProcesses => "Memory & Processes",
            Panel::Network => "Network",
        }
    }

    pub fn next(&self) -> Panel {
        match self {
            Panel::System => Panel::MemoryProcesses,
            Panel::MemoryProcesses => Panel::Network,
            Panel::Network => Panel::System,
        }
    }

    pub fn prev(&self) -> Panel {
        match self {
            Panel::System => Panel::Network,
            Panel::MemoryProcesses => Panel::System,
            Panel::Network => Panel::MemoryProcesses,
        }
    }
}

/// Graph tabs of the System panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PerfTab {
    #[default]
    Cpu,
    Fan,
    Thermal,
}

impl PerfTab {
    pub fn all() -> &'static [PerfTab] {
        &[PerfTab::Cpu, PerfTab::Fan, PerfTab::Thermal]
    }

    pub fn name(&self) -> &'static str {
        match self {
            PerfTab::Cpu => "CPU",
            PerfTab::Fan => "Fan",
            PerfTab::Thermal => "Thermal",
        }
    }

    pub fn next(&self) -> PerfTab {
        match self {
            PerfTab::Cpu => PerfTab::Fan,
            PerfTab::Fan => PerfTab::Thermal,
            PerfTab::Thermal => PerfTab::Cpu,
        }
    }

    /// Upper bound of the graph's y axis at scale 1.0.
    pub fn y_max(&self) -> f64 {
        match self {
            PerfTab::Cpu => 100.0,
            PerfTab::Fan => MAX_FAN_RPM,
            PerfTab::Thermal => 100.0,
        }
    }
}

/// Tabs of the Network panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NetTab {
    #[default]
    Rx,
    Tx,
    Usage,
}

impl NetTab {
    pub fn all() -> &'static [NetTab] {
        &[NetTab::Rx, NetTab::Tx, NetTab::Usage]
    }

    pub fn name(&self) -> &'static str {
        match self {
            NetTab::Rx => "RX Statistics",
            NetTab::Tx => "TX Statistics",
            NetTab::Usage => "Visual Usage",
        }
    }

    pub fn next(&self) -> NetTab {
        match self {
            NetTab::Rx => NetTab::Tx,
            NetTab::Tx => NetTab::Usage,
            NetTab::Usage => NetTab::Rx,
        }
    }
}

/// Fan speed shown as 100% level.
pub const MAX_FAN_RPM: f64 = 5000.0;

/// Byte count shown as a full bar in the network usage tab.
pub const NET_USAGE_FULL_SCALE: u64 = 2 * 1024 * 1024 * 1024;

/// Input mode for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    Filter,
}

/// Active popup state. Only one popup can be open at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PopupState {
    #[default]
    None,
    Help,
    QuitConfirm,
    /// Collector timing popup.
    Debug,
}

/// Complete UI state; owns the graph histories but no collector state.
#[derive(Debug)]
pub struct AppState {
    pub current_panel: Panel,
    pub perf_tab: PerfTab,
    pub net_tab: NetTab,
    pub input_mode: InputMode,
    pub popup: PopupState,
    pub cpu_history: MetricHistory,
    pub fan_history: MetricHistory,
    pub thermal_history: MetricHistory,
    pub snapshot: Option<SystemSnapshot>,
    /// Process name / pid filter typed after `/`.
    pub process_filter: String,
    /// Cursor row in the filtered process table.
    pub selected: usize,
    /// Pids marked with space in the process table.
    pub marked: BTreeSet<u32>,
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(history_capacity: usize) -> Self {
        Self {
            current_panel: Panel::default(),
            perf_tab: PerfTab::default(),
            net_tab: NetTab::default(),
            input_mode: InputMode::default(),
            popup: PopupState::default(),
            cpu_history: MetricHistory::new(history_capacity),
            fan_history: MetricHistory::new(history_capacity),
            thermal_history: MetricHistory::new(history_capacity),
            snapshot: None,
            process_filter: String::new(),
            selected: 0,
            marked: BTreeSet::new(),
            status_message: None,
        }
    }

    /// Stores a new snapshot and feeds the graph histories.
    pub fn apply_snapshot(&mut self, snapshot: SystemSnapshot, now: Instant) {
        self.cpu_history
            .push_at(now, snapshot.cpu.usage_percent as f32);
        self.fan_history.push_at(now, snapshot.sensors.fan_rpm as f32);
        self.thermal_history
            .push_at(now, snapshot.sensors.temperature_celsius as f32);

        let live: BTreeSet<u32> = snapshot.processes.iter().map(|p| p.pid).collect();
        self.marked.retain(|pid| live.contains(pid));
        self.snapshot = Some(snapshot);
        self.clamp_selection();
    }

    /// History graphed on the current System tab.
    pub fn active_history(&self) -> &MetricHistory {
        match self.perf_tab {
            PerfTab::Cpu => &self.cpu_history,
            PerfTab::Fan => &self.fan_history,
            PerfTab::Thermal => &self.thermal_history,
        }
    }

    pub fn active_history_mut(&mut self) -> &mut MetricHistory {
        match self.perf_tab {
            PerfTab::Cpu => &mut self.cpu_history,
            PerfTab::Fan => &mut self.fan_history,
            PerfTab::Thermal => &mut self.thermal_history,
        }
    }

    /// Processes matching the filter: case-insensitive name substring or pid
    /// prefix.
    pub fn filtered_processes(&self) -> Vec<&ProcessInfo> {
        let Some(snapshot) = &self.snapshot else {
            return Vec::new();
        };
        let filter = self.process_filter.to_lowercase();
        snapshot
            .processes
            .iter()
            .filter(|p| {
                filter.is_empty()
                    || p.name.to_lowercase().contains(&filter)
                    || p.pid.to_string().starts_with(&filter)
            })
            .collect()
    }

    pub fn move_selection(&mut self, delta: isize) {
        self.selected = self.selected.saturating_add_signed(delta);
        self.clamp_selection();
    }

    /// Marks or unmarks the process under the cursor.
    pub fn toggle_mark(&mut self) {
        let Some(pid) = self.filtered_processes().get(self.selected).map(|p| p.pid) else {
            return;
        };
        if !self.marked.remove(&pid) {
            self.marked.insert(pid);
        }
    }

    fn clamp_selection(&mut self) {
        let len = self.filtered_processes().len();
        self.selected = self.selected.min(len.saturating_sub(1));
    }

    pub fn switch_panel(&mut self, panel: Panel) {
        self.current_panel = panel;
        self.input_mode = InputMode::Normal;
    }

    pub fn push_filter_char(&mut self, c: char) {
        self.process_filter.push(c);
        self.selected = 0;
    }

    pub fn pop_filter_char(&mut self) {
        self.process_filter.pop();
        self.clamp_selection();
    }
}
