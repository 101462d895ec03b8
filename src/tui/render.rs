//! Main rendering logic for TUI.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};

use crate::collector::{CollectorConfig, CollectorTiming};

use super::state::{AppState, Panel, PopupState};
use super::widgets::{
    render_debug_popup, render_header, render_help, render_memory_processes, render_network,
    render_quit_confirm, render_system,
};

/// Main render function.
pub fn render(
    frame: &mut Frame,
    state: &AppState,
    timing: Option<&CollectorTiming>,
    config: &CollectorConfig,
) {
    let area = frame.area();

    let chunks = Layout::vertical([
        Constraint::Length(1), // Header
        Constraint::Min(10),   // Panel
    ])
    .split(area);

    render_header(frame, chunks[0], state);

    match state.current_panel {
        Panel::System => render_system(frame, chunks[1], state),
        Panel::MemoryProcesses => render_memory_processes(frame, chunks[1], state),
        Panel::Network => render_network(frame, chunks[1], state),
    }

    // Popups are rendered last to overlay everything
    match state.popup {
        PopupState::Help => render_help(frame, area, state.current_panel),
        PopupState::Debug => render_debug_popup(frame, area, timing, config),
        PopupState::QuitConfirm => render_quit_confirm(frame, area),
        PopupState::None => {}
    }
}
