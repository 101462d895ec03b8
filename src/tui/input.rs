//! Input handling and keybindings.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::state::{AppState, InputMode, Panel, PopupState};

/// Result of handling a key event.
#[derive(Debug, PartialEq, Eq)]
pub enum KeyAction {
    /// No action, continue.
    None,
    /// Quit the application.
    Quit,
    /// Take a fresh snapshot now.
    Refresh,
}

/// Handles key input and updates state.
pub fn handle_key(state: &mut AppState, key: KeyEvent) -> KeyAction {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return KeyAction::Quit;
    }
    match state.popup {
        PopupState::QuitConfirm => return handle_quit_confirm(state, key),
        PopupState::Help | PopupState::Debug => {
            if matches!(
                key.code,
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('h') | KeyCode::Char('!')
            ) {
                state.popup = PopupState::None;
            }
            return KeyAction::None;
        }
        PopupState::None => {}
    }
    match state.input_mode {
        InputMode::Normal => handle_normal_mode(state, key),
        InputMode::Filter => handle_filter_mode(state, key),
    }
}

fn handle_quit_confirm(state: &mut AppState, key: KeyEvent) -> KeyAction {
    match key.code {
        KeyCode::Enter | KeyCode::Char('q') | KeyCode::Char('Q') => {
            state.popup = PopupState::None;
            KeyAction::Quit
        }
        KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
            state.popup = PopupState::None;
            KeyAction::None
        }
        _ => KeyAction::None,
    }
}

/// Handles keys in normal mode.
fn handle_normal_mode(state: &mut AppState, key: KeyEvent) -> KeyAction {
    state.status_message = None;
    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') => {
            state.popup = PopupState::QuitConfirm;
            KeyAction::None
        }
        KeyCode::Char('?') | KeyCode::Char('h') => {
            state.popup = PopupState::Help;
            KeyAction::None
        }
        KeyCode::Char('!') => {
            state.popup = PopupState::Debug;
            KeyAction::None
        }
        KeyCode::Char('r') => KeyAction::Refresh,

        // Panel navigation
        KeyCode::Tab => {
            state.switch_panel(state.current_panel.next());
            KeyAction::None
        }
        KeyCode::BackTab => {
            state.switch_panel(state.current_panel.prev());
            KeyAction::None
        }
        KeyCode::Char('1') => {
            state.switch_panel(Panel::System);
            KeyAction::None
        }
        KeyCode::Char('2') => {
            state.switch_panel(Panel::MemoryProcesses);
            KeyAction::None
        }
        KeyCode::Char('3') => {
            state.switch_panel(Panel::Network);
            KeyAction::None
        }

        _ => match state.current_panel {
            Panel::System => handle_system_keys(state, key),
            Panel::MemoryProcesses => handle_process_keys(state, key),
            Panel::Network => handle_network_keys(state, key),
        },
    }
}

/// Graph controls: tab switch, pause, fps and y scale.
fn handle_system_keys(state: &mut AppState, key: KeyEvent) -> KeyAction {
    match key.code {
        KeyCode::Left | KeyCode::Right | KeyCode::Char('t') => {
            state.perf_tab = state.perf_tab.next();
        }
        KeyCode::Char(' ') | KeyCode::Char('p') => {
            state.active_history_mut().toggle_paused();
        }
        KeyCode::Char('+') | KeyCode::Char('=') => {
            let history = state.active_history_mut();
            history.set_fps(history.fps().saturating_add(1));
        }
        KeyCode::Char('-') => {
            let history = state.active_history_mut();
            history.set_fps(history.fps().saturating_sub(1));
        }
        KeyCode::Char(']') => {
            let history = state.active_history_mut();
            history.set_y_scale(history.y_scale() + 0.1);
        }
        KeyCode::Char('[') => {
            let history = state.active_history_mut();
            history.set_y_scale(history.y_scale() - 0.1);
        }
        _ => {}
    }
    KeyAction::None
}

fn handle_process_keys(state: &mut AppState, key: KeyEvent) -> KeyAction {
    match key.code {
        KeyCode::Char('/') => {
            state.input_mode = InputMode::Filter;
        }
        KeyCode::Up | KeyCode::Char('k') => state.move_selection(-1),
        KeyCode::Down | KeyCode::Char('j') => state.move_selection(1),
        KeyCode::PageUp => state.move_selection(-20),
        KeyCode::PageDown => state.move_selection(20),
        KeyCode::Home => state.move_selection(isize::MIN),
        KeyCode::End => state.move_selection(isize::MAX),
        KeyCode::Char(' ') => state.toggle_mark(),
        KeyCode::Esc => {
            state.process_filter.clear();
            state.marked.clear();
        }
        _ => {}
    }
    KeyAction::None
}

fn handle_network_keys(state: &mut AppState, key: KeyEvent) -> KeyAction {
    if matches!(key.code, KeyCode::Left | KeyCode::Right | KeyCode::Char('t')) {
        state.net_tab = state.net_tab.next();
    }
    KeyAction::None
}

/// Handles keys in filter mode.
fn handle_filter_mode(state: &mut AppState, key: KeyEvent) -> KeyAction {
    match key.code {
        KeyCode::Enter => {
            state.input_mode = InputMode::Normal;
        }
        KeyCode::Esc => {
            state.process_filter.clear();
            state.input_mode = InputMode::Normal;
        }
        KeyCode::Backspace => state.pop_filter_char(),
        KeyCode::Char(c) => state.push_filter_char(c),
        _ => {}
    }
    KeyAction::None
}
