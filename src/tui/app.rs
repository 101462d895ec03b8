//! Main TUI application.

use std::io;
use std::time::{Duration, Instant};

use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::{debug, info};

use crate::collector::{Collector, FileSystem, Host};

use super::event::{Event, EventHandler};
use super::input::{KeyAction, handle_key};
use super::render::render;
use super::state::AppState;

/// Main TUI application.
///
/// Owns the collector; the event thread only forwards terminal input.
pub struct App<F: FileSystem + Clone, H: Host + Clone> {
    collector: Collector<F, H>,
    state: AppState,
    should_quit: bool,
}

impl<F: FileSystem + Clone, H: Host + Clone> App<F, H> {
    /// Creates a new App around the given collector.
    pub fn new(collector: Collector<F, H>) -> Self {
        let state = AppState::new(collector.config().history_capacity);
        Self {
            collector,
            state,
            should_quit: false,
        }
    }

    /// Runs the TUI application.
    pub fn run(mut self, tick_rate: Duration) -> io::Result<()> {
        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.event_loop(&mut terminal, tick_rate);

        // Restore terminal
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
        tick_rate: Duration,
    ) -> io::Result<()> {
        let events = EventHandler::new(tick_rate);
        info!(tick_ms = tick_rate.as_millis() as u64, "dashboard started");

        // Initial data fetch
        self.refresh();

        while !self.should_quit {
            terminal.draw(|frame| {
                render(
                    frame,
                    &self.state,
                    self.collector.last_timing(),
                    self.collector.config(),
                )
            })?;

            match events.next() {
                Ok(Event::Tick) => self.refresh(),
                Ok(Event::Key(key)) => match handle_key(&mut self.state, key) {
                    KeyAction::Quit => self.should_quit = true,
                    KeyAction::Refresh => self.refresh(),
                    KeyAction::None => {}
                },
                Ok(Event::Resize) => {}
                Err(_) => self.should_quit = true,
            }
        }

        info!("dashboard stopped");
        Ok(())
    }

    /// Takes a snapshot and hands it to the UI state.
    fn refresh(&mut self) {
        let now = Instant::now();
        let snapshot = self.collector.snapshot_at(now);
        debug!(processes = snapshot.processes.len(), "dashboard refreshed");
        self.state.apply_snapshot(snapshot, now);
    }
}
