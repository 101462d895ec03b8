//! Terminal input and sampling ticks, merged into one channel.
//!
//! A background thread polls crossterm until the next tick is due, so a
//! burst of key presses never postpones sampling.

use std::sync::mpsc::{self, Receiver, RecvError};
use std::thread;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind};
use tracing::debug;

#[derive(Debug)]
pub enum Event {
    /// Time to take the next snapshot.
    Tick,
    /// Key press (releases and repeats are filtered out).
    Key(KeyEvent),
    Resize,
}

pub struct EventHandler {
    rx: Receiver<Event>,
}

impl EventHandler {
    /// Spawns the input thread. It exits once the handler is dropped.
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let mut next_tick = Instant::now() + tick_rate;
            loop {
                let timeout = next_tick.saturating_duration_since(Instant::now());
                let event = match event::poll(timeout) {
                    Ok(true) => match event::read() {
                        Ok(CrosstermEvent::Key(key)) if key.kind == KeyEventKind::Press => {
                            Some(Event::Key(key))
                        }
                        Ok(CrosstermEvent::Resize(_, _)) => Some(Event::Resize),
                        Ok(_) => None,
                        Err(e) => {
                            debug!(error = %e, "terminal read failed");
                            None
                        }
                    },
                    Ok(false) => None,
                    Err(e) => {
                        debug!(error = %e, "terminal poll failed");
                        thread::sleep(timeout);
                        None
                    }
                };
                if let Some(event) = event
                    && tx.send(event).is_err()
                {
                    return;
                }

                let now = Instant::now();
                if now >= next_tick {
                    next_tick = now + tick_rate;
                    if tx.send(Event::Tick).is_err() {
                        return;
                    }
                }
            }
        });

        Self { rx }
    }

    /// Blocks until the next event. Fails only if the input thread died.
    pub fn next(&self) -> Result<Event, RecvError> {
        self.rx.recv()
    }
}
