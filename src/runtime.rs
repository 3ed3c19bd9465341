use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent, KeyEventKind};

/// How often the screen refreshes while nothing happens (live stats clock)
pub const TICK_RATE_MS: u64 = 100;

/// Terminal-level event consumed by the main loop
#[derive(Clone, Debug)]
pub enum TermEvent {
    Key(KeyEvent),
    Paste(String),
    Resize,
    Tick,
}

/// Source of terminal events
pub trait EventSource: Send + 'static {
    /// Wait up to `timeout` for the next event
    fn recv_timeout(&self, timeout: Duration) -> Result<TermEvent, RecvTimeoutError>;
}

/// Event source backed by a channel. In production a reader thread feeds it
/// from crossterm; tests push events into the sender directly.
pub struct ChannelEventSource {
    rx: Receiver<TermEvent>,
}

impl ChannelEventSource {
    pub fn new(rx: Receiver<TermEvent>) -> Self {
        Self { rx }
    }

    /// Spawn a reader thread that forwards crossterm key presses, pastes and
    /// resizes until the receiving side goes away.
    pub fn from_terminal() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            let forwarded = match event::read() {
                Ok(CtEvent::Key(key)) if key.kind != KeyEventKind::Release => {
                    Some(TermEvent::Key(key))
                }
                Ok(CtEvent::Paste(text)) => Some(TermEvent::Paste(text)),
                Ok(CtEvent::Resize(_, _)) => Some(TermEvent::Resize),
                Ok(_) => None,
                Err(_) => break,
            };

            if let Some(ev) = forwarded {
                if tx.send(ev).is_err() {
                    break;
                }
            }
        });

        Self { rx }
    }
}

impl EventSource for ChannelEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<TermEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Runner that hands out one event at a time, or a Tick when none arrives
/// within the tick interval
pub struct Runner<E: EventSource> {
    event_source: E,
    tick: Duration,
}

impl<E: EventSource> Runner<E> {
    pub fn new(event_source: E, tick: Duration) -> Self {
        Self { event_source, tick }
    }

    pub fn step(&self) -> TermEvent {
        match self.event_source.recv_timeout(self.tick) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => TermEvent::Tick,
        }
    }
}
