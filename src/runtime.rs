use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CtEvent, KeyEvent};

/// Unified event type consumed by the quiz loop. Ticks carry the measured
/// wall-clock time since the previous tick, so the session clock and the
/// deferred auto-advance work from real elapsed time rather than the
/// nominal interval.
#[derive(Clone, Debug)]
pub enum QuizEvent {
    Key(KeyEvent),
    Resize,
    Tick { elapsed_ms: u64 },
}

/// Source of terminal events (keyboard, resize).
pub trait EventSource {
    /// Block for up to `timeout` waiting for an event.
    fn recv_timeout(&self, timeout: Duration) -> Result<QuizEvent, RecvTimeoutError>;
}

/// Production event source reading crossterm events on a dedicated thread.
pub struct CrosstermEventSource {
    rx: Receiver<QuizEvent>,
}

impl CrosstermEventSource {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            match event::read() {
                Ok(CtEvent::Key(key)) => {
                    if tx.send(QuizEvent::Key(key)).is_err() {
                        break;
                    }
                }
                Ok(CtEvent::Resize(_, _)) => {
                    if tx.send(QuizEvent::Resize).is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(_) => break,
            }
        });

        Self { rx }
    }
}

impl EventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<QuizEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Test event source fed from an in-process channel.
pub struct TestEventSource {
    rx: Receiver<QuizEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<QuizEvent>) -> Self {
        Self { rx }
    }
}

impl EventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<QuizEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Paces the quiz loop. Input events pass through as they arrive; a timer
/// tick fires on a steady interval and takes priority once due, so a burst
/// of keystrokes cannot starve the session clock or a scheduled
/// auto-advance.
pub struct Runner<E: EventSource> {
    source: E,
    interval: Duration,
    last_tick: Instant,
}

impl<E: EventSource> Runner<E> {
    pub fn new(source: E, interval: Duration) -> Self {
        Self {
            source,
            interval,
            last_tick: Instant::now(),
        }
    }

    /// Returns the next event: a due tick, a waiting input event, or the
    /// tick produced by waiting out the remainder of the interval.
    pub fn step(&mut self) -> QuizEvent {
        let since = self.last_tick.elapsed();
        if since >= self.interval {
            return self.emit_tick(since);
        }

        match self.source.recv_timeout(self.interval - since) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) => self.emit_tick(self.last_tick.elapsed()),
            Err(RecvTimeoutError::Disconnected) => {
                // input thread is gone; keep the tick cadence instead of
                // spinning on the dead channel
                std::thread::sleep(self.interval.saturating_sub(self.last_tick.elapsed()));
                self.emit_tick(self.last_tick.elapsed())
            }
        }
    }

    fn emit_tick(&mut self, since: Duration) -> QuizEvent {
        self.last_tick = Instant::now();
        QuizEvent::Tick {
            elapsed_ms: since.as_millis() as u64,
        }
    }
}
