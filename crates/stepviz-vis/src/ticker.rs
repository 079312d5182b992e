//! Playback timers.
//!
//! The engine never holds a raw timer handle. It asks a [`TickSource`] to
//! start or stop a timer identified by a [`TimerId`], and every tick carries
//! the id of the timer that produced it, so ticks from a stopped timer that
//! are already queued can be recognized and dropped.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// Identity of one armed timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimerId(pub u64);

/// One timer expiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub timer: TimerId,
}

/// Something that can emit periodic ticks.
pub trait TickSource: Send {
    /// Start emitting ticks tagged `timer` every `period`, first one after
    /// one full period.
    fn start(&mut self, timer: TimerId, period: Duration);

    /// Stop the timer tagged `timer`. Unknown ids are ignored.
    fn stop(&mut self, timer: TimerId);
}

/// Tokio-backed ticker: one interval task per armed timer, ticks delivered
/// over an unbounded channel.
pub struct TokioTicker {
    ticks: mpsc::UnboundedSender<Tick>,
    task: Option<(TimerId, JoinHandle<()>)>,
}

impl TokioTicker {
    /// Create a ticker and the receiving end its ticks arrive on.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Tick>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { ticks: tx, task: None }, rx)
    }

    /// Whether a timer task is currently live.
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|(_, handle)| !handle.is_finished())
    }
}

impl TickSource for TokioTicker {
    fn start(&mut self, timer: TimerId, period: Duration) {
        if let Some((_, old)) = self.task.take() {
            old.abort();
        }

        let ticks = self.ticks.clone();
        let handle = tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if ticks.send(Tick { timer }).is_err() {
                    break;
                }
            }
        });
        self.task = Some((timer, handle));
    }

    fn stop(&mut self, timer: TimerId) {
        if matches!(&self.task, Some((id, _)) if *id == timer) {
            if let Some((_, handle)) = self.task.take() {
                handle.abort();
            }
        }
    }
}

impl Drop for TokioTicker {
    fn drop(&mut self) {
        if let Some((_, handle)) = self.task.take() {
            handle.abort();
        }
    }
}

/// A ticker driven by hand. It records what the engine asked for; the host
/// (a frame loop, or a test) delivers ticks itself.
#[derive(Debug, Default)]
pub struct ManualTicker {
    active: Option<(TimerId, Duration)>,
    starts: usize,
}

impl ManualTicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// The armed timer and its period, if any.
    pub fn active(&self) -> Option<(TimerId, Duration)> {
        self.active
    }

    /// Tick for the armed timer, if any.
    pub fn tick(&self) -> Option<Tick> {
        self.active.map(|(timer, _)| Tick { timer })
    }

    /// How many times a timer has been started.
    pub fn starts(&self) -> usize {
        self.starts
    }
}

impl TickSource for ManualTicker {
    fn start(&mut self, timer: TimerId, period: Duration) {
        self.active = Some((timer, period));
        self.starts += 1;
    }

    fn stop(&mut self, timer: TimerId) {
        if matches!(self.active, Some((id, _)) if id == timer) {
            self.active = None;
        }
    }
}
