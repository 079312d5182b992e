//! Playback controls for execution sequences.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use stepviz_model::{ExecutionSequence, Step};
use tracing::debug;

use crate::ticker::{Tick, TickSource, TimerId};

/// Playback speed level, 1 (slowest) to 5 (fastest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "u8")]
pub struct Speed(u8);

impl Speed {
    pub const MIN: Speed = Speed(1);
    pub const MAX: Speed = Speed(5);

    /// Base tick period at level 1.
    const BASE_MS: u64 = 2000;

    /// Clamp `level` into the valid range.
    pub fn new(level: i64) -> Self {
        Speed(level.clamp(Self::MIN.0 as i64, Self::MAX.0 as i64) as u8)
    }

    pub fn level(&self) -> u8 {
        self.0
    }

    /// Time between automatic steps: `2000ms / level`.
    pub fn interval(&self) -> Duration {
        Duration::from_millis(Self::BASE_MS / self.0 as u64)
    }
}

impl Default for Speed {
    fn default() -> Self {
        Speed(3)
    }
}

impl From<i64> for Speed {
    fn from(level: i64) -> Self {
        Speed::new(level)
    }
}

impl From<Speed> for u8 {
    fn from(speed: Speed) -> Self {
        speed.0
    }
}

/// Current state of playback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackState {
    /// No sequence loaded
    Idle,
    /// Sequence loaded, not advancing
    Ready,
    /// Cursor advancing on every tick
    Playing,
    /// Stopped by the user while playing
    Paused,
}

/// Playback controller for one execution sequence.
///
/// The cursor is the single source of truth for what is displayed; every
/// view reads [`PlaybackEngine::current_step`].
pub struct PlaybackEngine<S: TickSource> {
    sequence: Option<ExecutionSequence>,
    cursor: usize,
    playing: bool,
    paused_by_user: bool,
    speed: Speed,
    ticker: S,
    armed: Option<TimerId>,
    next_timer: u64,
}

impl<S: TickSource> PlaybackEngine<S> {
    /// Create an idle engine driving `ticker`.
    pub fn new(ticker: S) -> Self {
        Self::with_speed(ticker, Speed::default())
    }

    pub fn with_speed(ticker: S, speed: Speed) -> Self {
        Self {
            sequence: None,
            cursor: 0,
            playing: false,
            paused_by_user: false,
            speed,
            ticker,
            armed: None,
            next_timer: 0,
        }
    }

    pub fn state(&self) -> PlaybackState {
        if self.sequence.is_none() {
            PlaybackState::Idle
        } else if self.playing {
            PlaybackState::Playing
        } else if self.paused_by_user {
            PlaybackState::Paused
        } else {
            PlaybackState::Ready
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn speed(&self) -> Speed {
        self.speed
    }

    /// Number of steps in the loaded sequence (0 when idle).
    pub fn total_steps(&self) -> usize {
        self.sequence.as_ref().map_or(0, ExecutionSequence::len)
    }

    pub fn sequence(&self) -> Option<&ExecutionSequence> {
        self.sequence.as_ref()
    }

    /// The step under the cursor.
    pub fn current_step(&self) -> Option<&Step> {
        self.sequence.as_ref().and_then(|seq| seq.get(self.cursor))
    }

    pub fn status(&self) -> PlaybackStatus {
        PlaybackStatus::from(self)
    }

    /// The timer currently armed, if playing.
    pub fn armed_timer(&self) -> Option<TimerId> {
        self.armed
    }

    pub fn ticker(&self) -> &S {
        &self.ticker
    }

    /// Replace the sequence, rewind, and start playing.
    pub fn load(&mut self, sequence: ExecutionSequence) {
        debug!(steps = sequence.len(), "Loading sequence");
        self.sequence = Some(sequence);
        self.cursor = 0;
        self.playing = true;
        self.paused_by_user = false;
        self.rearm();
    }

    /// Drop the sequence and return to idle.
    pub fn clear(&mut self) {
        self.sequence = None;
        self.cursor = 0;
        self.playing = false;
        self.paused_by_user = false;
        self.rearm();
    }

    /// Advance one step. At the last index this never wraps; if playing,
    /// playback stops there instead.
    pub fn step_forward(&mut self) {
        let last = self.total_steps().saturating_sub(1);
        if self.cursor < last {
            self.cursor += 1;
            if self.cursor == last && self.playing {
                self.finish();
            }
        } else if self.playing {
            self.finish();
        }
    }

    /// Go back one step; no-op at the start.
    pub fn step_backward(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
        }
    }

    /// Flip between playing and paused. Turning playback on without a
    /// sequence does nothing.
    pub fn toggle_play(&mut self) {
        if self.playing {
            self.playing = false;
            self.paused_by_user = true;
        } else if self.sequence.is_some() {
            self.playing = true;
            self.paused_by_user = false;
        } else {
            return;
        }
        debug!(playing = self.playing, cursor = self.cursor, "Toggled playback");
        self.rearm();
    }

    /// Change speed; a running timer is restarted at the new interval.
    pub fn set_speed(&mut self, speed: Speed) {
        if speed == self.speed {
            return;
        }
        self.speed = speed;
        if self.playing {
            self.rearm();
        }
    }

    /// Rewind to the first step and stop, keeping the sequence.
    pub fn reset(&mut self) {
        self.cursor = 0;
        self.playing = false;
        self.paused_by_user = false;
        self.rearm();
    }

    /// Apply a timer tick. Returns whether the tick was accepted; ticks
    /// from any timer other than the armed one are dropped.
    pub fn on_tick(&mut self, tick: Tick) -> bool {
        if self.armed != Some(tick.timer) || !self.playing {
            return false;
        }
        self.step_forward();
        true
    }

    /// Whether a backward step would move the cursor.
    pub fn can_step_backward(&self) -> bool {
        self.sequence.is_some() && self.cursor > 0
    }

    /// Whether a forward step would move the cursor.
    pub fn can_step_forward(&self) -> bool {
        self.cursor + 1 < self.total_steps()
    }

    /// Fraction of the sequence shown so far (0.0 - 1.0).
    pub fn progress(&self) -> f64 {
        match self.total_steps() {
            0 => 0.0,
            1 => 1.0,
            n => self.cursor as f64 / (n - 1) as f64,
        }
    }

    fn finish(&mut self) {
        debug!(cursor = self.cursor, "Reached last step");
        self.playing = false;
        self.rearm();
    }

    /// The only place timers are started or stopped: any previous timer is
    /// stopped first, and a new one is started only while playing.
    fn rearm(&mut self) {
        if let Some(old) = self.armed.take() {
            self.ticker.stop(old);
        }
        if self.playing && self.sequence.is_some() {
            let timer = TimerId(self.next_timer);
            self.next_timer += 1;
            self.ticker.start(timer, self.speed.interval());
            self.armed = Some(timer);
        }
    }
}

/// Playback status for transport controls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackStatus {
    pub state: PlaybackState,
    pub playing: bool,
    pub speed: Speed,
    pub interval_ms: u64,
    pub cursor: usize,
    pub total_steps: usize,
    pub progress: f64,
    pub can_step_backward: bool,
    pub can_step_forward: bool,
}

impl<S: TickSource> From<&PlaybackEngine<S>> for PlaybackStatus {
    fn from(engine: &PlaybackEngine<S>) -> Self {
        Self {
            state: engine.state(),
            playing: engine.playing,
            speed: engine.speed,
            interval_ms: engine.speed.interval().as_millis() as u64,
            cursor: engine.cursor,
            total_steps: engine.total_steps(),
            progress: engine.progress(),
            can_step_backward: engine.can_step_backward(),
            can_step_forward: engine.can_step_forward(),
        }
    }
}
