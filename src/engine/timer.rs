//! Countdown timer engine.
//!
//! This module provides the countdown functionality:
//! - State transitions (Idle → Running ⇄ Paused → Expired)
//! - Fixed-step countdown driven by a 1-second tokio interval
//! - Event firing for display, sounds and notifications
//!
//! The remaining time is decremented by a fixed 1000 ms per tick rather than
//! sampled from the clock. Delayed ticks therefore stretch the countdown;
//! the stopwatch, in contrast, samples real elapsed time.

use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tokio::time::{interval, Duration, Interval, MissedTickBehavior};

use crate::types::{TimerPhase, TimerState};

/// Period of the countdown tick.
pub const TIMER_TICK_PERIOD: Duration = Duration::from_secs(1);

// ============================================================================
// TimerEvent
// ============================================================================

/// Timer events for display and alerts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerEvent {
    /// Countdown started or resumed
    Started {
        /// Remaining milliseconds
        remaining_ms: i64,
    },
    /// Countdown paused
    Paused {
        /// Remaining milliseconds
        remaining_ms: i64,
    },
    /// Timer returned to idle
    Reset {
        /// Restored milliseconds
        remaining_ms: i64,
    },
    /// A new duration was set
    DurationSet {
        /// Duration in minutes
        minutes: u32,
    },
    /// One second elapsed (tick)
    Tick {
        /// Remaining milliseconds
        remaining_ms: i64,
    },
    /// The countdown reached zero
    Completed,
}

// ============================================================================
// TimerEngine
// ============================================================================

/// Timer engine that manages the countdown state and events.
pub struct TimerEngine {
    /// Current timer state
    state: TimerState,
    /// Event sender channel
    event_tx: mpsc::UnboundedSender<TimerEvent>,
}

impl TimerEngine {
    /// Creates an idle TimerEngine with no duration.
    pub fn new(event_tx: mpsc::UnboundedSender<TimerEvent>) -> Self {
        Self {
            state: TimerState::new(),
            event_tx,
        }
    }

    /// Creates the interval that drives [`TimerEngine::tick`].
    ///
    /// The first tick fires one full period after creation.
    pub fn ticker() -> Interval {
        let mut ticker = interval(TIMER_TICK_PERIOD);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        ticker.reset();
        ticker
    }

    /// Applies one countdown step.
    ///
    /// Returns true if this tick expired the timer. Does nothing unless the
    /// timer is running.
    pub fn tick(&mut self) -> Result<bool> {
        if !self.state.is_running() {
            return Ok(false);
        }

        let completed = self.state.tick();

        self.event_tx
            .send(TimerEvent::Tick {
                remaining_ms: self.state.remaining_ms,
            })
            .context("Failed to send tick event")?;

        if completed {
            tracing::info!("Timer completed");
            self.event_tx
                .send(TimerEvent::Completed)
                .context("Failed to send completed event")?;
        }

        Ok(completed)
    }

    /// Starts or resumes the countdown.
    ///
    /// # Errors
    ///
    /// Returns an error if the timer is already running or has no time left.
    pub fn start(&mut self) -> Result<()> {
        if self.state.is_running() {
            anyhow::bail!("タイマーは既に実行中です");
        }
        if self.state.remaining_ms <= 0 {
            anyhow::bail!("タイマーの残り時間がありません");
        }

        self.state.start();

        self.event_tx
            .send(TimerEvent::Started {
                remaining_ms: self.state.remaining_ms,
            })
            .context("Failed to send started event")?;

        Ok(())
    }

    /// Pauses the countdown.
    ///
    /// # Errors
    ///
    /// Returns an error if the timer is not running.
    pub fn pause(&mut self) -> Result<()> {
        if !self.state.is_running() {
            anyhow::bail!("タイマーは実行されていません");
        }

        self.state.pause();

        self.event_tx
            .send(TimerEvent::Paused {
                remaining_ms: self.state.remaining_ms,
            })
            .context("Failed to send paused event")?;

        Ok(())
    }

    /// Pauses a running timer, otherwise starts it.
    ///
    /// # Errors
    ///
    /// See [`TimerEngine::start`].
    pub fn toggle(&mut self) -> Result<()> {
        if self.state.is_running() {
            self.pause()
        } else {
            self.start()
        }
    }

    /// Returns to idle with the original duration.
    ///
    /// Resetting an already reset timer changes nothing and sends no event.
    pub fn reset(&mut self) -> Result<()> {
        let before = self.state.clone();
        self.state.reset();
        if self.state == before {
            return Ok(());
        }

        self.event_tx
            .send(TimerEvent::Reset {
                remaining_ms: self.state.remaining_ms,
            })
            .context("Failed to send reset event")?;

        Ok(())
    }

    /// Sets a new duration and returns to idle.
    ///
    /// # Errors
    ///
    /// Returns an error if `minutes` is zero.
    pub fn set_duration(&mut self, minutes: u32) -> Result<()> {
        if minutes == 0 {
            anyhow::bail!("タイマーは1分以上で設定してください");
        }

        self.state.set_duration(minutes);

        self.event_tx
            .send(TimerEvent::DurationSet { minutes })
            .context("Failed to send duration set event")?;

        Ok(())
    }

    /// Returns a reference to the current timer state.
    pub fn get_state(&self) -> &TimerState {
        &self.state
    }

    /// Returns true if the countdown has reached zero.
    pub fn is_expired(&self) -> bool {
        self.state.phase == TimerPhase::Expired
    }

    /// Returns a mutable reference to the timer state (for testing).
    #[cfg(test)]
    pub fn get_state_mut(&mut self) -> &mut TimerState {
        &mut self.state
    }
}

// ============================================================================
// Tests
// ============================================================================
