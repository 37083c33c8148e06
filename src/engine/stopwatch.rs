//! Stopwatch engine.
//!
//! Elapsed time is sampled from a monotonic [`Clock`] on every sample period
//! instead of being accumulated per tick, so late samples never lose time.
//! Pausing folds the running span into a baseline; resuming continues from it.

use std::time::Instant;

use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tokio::time::{interval, Duration, Interval, MissedTickBehavior};

use crate::clock::{Clock, SystemClock};
use crate::types::{StopwatchPhase, StopwatchState};

/// Period at which the elapsed time is sampled while running.
pub const STOPWATCH_SAMPLE_PERIOD: Duration = Duration::from_millis(10);

/// Creates the interval that drives [`StopwatchEngine::on_sample`].
pub fn sample_ticker() -> Interval {
    let mut ticker = interval(STOPWATCH_SAMPLE_PERIOD);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    ticker
}

// ============================================================================
// StopwatchEvent
// ============================================================================

/// Stopwatch events for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopwatchEvent {
    /// Started or resumed
    Started {
        /// Elapsed milliseconds carried over from before
        elapsed_ms: u64,
    },
    /// Paused
    Paused {
        /// Elapsed milliseconds at the moment of pausing
        elapsed_ms: u64,
    },
    /// Cleared back to zero
    Reset,
    /// A lap was recorded
    Lap {
        /// 1-based lap number
        number: usize,
        /// Elapsed milliseconds at the lap
        elapsed_ms: u64,
    },
    /// Periodic sample while running
    Sampled {
        /// Elapsed milliseconds
        elapsed_ms: u64,
    },
}

// ============================================================================
// StopwatchEngine
// ============================================================================

/// Stopwatch engine that measures real elapsed time.
pub struct StopwatchEngine<C: Clock = SystemClock> {
    clock: C,
    state: StopwatchState,
    /// Elapsed milliseconds accumulated before the current run
    baseline_ms: u64,
    /// Instant the current run started, while running
    resumed_at: Option<Instant>,
    event_tx: mpsc::UnboundedSender<StopwatchEvent>,
}

impl StopwatchEngine<SystemClock> {
    /// Creates a stopped stopwatch on the system clock.
    pub fn new(event_tx: mpsc::UnboundedSender<StopwatchEvent>) -> Self {
        Self::with_clock(SystemClock, event_tx)
    }
}

impl<C: Clock> StopwatchEngine<C> {
    /// Creates a stopped stopwatch reading from `clock`.
    pub fn with_clock(clock: C, event_tx: mpsc::UnboundedSender<StopwatchEvent>) -> Self {
        Self {
            clock,
            state: StopwatchState::default(),
            baseline_ms: 0,
            resumed_at: None,
            event_tx,
        }
    }

    fn running_span_ms(&self) -> u64 {
        self.resumed_at
            .map(|at| self.clock.now().saturating_duration_since(at).as_millis() as u64)
            .unwrap_or(0)
    }

    /// Returns the elapsed time right now without recording a sample.
    pub fn elapsed_ms(&self) -> u64 {
        self.baseline_ms + self.running_span_ms()
    }

    /// Records the current elapsed time into the state.
    ///
    /// Returns the sampled value, or `None` when not running.
    pub fn sample(&mut self) -> Option<u64> {
        if !self.state.is_running() {
            return None;
        }
        self.state.elapsed_ms = self.elapsed_ms();
        Some(self.state.elapsed_ms)
    }

    /// Samples and announces the elapsed time if running.
    pub fn on_sample(&mut self) -> Result<Option<u64>> {
        let Some(elapsed_ms) = self.sample() else {
            return Ok(None);
        };

        self.event_tx
            .send(StopwatchEvent::Sampled { elapsed_ms })
            .context("Failed to send sampled event")?;

        Ok(Some(elapsed_ms))
    }

    /// Starts or resumes the stopwatch from the accumulated elapsed time.
    ///
    /// # Errors
    ///
    /// Returns an error if the stopwatch is already running.
    pub fn start(&mut self) -> Result<()> {
        if self.state.is_running() {
            anyhow::bail!("ストップウォッチは既に実行中です");
        }

        self.baseline_ms = self.state.elapsed_ms;
        self.resumed_at = Some(self.clock.now());
        self.state.phase = StopwatchPhase::Running;

        tracing::debug!("Stopwatch started at {} ms", self.baseline_ms);

        self.event_tx
            .send(StopwatchEvent::Started {
                elapsed_ms: self.baseline_ms,
            })
            .context("Failed to send started event")?;

        Ok(())
    }

    /// Pauses the stopwatch, keeping the elapsed time.
    ///
    /// # Errors
    ///
    /// Returns an error if the stopwatch is not running.
    pub fn pause(&mut self) -> Result<()> {
        if !self.state.is_running() {
            anyhow::bail!("ストップウォッチは実行されていません");
        }

        let elapsed_ms = self.elapsed_ms();
        self.state.elapsed_ms = elapsed_ms;
        self.baseline_ms = elapsed_ms;
        self.resumed_at = None;
        self.state.phase = StopwatchPhase::Paused;

        self.event_tx
            .send(StopwatchEvent::Paused { elapsed_ms })
            .context("Failed to send paused event")?;

        Ok(())
    }

    /// Pauses a running stopwatch, otherwise starts it.
    pub fn toggle(&mut self) -> Result<()> {
        if self.state.is_running() {
            self.pause()
        } else {
            self.start()
        }
    }

    /// Stops and clears the elapsed time and laps.
    ///
    /// Resetting a pristine stopwatch changes nothing and sends no event.
    pub fn reset(&mut self) -> Result<()> {
        if self.state.is_pristine() {
            return Ok(());
        }

        self.state = StopwatchState::default();
        self.baseline_ms = 0;
        self.resumed_at = None;

        self.event_tx
            .send(StopwatchEvent::Reset)
            .context("Failed to send reset event")?;

        Ok(())
    }

    /// Records a lap at the current elapsed time.
    ///
    /// Returns the lap value, or `None` without recording anything when the
    /// stopwatch is not running.
    pub fn lap(&mut self) -> Result<Option<u64>> {
        let Some(elapsed_ms) = self.sample() else {
            return Ok(None);
        };

        self.state.laps.push(elapsed_ms);
        let number = self.state.laps.len();

        self.event_tx
            .send(StopwatchEvent::Lap { number, elapsed_ms })
            .context("Failed to send lap event")?;

        Ok(Some(elapsed_ms))
    }

    /// Returns a reference to the current stopwatch state.
    pub fn get_state(&self) -> &StopwatchState {
        &self.state
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    fn create_engine() -> (
        StopwatchEngine<ManualClock>,
        ManualClock,
        mpsc::UnboundedReceiver<StopwatchEvent>,
    ) {
        let clock = ManualClock::new();
        let (tx, rx) = mpsc::unbounded_channel();
        (StopwatchEngine::with_clock(clock.clone(), tx), clock, rx)
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<StopwatchEvent>) -> Vec<StopwatchEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    mod stopwatch_engine_tests {
        use super::*;

        #[test]
        fn test_new_engine_is_stopped() {
            let (engine, _clock, _rx) = create_engine();
            assert!(engine.get_state().is_pristine());
            assert_eq!(engine.elapsed_ms(), 0);
        }

        #[test]
        fn test_sample_reads_real_elapsed_time() {
            let (mut engine, clock, _rx) = create_engine();
            engine.start().unwrap();

            clock.advance_ms(1500);

            assert_eq!(engine.sample(), Some(1500));
            assert_eq!(engine.get_state().elapsed_ms, 1500);
        }

        #[test]
        fn test_sample_when_stopped() {
            let (mut engine, clock, _rx) = create_engine();
            clock.advance_ms(1000);
            assert_eq!(engine.sample(), None);
            assert_eq!(engine.get_state().elapsed_ms, 0);
        }

        #[test]
        fn test_pause_and_resume_accumulate() {
            let (mut engine, clock, _rx) = create_engine();

            engine.start().unwrap();
            clock.advance_ms(1000);
            engine.pause().unwrap();

            // Time spent paused is not counted
            clock.advance_ms(5000);
            assert_eq!(engine.elapsed_ms(), 1000);

            engine.start().unwrap();
            clock.advance_ms(2000);

            assert_eq!(engine.sample(), Some(3000));
        }

        #[test]
        fn test_start_already_running() {
            let (mut engine, _clock, _rx) = create_engine();
            engine.start().unwrap();

            let result = engine.start();

            assert!(result.is_err());
            assert!(result.unwrap_err().to_string().contains("既に実行中"));
        }

        #[test]
        fn test_pause_not_running() {
            let (mut engine, _clock, _rx) = create_engine();
            let result = engine.pause();
            assert!(result.is_err());
            assert!(result.unwrap_err().to_string().contains("実行されていません"));
        }

        #[test]
        fn test_toggle() {
            let (mut engine, clock, _rx) = create_engine();
            engine.toggle().unwrap();
            assert_eq!(engine.get_state().phase, StopwatchPhase::Running);
            clock.advance_ms(250);
            engine.toggle().unwrap();
            assert_eq!(engine.get_state().phase, StopwatchPhase::Paused);
            assert_eq!(engine.get_state().elapsed_ms, 250);
        }

        #[test]
        fn test_lap_records_elapsed() {
            let (mut engine, clock, mut rx) = create_engine();
            engine.start().unwrap();
            drain(&mut rx);

            clock.advance_ms(1200);
            assert_eq!(engine.lap().unwrap(), Some(1200));
            clock.advance_ms(800);
            assert_eq!(engine.lap().unwrap(), Some(2000));

            assert_eq!(engine.get_state().laps, vec![1200, 2000]);
            assert_eq!(
                drain(&mut rx),
                vec![
                    StopwatchEvent::Lap {
                        number: 1,
                        elapsed_ms: 1200
                    },
                    StopwatchEvent::Lap {
                        number: 2,
                        elapsed_ms: 2000
                    },
                ]
            );
        }

        #[test]
        fn test_lap_ignored_unless_running() {
            let (mut engine, clock, mut rx) = create_engine();
            assert_eq!(engine.lap().unwrap(), None);

            engine.start().unwrap();
            clock.advance_ms(100);
            engine.pause().unwrap();
            drain(&mut rx);

            assert_eq!(engine.lap().unwrap(), None);
            assert!(engine.get_state().laps.is_empty());
            assert!(rx.try_recv().is_err());
        }

        #[test]
        fn test_reset_clears_everything() {
            let (mut engine, clock, _rx) = create_engine();
            engine.start().unwrap();
            clock.advance_ms(700);
            engine.lap().unwrap();

            engine.reset().unwrap();

            assert!(engine.get_state().is_pristine());
            clock.advance_ms(700);
            assert_eq!(engine.elapsed_ms(), 0);
        }

        #[test]
        fn test_reset_twice_is_noop() {
            let (mut engine, clock, mut rx) = create_engine();
            engine.start().unwrap();
            clock.advance_ms(300);
            engine.reset().unwrap();
            drain(&mut rx);

            engine.reset().unwrap();

            assert!(engine.get_state().is_pristine());
            assert!(rx.try_recv().is_err());
        }

        #[test]
        fn test_on_sample_emits_event() {
            let (mut engine, clock, mut rx) = create_engine();
            engine.start().unwrap();
            drain(&mut rx);

            clock.advance_ms(10);
            assert_eq!(engine.on_sample().unwrap(), Some(10));
            assert_eq!(
                rx.try_recv().unwrap(),
                StopwatchEvent::Sampled { elapsed_ms: 10 }
            );
        }
    }
}
