//! Performance tests for the clock's per-tick work.
//!
//! The clock face is recomputed every second and the stopwatch samples every
//! 10 ms, so both must stay far below their period:
//! - A full clock frame (angles, world clocks, alarm matching)
//! - Alarm matching over a large alarm list
//! - A stopwatch sample
//! - Rendering a frame to text
//!
//! Targets are generous so debug builds on loaded CI machines still pass.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{TimeZone, Utc};
use tokio::sync::mpsc;

use wallclock::app::ClockApp;
use wallclock::cli::Display;
use wallclock::engine::StopwatchEngine;
use wallclock::store::MemoryStore;

// ============================================================================
// Test Helpers
// ============================================================================

/// Performance measurement result.
#[derive(Debug)]
struct PerfResult {
    operation: String,
    duration_ms: u128,
    target_ms: u128,
    passed: bool,
}

impl PerfResult {
    fn new(operation: &str, duration: Duration, target_ms: u128) -> Self {
        let duration_ms = duration.as_millis();
        Self {
            operation: operation.to_string(),
            duration_ms,
            target_ms,
            passed: duration_ms <= target_ms,
        }
    }

    fn assert_passed(&self) {
        eprintln!(
            "Performance: {} completed in {}ms (target: {}ms)",
            self.operation, self.duration_ms, self.target_ms
        );
        assert!(
            self.passed,
            "Performance test failed: {} took {}ms (target: {}ms)",
            self.operation, self.duration_ms, self.target_ms
        );
    }
}

fn create_app() -> ClockApp<Arc<MemoryStore>> {
    ClockApp::load(Arc::new(MemoryStore::new()))
}

// ============================================================================
// Clock Frame
// ============================================================================

/// 1000 frames must take well under the 1000 seconds they represent.
#[test]
fn test_clock_frame_time() {
    let mut app = create_app();
    let base = Utc.with_ymd_and_hms(2026, 10, 19, 0, 0, 0).unwrap();

    let start = Instant::now();
    for second in 0..1000 {
        let frame = app.tick(&(base + chrono::Duration::seconds(second)));
        assert_eq!(frame.world.len(), 6);
    }

    PerfResult::new("1000 clock frames", start.elapsed(), 2000).assert_passed();
}

#[test]
fn test_alarm_matching_with_many_alarms() {
    let mut app = create_app();
    for minute in 0..500 {
        let time = format!("{:02}:{:02}", (minute / 60) % 24, minute % 60);
        app.alarms_mut().add(&time, None).unwrap();
    }
    let now = Utc.with_ymd_and_hms(2026, 10, 19, 3, 0, 0).unwrap();

    let start = Instant::now();
    let frame = app.tick(&now);
    let duration = start.elapsed();

    assert_eq!(frame.fired.len(), 1);
    PerfResult::new("Frame with 500 alarms", duration, 100).assert_passed();
}

// ============================================================================
// Stopwatch Sampling
// ============================================================================

/// Each sample must fit comfortably in the 10 ms sample period.
#[test]
fn test_stopwatch_sample_time() {
    let (tx, _rx) = mpsc::unbounded_channel();
    let mut engine = StopwatchEngine::new(tx);
    engine.start().unwrap();

    let start = Instant::now();
    for _ in 0..10_000 {
        engine.on_sample().unwrap();
    }

    PerfResult::new("10000 stopwatch samples", start.elapsed(), 500).assert_passed();
}

// ============================================================================
// Rendering
// ============================================================================

#[test]
fn test_frame_render_time() {
    let mut app = create_app();
    let frame = app.tick(&Utc.with_ymd_and_hms(2026, 10, 19, 10, 10, 30).unwrap());

    let start = Instant::now();
    for _ in 0..1000 {
        let text = Display::render_frame(&frame, app.preferences());
        assert!(!text.is_empty());
    }

    PerfResult::new("1000 frame renders", start.elapsed(), 2000).assert_passed();
}
