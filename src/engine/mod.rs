//! Stopwatch and countdown timer engines.
//!
//! Both engines are driven from outside: the caller owns the interval (see
//! [`sample_ticker`] and [`TimerEngine::ticker`]) and forwards each tick.
//! State changes are announced on an unbounded event channel.

pub mod stopwatch;
pub mod timer;

pub use stopwatch::{sample_ticker, StopwatchEngine, StopwatchEvent, STOPWATCH_SAMPLE_PERIOD};
pub use timer::{TimerEngine, TimerEvent, TIMER_TICK_PERIOD};
