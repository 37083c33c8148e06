//! CLI module for wallclock.
//!
//! This module provides the command-line interface:
//! - `commands`: Command definitions using clap derive
//! - `display`: Output formatting and terminal control
//! - `runner`: Interactive loops for watch, stopwatch and timer

pub mod commands;
pub mod display;
pub mod runner;

pub use commands::{
    AlarmCommand, Cli, Commands, SettingsCommand, SettingsSetArgs, Switch, TimerArgs, WatchArgs,
};
pub use display::{AlternateScreen, Display, DisplayError};
pub use runner::{run_stopwatch, run_timer, run_watch};
