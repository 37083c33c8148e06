//! Display utilities for the wallclock CLI.
//!
//! This module provides formatted output for:
//! - The analog dial and the clock frame
//! - World clocks, alarms and preferences
//! - Stopwatch and timer progress
//! - Alerts and error messages
//!
//! `render_*` functions are pure and return strings; `show_*` functions
//! print them.

use std::io::{self, IsTerminal, Write};

use thiserror::Error;

use crate::alarm::Alarm;
use crate::app::{Alert, ClockFrame};
use crate::clock::{format_countdown, format_stopwatch, HandAngles, WorldClockReading};
use crate::engine::{StopwatchEvent, TimerEvent};
use crate::types::{Preferences, Theme};

/// Radius of the analog dial in rows (columns are doubled).
pub const DIAL_RADIUS: usize = 6;

/// Key help for `watch`.
pub const WATCH_KEYS: &str =
    "[f]形式 [s]サウンド [g]グロー [t]テーマ [m]スムーズ [d]デジタル [q]終了 (Enterで確定)";

/// Key help for `stopwatch`.
pub const STOPWATCH_KEYS: &str = "[Enter/s]開始・一時停止 [l]ラップ [r]リセット [q]終了";

/// Key help for `timer`.
pub const TIMER_KEYS: &str = "[s]開始・一時停止 [r]リセット [数字]分数を設定 [q]終了";

const ANSI_RESET: &str = "\x1b[0m";
const ANSI_CLEAR_LINE: &str = "\x1b[K";
const ANSI_HOME_CLEAR: &str = "\x1b[H\x1b[2J";
const ENTER_ALT_SCREEN: &str = "\x1b[?1049h\x1b[?25l";
const LEAVE_ALT_SCREEN: &str = "\x1b[?25h\x1b[?1049l";

// ============================================================================
// DisplayError
// ============================================================================

/// Errors raised by terminal control.
#[derive(Debug, Error)]
pub enum DisplayError {
    /// The alternate screen could not be entered.
    #[error("全画面表示を開始できません: {0}")]
    FullscreenRequestFailure(String),
}

// ============================================================================
// AlternateScreen
// ============================================================================

/// Guard that keeps the terminal on its alternate screen until dropped.
#[derive(Debug)]
pub struct AlternateScreen {
    _private: (),
}

impl AlternateScreen {
    /// Switches stdout to the alternate screen and hides the cursor.
    ///
    /// # Errors
    ///
    /// Returns [`DisplayError::FullscreenRequestFailure`] if stdout is not a
    /// terminal or cannot be written.
    pub fn enter() -> Result<Self, DisplayError> {
        let mut stdout = io::stdout();
        if !stdout.is_terminal() {
            return Err(DisplayError::FullscreenRequestFailure(
                "標準出力が端末ではありません".to_string(),
            ));
        }

        stdout
            .write_all(ENTER_ALT_SCREEN.as_bytes())
            .and_then(|()| stdout.flush())
            .map_err(|e| DisplayError::FullscreenRequestFailure(e.to_string()))?;

        Ok(Self { _private: () })
    }
}

impl Drop for AlternateScreen {
    fn drop(&mut self) {
        let mut stdout = io::stdout();
        let _ = stdout.write_all(LEAVE_ALT_SCREEN.as_bytes());
        let _ = stdout.flush();
    }
}

// ============================================================================
// Display
// ============================================================================

/// Display utilities for CLI output.
pub struct Display;

impl Display {
    // ------------------------------------------------------------------------
    // Rendering
    // ------------------------------------------------------------------------

    /// Wraps `text` in the accent color when glow is enabled.
    pub fn accent(text: &str, prefs: &Preferences) -> String {
        if !prefs.glow_enabled {
            return text.to_string();
        }
        let color = match prefs.theme {
            Theme::Dark => "\x1b[96m",
            Theme::Light => "\x1b[34m",
        };
        format!("{}{}{}", color, text, ANSI_RESET)
    }

    /// Draws the analog dial as text.
    ///
    /// Hour marks are `+`, the hour hand `#`, the minute hand `*` and the
    /// second hand `.`. Later hands are drawn over earlier ones.
    pub fn render_dial(angles: &HandAngles) -> Vec<String> {
        let radius = DIAL_RADIUS as f64;
        let rows = DIAL_RADIUS * 2 + 1;
        let cols = DIAL_RADIUS * 4 + 1;
        let mut grid = vec![vec![' '; cols]; rows];

        let mut plot = |degrees: f64, length: f64, mark: char| {
            let (sin, cos) = degrees.to_radians().sin_cos();
            let col = (radius * 2.0 + length * sin * 2.0).round();
            let row = (radius - length * cos).round();
            if (0.0..rows as f64).contains(&row) && (0.0..cols as f64).contains(&col) {
                grid[row as usize][col as usize] = mark;
            }
        };

        for hour in 0..12 {
            plot(f64::from(hour) * 30.0, radius, '+');
        }

        let hands = [
            (angles.second, radius * 0.9, '.'),
            (angles.minute, radius * 0.8, '*'),
            (angles.hour, radius * 0.5, '#'),
        ];
        for (degrees, length, mark) in hands {
            let mut step = 1.0;
            while step <= length {
                plot(degrees, step, mark);
                step += 0.5;
            }
        }

        plot(0.0, 0.0, 'o');

        grid.into_iter()
            .map(|row| row.into_iter().collect::<String>().trim_end().to_string())
            .collect()
    }

    /// Renders the full clock frame (dial, digital line, date, world clocks).
    pub fn render_frame(frame: &ClockFrame, prefs: &Preferences) -> String {
        let mut lines: Vec<String> = Self::render_dial(&frame.angles)
            .iter()
            .map(|line| Self::accent(line, prefs))
            .collect();

        lines.push(String::new());
        if let Some(digital) = &frame.digital {
            lines.push(Self::accent(digital, prefs));
        }
        lines.push(frame.date.clone());
        lines.push(String::new());
        lines.push(Self::render_world(&frame.world));

        lines.join("\n")
    }

    /// Renders the one-line form of a frame used outside fullscreen.
    pub fn render_status_line(frame: &ClockFrame) -> String {
        match &frame.digital {
            Some(digital) => format!("{}  {}", digital, frame.date),
            None => frame.date.clone(),
        }
    }

    /// Renders one line per world clock.
    pub fn render_world(readings: &[WorldClockReading]) -> String {
        readings
            .iter()
            .map(|r| format!("{:<10} {:<12} {}", r.city, r.zone_label, r.time))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Renders the numbered alarm list.
    pub fn render_alarm_list(alarms: &[Alarm]) -> String {
        if alarms.is_empty() {
            return "アラームは登録されていません".to_string();
        }

        alarms
            .iter()
            .enumerate()
            .map(|(i, alarm)| {
                let mark = if alarm.active { "ON " } else { "OFF" };
                format!("{:>2}. [{}] {}  {}", i + 1, mark, alarm.time, alarm.label)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Renders recorded laps, oldest first.
    pub fn render_laps(laps: &[u64]) -> String {
        laps.iter()
            .enumerate()
            .map(|(i, ms)| format!("ラップ {}: {}", i + 1, format_stopwatch(*ms)))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Renders the preferences.
    pub fn render_settings(prefs: &Preferences) -> String {
        let on_off = |value: bool| if value { "on" } else { "off" };
        [
            format!("時刻形式: {}", prefs.time_format),
            format!("サウンド: {}", on_off(prefs.sound_enabled)),
            format!("グロー: {}", on_off(prefs.glow_enabled)),
            format!("スムーズモーション: {}", on_off(prefs.smooth_motion)),
            format!("デジタル表示: {}", on_off(prefs.show_digital)),
            format!("テーマ: {}", prefs.theme),
        ]
        .join("\n")
    }

    /// Renders an alert banner.
    pub fn render_alert(alert: &Alert) -> String {
        match alert {
            Alert::Alarm { time, label } => format!("⏰ {} {}", time, label),
            Alert::TimerComplete => "⏲ タイマーが終了しました".to_string(),
        }
    }

    /// Renders a stopwatch state change. Samples return None.
    pub fn render_stopwatch_event(event: &StopwatchEvent) -> Option<String> {
        match event {
            StopwatchEvent::Started { elapsed_ms } => {
                Some(format!("> 開始 {}", format_stopwatch(*elapsed_ms)))
            }
            StopwatchEvent::Paused { elapsed_ms } => {
                Some(format!("|| 一時停止 {}", format_stopwatch(*elapsed_ms)))
            }
            StopwatchEvent::Reset => Some("[] リセットしました".to_string()),
            StopwatchEvent::Lap { number, elapsed_ms } => {
                Some(format!("ラップ {}: {}", number, format_stopwatch(*elapsed_ms)))
            }
            StopwatchEvent::Sampled { .. } => None,
        }
    }

    /// Renders a timer state change. Ticks return None.
    pub fn render_timer_event(event: &TimerEvent) -> Option<String> {
        match event {
            TimerEvent::Started { remaining_ms } => {
                Some(format!("> 開始 {}", format_countdown(*remaining_ms)))
            }
            TimerEvent::Paused { remaining_ms } => {
                Some(format!("|| 一時停止 {}", format_countdown(*remaining_ms)))
            }
            TimerEvent::Reset { remaining_ms } => {
                Some(format!("[] リセット {}", format_countdown(*remaining_ms)))
            }
            TimerEvent::DurationSet { minutes } => {
                Some(format!("タイマーを{}分に設定しました", minutes))
            }
            TimerEvent::Completed => Some(Self::render_alert(&Alert::TimerComplete)),
            TimerEvent::Tick { .. } => None,
        }
    }

    // ------------------------------------------------------------------------
    // Output
    // ------------------------------------------------------------------------

    /// Redraws the whole screen with the frame and the key help.
    pub fn show_frame(frame: &ClockFrame, prefs: &Preferences) {
        println!(
            "{}{}\n\n{}",
            ANSI_HOME_CLEAR,
            Self::render_frame(frame, prefs),
            WATCH_KEYS
        );
    }

    /// Overwrites the current line with `text`.
    pub fn show_inline(text: &str) {
        let mut stdout = io::stdout();
        let _ = write!(stdout, "\r{}{}", text, ANSI_CLEAR_LINE);
        let _ = stdout.flush();
    }

    /// Prints the frame once, for `now`.
    pub fn show_now(frame: &ClockFrame, prefs: &Preferences) {
        println!("{}", Self::render_frame(frame, prefs));
    }

    /// Prints the world clocks.
    pub fn show_world(readings: &[WorldClockReading]) {
        println!("{}", Self::render_world(readings));
    }

    /// Prints the alarm list.
    pub fn show_alarm_list(alarms: &[Alarm]) {
        println!("{}", Self::render_alarm_list(alarms));
    }

    /// Shows a success message for alarm creation.
    pub fn show_alarm_added(alarm: &Alarm) {
        println!("* アラームを追加しました: {}  {}", alarm.time, alarm.label);
    }

    /// Shows a success message for enabling or disabling an alarm.
    pub fn show_alarm_toggled(alarm: &Alarm) {
        let state = if alarm.active { "有効" } else { "無効" };
        println!("* アラームを{}にしました: {}  {}", state, alarm.time, alarm.label);
    }

    /// Shows a success message for alarm deletion.
    pub fn show_alarm_deleted(alarm: &Alarm) {
        println!("* アラームを削除しました: {}  {}", alarm.time, alarm.label);
    }

    /// Prints the preferences.
    pub fn show_settings(prefs: &Preferences) {
        println!("{}", Self::render_settings(prefs));
    }

    /// Prints an alert banner on its own line.
    pub fn show_alert(alert: &Alert) {
        println!("\n{}", Self::render_alert(alert));
    }

    /// Prints a line below any inline status.
    pub fn show_message(message: &str) {
        println!("\n{}", message);
    }

    /// Shows an error message.
    pub fn show_error(message: &str) {
        eprintln!("エラー: {}", message);
    }
}

// ============================================================================
// Tests
// ============================================================================
