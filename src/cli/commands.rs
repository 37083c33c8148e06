//! Command definitions for the wallclock CLI.
//!
//! Uses clap derive macro for argument parsing.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::app::DATA_DIR_ENV;
use crate::types::{Theme, TimeFormat};

// ============================================================================
// CLI Structure
// ============================================================================

/// Wallclock - a terminal clock
#[derive(Parser, Debug)]
#[command(
    name = "wallclock",
    version,
    about = "ターミナル時計 (世界時計・アラーム・ストップウォッチ・タイマー)",
    long_about = "ターミナル上で動作するアナログ/デジタル時計。\n\
                  世界時計、アラーム、ストップウォッチ、カウントダウンタイマーを備えています。",
    propagate_version = true
)]
pub struct Cli {
    /// Subcommand to execute (defaults to `watch`)
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory holding the storage file (default: ~/.wallclock)
    #[arg(long, global = true, env = DATA_DIR_ENV, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,
}

// ============================================================================
// Subcommands
// ============================================================================

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Show the live clock
    Watch(WatchArgs),

    /// Print the current time once
    Now,

    /// Print the world clocks once
    World,

    /// Manage alarms
    #[command(subcommand)]
    Alarm(AlarmCommand),

    /// Run the interactive stopwatch
    Stopwatch,

    /// Run the interactive countdown timer
    Timer(TimerArgs),

    /// Show or change preferences
    #[command(subcommand)]
    Settings(SettingsCommand),

    /// Generate shell completion scripts
    Completions {
        /// Shell type for completion script
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Arguments for the watch command
#[derive(Args, Debug, Clone, Default)]
pub struct WatchArgs {
    /// Use the terminal's alternate screen
    #[arg(short, long)]
    pub fullscreen: bool,
}

/// Arguments for the timer command
#[derive(Args, Debug, Clone, Default)]
pub struct TimerArgs {
    /// Countdown duration in minutes (1-1440, default 25)
    #[arg(
        short,
        long,
        value_parser = clap::value_parser!(u32).range(1..=1440)
    )]
    pub minutes: Option<u32>,
}

// ============================================================================
// Alarm Subcommands
// ============================================================================

/// Alarm management commands
#[derive(Subcommand, Debug, Clone)]
pub enum AlarmCommand {
    /// Add an alarm
    Add {
        /// Alarm time (HH:MM, 24-hour)
        time: String,

        /// Alarm label
        #[arg(short, long, value_parser = validate_label)]
        label: Option<String>,
    },

    /// List alarms
    List,

    /// Enable or disable an alarm
    Toggle {
        /// Alarm number as shown by `alarm list`
        #[arg(value_parser = clap::value_parser!(u32).range(1..))]
        number: u32,
    },

    /// Delete an alarm
    Delete {
        /// Alarm number as shown by `alarm list`
        #[arg(value_parser = clap::value_parser!(u32).range(1..))]
        number: u32,
    },
}

// ============================================================================
// Settings Subcommands
// ============================================================================

/// Preference commands
#[derive(Subcommand, Debug, Clone)]
pub enum SettingsCommand {
    /// Show the current preferences
    Show,

    /// Change one or more preferences
    Set(SettingsSetArgs),
}

/// On/off switch value
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Switch {
    On,
    Off,
}

impl Switch {
    pub fn is_on(self) -> bool {
        self == Switch::On
    }
}

/// Arguments for `settings set`
#[derive(Args, Debug, Clone, Default)]
pub struct SettingsSetArgs {
    /// Time format (24h or 12h)
    #[arg(long)]
    pub format: Option<TimeFormat>,

    /// Tick and alarm sounds
    #[arg(long, value_enum)]
    pub sound: Option<Switch>,

    /// Accent color
    #[arg(long, value_enum)]
    pub glow: Option<Switch>,

    /// Continuous second hand
    #[arg(long, value_enum)]
    pub smooth_motion: Option<Switch>,

    /// Digital time line
    #[arg(long, value_enum)]
    pub show_digital: Option<Switch>,

    /// Color theme (dark or light)
    #[arg(long)]
    pub theme: Option<Theme>,
}

impl SettingsSetArgs {
    /// Returns true if no preference was given.
    pub fn is_empty(&self) -> bool {
        self.format.is_none()
            && self.sound.is_none()
            && self.glow.is_none()
            && self.smooth_motion.is_none()
            && self.show_digital.is_none()
            && self.theme.is_none()
    }
}

// ============================================================================
// Validation Functions
// ============================================================================

/// Validates an alarm label.
///
/// - Must not be blank
/// - Must not exceed 100 characters
fn validate_label(s: &str) -> Result<String, String> {
    if s.trim().is_empty() {
        return Err("ラベルは空にできません".to_string());
    }
    if s.chars().count() > 100 {
        return Err("ラベルは100文字以内にしてください".to_string());
    }
    Ok(s.to_string())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // ------------------------------------------------------------------------
    // Cli Tests
    // ------------------------------------------------------------------------

    mod cli_tests {
        use super::*;

        #[test]
        fn test_parse_no_args() {
            let cli = Cli::parse_from(["wallclock"]);
            assert!(cli.command.is_none());
            assert!(!cli.verbose);
        }

        #[test]
        fn test_parse_short_verbose_flag() {
            let cli = Cli::parse_from(["wallclock", "-v", "now"]);
            assert!(cli.verbose);
            assert!(matches!(cli.command, Some(Commands::Now)));
        }

        #[test]
        fn test_parse_data_dir_after_subcommand() {
            let cli = Cli::parse_from(["wallclock", "world", "--data-dir", "/tmp/wc"]);
            assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/wc")));
            assert!(matches!(cli.command, Some(Commands::World)));
        }

        #[test]
        fn test_parse_watch_fullscreen() {
            let cli = Cli::parse_from(["wallclock", "watch", "--fullscreen"]);
            match cli.command {
                Some(Commands::Watch(args)) => assert!(args.fullscreen),
                _ => panic!("Expected Watch command"),
            }

            let cli = Cli::parse_from(["wallclock", "watch"]);
            match cli.command {
                Some(Commands::Watch(args)) => assert!(!args.fullscreen),
                _ => panic!("Expected Watch command"),
            }
        }

        #[test]
        fn test_parse_stopwatch() {
            let cli = Cli::parse_from(["wallclock", "stopwatch"]);
            assert!(matches!(cli.command, Some(Commands::Stopwatch)));
        }

        #[test]
        fn test_parse_completions_zsh() {
            let cli = Cli::parse_from(["wallclock", "completions", "zsh"]);
            match cli.command {
                Some(Commands::Completions { shell }) => {
                    assert_eq!(shell, clap_complete::Shell::Zsh);
                }
                _ => panic!("Expected Completions command"),
            }
        }

        #[test]
        fn test_parse_unknown_command_fails() {
            assert!(Cli::try_parse_from(["wallclock", "snooze"]).is_err());
        }
    }

    // ------------------------------------------------------------------------
    // Timer Command Tests
    // ------------------------------------------------------------------------

    mod timer_args_tests {
        use super::*;

        #[test]
        fn test_parse_timer_default() {
            let cli = Cli::parse_from(["wallclock", "timer"]);
            match cli.command {
                Some(Commands::Timer(args)) => assert_eq!(args.minutes, None),
                _ => panic!("Expected Timer command"),
            }
        }

        #[test]
        fn test_parse_timer_minutes() {
            let cli = Cli::parse_from(["wallclock", "timer", "-m", "3"]);
            match cli.command {
                Some(Commands::Timer(args)) => assert_eq!(args.minutes, Some(3)),
                _ => panic!("Expected Timer command"),
            }
        }

        #[test]
        fn test_parse_timer_zero_minutes_fails() {
            assert!(Cli::try_parse_from(["wallclock", "timer", "--minutes", "0"]).is_err());
            assert!(Cli::try_parse_from(["wallclock", "timer", "--minutes", "1441"]).is_err());
        }
    }

    // ------------------------------------------------------------------------
    // Alarm Command Tests
    // ------------------------------------------------------------------------

    mod alarm_command_tests {
        use super::*;

        #[test]
        fn test_parse_alarm_add() {
            let cli = Cli::parse_from(["wallclock", "alarm", "add", "07:00", "--label", "Wake"]);
            match cli.command {
                Some(Commands::Alarm(AlarmCommand::Add { time, label })) => {
                    assert_eq!(time, "07:00");
                    assert_eq!(label, Some("Wake".to_string()));
                }
                _ => panic!("Expected Alarm Add command"),
            }
        }

        #[test]
        fn test_parse_alarm_add_without_label() {
            let cli = Cli::parse_from(["wallclock", "alarm", "add", "6:30"]);
            match cli.command {
                Some(Commands::Alarm(AlarmCommand::Add { label, .. })) => {
                    assert!(label.is_none());
                }
                _ => panic!("Expected Alarm Add command"),
            }
        }

        #[test]
        fn test_parse_alarm_add_blank_label_fails() {
            let result = Cli::try_parse_from(["wallclock", "alarm", "add", "07:00", "-l", "  "]);
            assert!(result.is_err());
        }

        #[test]
        fn test_parse_alarm_toggle_and_delete() {
            let cli = Cli::parse_from(["wallclock", "alarm", "toggle", "2"]);
            assert!(matches!(
                cli.command,
                Some(Commands::Alarm(AlarmCommand::Toggle { number: 2 }))
            ));

            let cli = Cli::parse_from(["wallclock", "alarm", "delete", "1"]);
            assert!(matches!(
                cli.command,
                Some(Commands::Alarm(AlarmCommand::Delete { number: 1 }))
            ));
        }

        #[test]
        fn test_parse_alarm_number_zero_fails() {
            assert!(Cli::try_parse_from(["wallclock", "alarm", "toggle", "0"]).is_err());
        }
    }

    // ------------------------------------------------------------------------
    // Settings Command Tests
    // ------------------------------------------------------------------------

    mod settings_command_tests {
        use super::*;

        #[test]
        fn test_parse_settings_show() {
            let cli = Cli::parse_from(["wallclock", "settings", "show"]);
            assert!(matches!(
                cli.command,
                Some(Commands::Settings(SettingsCommand::Show))
            ));
        }

        #[test]
        fn test_parse_settings_set_all() {
            let cli = Cli::parse_from([
                "wallclock",
                "settings",
                "set",
                "--format",
                "12h",
                "--sound",
                "off",
                "--glow",
                "on",
                "--smooth-motion",
                "off",
                "--show-digital",
                "off",
                "--theme",
                "light",
            ]);
            match cli.command {
                Some(Commands::Settings(SettingsCommand::Set(args))) => {
                    assert_eq!(args.format, Some(TimeFormat::TwelveHour));
                    assert_eq!(args.sound, Some(Switch::Off));
                    assert_eq!(args.glow, Some(Switch::On));
                    assert_eq!(args.smooth_motion, Some(Switch::Off));
                    assert_eq!(args.show_digital, Some(Switch::Off));
                    assert_eq!(args.theme, Some(Theme::Light));
                    assert!(!args.is_empty());
                }
                _ => panic!("Expected Settings Set command"),
            }
        }

        #[test]
        fn test_parse_settings_set_nothing() {
            let cli = Cli::parse_from(["wallclock", "settings", "set"]);
            match cli.command {
                Some(Commands::Settings(SettingsCommand::Set(args))) => {
                    assert!(args.is_empty());
                }
                _ => panic!("Expected Settings Set command"),
            }
        }

        #[test]
        fn test_parse_settings_invalid_values_fail() {
            assert!(Cli::try_parse_from(["wallclock", "settings", "set", "--format", "24"]).is_err());
            assert!(Cli::try_parse_from(["wallclock", "settings", "set", "--theme", "blue"]).is_err());
            assert!(Cli::try_parse_from(["wallclock", "settings", "set", "--sound", "yes"]).is_err());
        }
    }

    // ------------------------------------------------------------------------
    // Validation Tests
    // ------------------------------------------------------------------------

    mod validation_tests {
        use super::*;

        #[test]
        fn test_validate_label() {
            assert_eq!(validate_label("Wake"), Ok("Wake".to_string()));
            assert!(validate_label("").is_err());
            assert!(validate_label(&"a".repeat(101)).is_err());
            assert!(validate_label(&"あ".repeat(100)).is_ok());
        }
    }
}
