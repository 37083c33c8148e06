//! Wallclock - a terminal clock
//!
//! An analog/digital clock for the terminal with:
//! - World clocks for a fixed set of cities
//! - Alarms that fire once in their minute
//! - A stopwatch with laps and a countdown timer

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{Local, Utc};
use clap::{CommandFactory, Parser};
use tokio::io::BufReader;

use wallclock::app::{AlertDispatcher, AppConfig, ClockApp};
use wallclock::cli::{
    run_stopwatch, run_timer, run_watch, AlarmCommand, Cli, Commands, Display, SettingsCommand,
    SettingsSetArgs,
};
use wallclock::notification::PlatformNotifier;
use wallclock::sound::{try_create_player, RodioSoundPlayer};
use wallclock::store::FileStore;

type Dispatcher = AlertDispatcher<Arc<RodioSoundPlayer>, PlatformNotifier>;

/// Main entry point
#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    init_tracing(cli.verbose);

    // Execute command
    let interactive = matches!(
        cli.command,
        None | Some(Commands::Watch(_) | Commands::Stopwatch | Commands::Timer(_))
    );
    if let Err(e) = execute(cli).await {
        Display::show_error(&format!("{:#}", e));
        std::process::exit(1);
    }

    // A pending stdin read would otherwise keep the runtime from shutting down
    if interactive {
        std::process::exit(0);
    }
}

/// Initializes the tracing subscriber for logging.
///
/// Logs go to stderr so they do not mix with rendered frames.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

/// Executes the CLI command.
async fn execute(cli: Cli) -> Result<()> {
    if cli.verbose {
        tracing::info!("Verbose mode enabled");
    }

    let config = AppConfig::resolve(cli.data_dir)?;
    tracing::debug!("Data directory: {}", config.data_dir.display());

    match cli.command {
        None => {
            let mut app = ClockApp::load(config.open_store()?);
            run_watch(&mut app, &create_dispatcher(), stdin(), false).await?;
        }
        Some(Commands::Watch(args)) => {
            let mut app = ClockApp::load(config.open_store()?);
            run_watch(&mut app, &create_dispatcher(), stdin(), args.fullscreen).await?;
        }
        Some(Commands::Now) => {
            let mut app = ClockApp::load(config.open_store()?);
            let frame = app.tick(&Local::now());
            Display::show_now(&frame, app.preferences());
        }
        Some(Commands::World) => {
            let app = ClockApp::load(config.open_store()?);
            Display::show_world(&app.world_clocks(&Utc::now()));
        }
        Some(Commands::Alarm(command)) => {
            let app = ClockApp::load(config.open_store()?);
            execute_alarm(app, command)?;
        }
        Some(Commands::Stopwatch) => {
            run_stopwatch(stdin()).await?;
        }
        Some(Commands::Timer(args)) => {
            let app = ClockApp::load(config.open_store()?);
            let sound_enabled = app.preferences().sound_enabled;
            run_timer(&create_dispatcher(), sound_enabled, args.minutes, stdin()).await?;
        }
        Some(Commands::Settings(command)) => {
            let app = ClockApp::load(config.open_store()?);
            execute_settings(app, command)?;
        }
        Some(Commands::Completions { shell }) => {
            generate_completions(shell);
        }
    }

    Ok(())
}

/// Executes an alarm subcommand.
fn execute_alarm(mut app: ClockApp<Arc<FileStore>>, command: AlarmCommand) -> Result<()> {
    let alarms = app.alarms_mut();

    match command {
        AlarmCommand::Add { time, label } => {
            let alarm = alarms.add(&time, label.as_deref())?;
            Display::show_alarm_added(&alarm);
        }
        AlarmCommand::List => {
            Display::show_alarm_list(alarms.alarms());
        }
        AlarmCommand::Toggle { number } => {
            let index = list_index(number);
            alarms.toggle_at(index)?;
            let alarm = alarms
                .alarms()
                .get(index)
                .context("切り替えたアラームが見つかりません")?;
            Display::show_alarm_toggled(alarm);
        }
        AlarmCommand::Delete { number } => {
            let alarm = alarms.delete_at(list_index(number))?;
            Display::show_alarm_deleted(&alarm);
        }
    }

    Ok(())
}

/// Converts a 1-based list number into an index.
fn list_index(number: u32) -> usize {
    (number as usize).saturating_sub(1)
}

/// Executes a settings subcommand.
fn execute_settings(mut app: ClockApp<Arc<FileStore>>, command: SettingsCommand) -> Result<()> {
    match command {
        SettingsCommand::Show => {}
        SettingsCommand::Set(args) => apply_settings(&mut app, &args)?,
    }

    Display::show_settings(app.preferences());
    Ok(())
}

/// Persists every preference given in `args`.
fn apply_settings(app: &mut ClockApp<Arc<FileStore>>, args: &SettingsSetArgs) -> Result<()> {
    if args.is_empty() {
        anyhow::bail!("変更する設定を指定してください (wallclock settings set --help)");
    }

    let settings = app.settings_mut();
    if let Some(format) = args.format {
        settings.set_time_format(format)?;
    }
    if let Some(sound) = args.sound {
        settings.set_sound(sound.is_on())?;
    }
    if let Some(glow) = args.glow {
        settings.set_glow(glow.is_on())?;
    }
    if let Some(smooth_motion) = args.smooth_motion {
        settings.set_smooth_motion(smooth_motion.is_on())?;
    }
    if let Some(show_digital) = args.show_digital {
        settings.set_show_digital(show_digital.is_on())?;
    }
    if let Some(theme) = args.theme {
        settings.set_theme(theme)?;
    }

    Ok(())
}

/// Creates the alert dispatcher for interactive commands.
///
/// Without an audio device alerts fall back to notifications only.
fn create_dispatcher() -> Dispatcher {
    AlertDispatcher::new(try_create_player(false), PlatformNotifier::default())
}

fn stdin() -> BufReader<tokio::io::Stdin> {
    BufReader::new(tokio::io::stdin())
}

/// Generates shell completion scripts.
fn generate_completions(shell: clap_complete::Shell) {
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}

// ============================================================================
// Tests
// ============================================================================
