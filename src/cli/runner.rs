//! Interactive loops for `watch`, `stopwatch` and `timer`.
//!
//! Each loop races its ticker against input lines and Ctrl-C with
//! `tokio::select!`. Keys are typed followed by Enter. Errors from a single
//! key press are shown and the loop continues.

use std::ops::RangeInclusive;

use anyhow::Result;
use chrono::Local;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tokio::time::{interval, Duration, Interval, MissedTickBehavior};
use tracing::{debug, warn};

use crate::app::{Alert, AlertDispatcher, ClockApp};
use crate::clock::{format_countdown, format_stopwatch};
use crate::engine::{sample_ticker, StopwatchEngine, StopwatchEvent, TimerEngine, TimerEvent};
use crate::notification::Notifier;
use crate::sound::{SoundCue, SoundPlayer};
use crate::store::{KeyValueStore, StoreError};
use crate::types::{StopwatchState, TimerState};

use super::display::{AlternateScreen, Display, STOPWATCH_KEYS, TIMER_KEYS, WATCH_KEYS};

/// Period of the clock face refresh.
pub const WATCH_TICK_PERIOD: Duration = Duration::from_secs(1);

/// Completes on Ctrl-C. Never completes if the handler cannot be installed.
async fn interrupted() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Ctrl-C を監視できません: {}", e);
        std::future::pending::<()>().await;
    }
}

// ============================================================================
// Keys
// ============================================================================

/// Keys understood by `watch`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchKey {
    Format,
    Sound,
    Glow,
    Theme,
    SmoothMotion,
    Digital,
    Quit,
}

impl WatchKey {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "f" => Some(Self::Format),
            "s" => Some(Self::Sound),
            "g" => Some(Self::Glow),
            "t" => Some(Self::Theme),
            "m" => Some(Self::SmoothMotion),
            "d" => Some(Self::Digital),
            "q" => Some(Self::Quit),
            _ => None,
        }
    }
}

/// Keys understood by `stopwatch`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopwatchKey {
    Toggle,
    Lap,
    Reset,
    Quit,
}

impl StopwatchKey {
    /// A bare Enter toggles.
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "" | "s" => Some(Self::Toggle),
            "l" => Some(Self::Lap),
            "r" => Some(Self::Reset),
            "q" => Some(Self::Quit),
            _ => None,
        }
    }
}

/// Durations accepted from `timer` input, matching `--minutes`.
pub const TIMER_MINUTES_RANGE: RangeInclusive<u32> = 1..=1440;

/// Keys understood by `timer`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKey {
    Toggle,
    Reset,
    /// A bare number sets the duration in minutes
    SetMinutes(u32),
    Quit,
}

impl TimerKey {
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        match input {
            "s" => Some(Self::Toggle),
            "r" => Some(Self::Reset),
            "q" => Some(Self::Quit),
            _ => input
                .parse()
                .ok()
                .filter(|minutes| TIMER_MINUTES_RANGE.contains(minutes))
                .map(Self::SetMinutes),
        }
    }
}

/// Applies a preference key and returns the confirmation to show.
///
/// `WatchKey::Quit` changes nothing and returns None.
pub fn apply_watch_key<S: KeyValueStore>(
    app: &mut ClockApp<S>,
    key: WatchKey,
) -> Result<Option<String>, StoreError> {
    let on_off = |value: bool| if value { "on" } else { "off" };
    let settings = app.settings_mut();

    let message = match key {
        WatchKey::Format => format!("時刻形式: {}", settings.toggle_time_format()?),
        WatchKey::Sound => format!("サウンド: {}", on_off(settings.toggle_sound()?)),
        WatchKey::Glow => format!("グロー: {}", on_off(settings.toggle_glow()?)),
        WatchKey::Theme => format!("テーマ: {}", settings.toggle_theme()?),
        WatchKey::SmoothMotion => {
            format!("スムーズモーション: {}", on_off(settings.toggle_smooth_motion()?))
        }
        WatchKey::Digital => format!("デジタル表示: {}", on_off(settings.toggle_show_digital()?)),
        WatchKey::Quit => return Ok(None),
    };

    Ok(Some(message))
}

fn apply_timer_key(engine: &mut TimerEngine, key: TimerKey, ticker: &mut Interval) -> Result<()> {
    match key {
        TimerKey::Toggle => {
            let starting = !engine.get_state().is_running();
            engine.toggle()?;
            // Count a full second from the moment of starting
            if starting {
                ticker.reset();
            }
        }
        TimerKey::Reset => engine.reset()?,
        TimerKey::SetMinutes(minutes) => engine.set_duration(minutes)?,
        TimerKey::Quit => {}
    }
    Ok(())
}

fn apply_stopwatch_key(engine: &mut StopwatchEngine, key: StopwatchKey) -> Result<()> {
    match key {
        StopwatchKey::Toggle => engine.toggle()?,
        StopwatchKey::Lap => {
            if engine.lap()?.is_none() {
                Display::show_message("ラップは計測中のみ記録できます");
            }
        }
        StopwatchKey::Reset => engine.reset()?,
        StopwatchKey::Quit => {}
    }
    Ok(())
}

// ============================================================================
// watch
// ============================================================================

/// Runs the live clock until `q` or Ctrl-C.
///
/// Each second the frame is redrawn, the tick cue is played when due, and
/// fired alarms are dispatched. When the alternate screen is unavailable the
/// clock continues on a single status line.
pub async fn run_watch<S, P, N, R>(
    app: &mut ClockApp<S>,
    dispatcher: &AlertDispatcher<P, N>,
    input: R,
    fullscreen: bool,
) -> Result<()>
where
    S: KeyValueStore,
    P: SoundPlayer,
    N: Notifier,
    R: AsyncBufRead + Unpin,
{
    let screen = if fullscreen {
        match AlternateScreen::enter() {
            Ok(screen) => Some(screen),
            Err(e) => {
                warn!("{}", e);
                Display::show_message(&format!("{} (通常表示で続行します)", e));
                None
            }
        }
    } else {
        None
    };
    let fullscreen = screen.is_some();

    if !fullscreen {
        println!("{}", WATCH_KEYS);
    }

    let mut ticker = interval(WATCH_TICK_PERIOD);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut lines = input.lines();
    let mut input_open = true;
    let interrupt = interrupted();
    tokio::pin!(interrupt);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let frame = app.tick(&Local::now());

                if fullscreen {
                    Display::show_frame(&frame, app.preferences());
                } else {
                    Display::show_inline(&Display::render_status_line(&frame));
                }

                if frame.tick_sound {
                    dispatcher.play_cue(SoundCue::Tick);
                }

                for alarm in &frame.fired {
                    let alert = Alert::from(alarm);
                    Display::show_alert(&alert);
                    let delivery = dispatcher
                        .dispatch(&alert, app.preferences().sound_enabled)
                        .await;
                    debug!(?delivery, "Alarm {} dispatched", alarm.id);
                }
            }
            line = lines.next_line(), if input_open => match line {
                Ok(Some(line)) => match WatchKey::parse(&line) {
                    Some(WatchKey::Quit) => break,
                    Some(key) => match apply_watch_key(app, key) {
                        Ok(Some(message)) if !fullscreen => Display::show_message(&message),
                        Ok(_) => {}
                        Err(e) => Display::show_error(&format!("{} ({})", e, e.suggestion())),
                    },
                    None if !fullscreen => Display::show_message(WATCH_KEYS),
                    None => {}
                },
                Ok(None) => {
                    debug!("Input closed");
                    input_open = false;
                }
                Err(e) => {
                    warn!("入力を読み取れません: {}", e);
                    input_open = false;
                }
            },
            () = &mut interrupt => break,
        }
    }

    drop(screen);
    if !fullscreen {
        println!();
    }
    Ok(())
}

// ============================================================================
// stopwatch
// ============================================================================

/// Runs the stopwatch until `q` or Ctrl-C and returns its final state.
pub async fn run_stopwatch<R>(input: R) -> Result<StopwatchState>
where
    R: AsyncBufRead + Unpin,
{
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut engine = StopwatchEngine::new(tx);

    println!("{}", STOPWATCH_KEYS);
    Display::show_inline(&format_stopwatch(0));

    let mut ticker = sample_ticker();
    let mut lines = input.lines();
    let mut input_open = true;
    let interrupt = interrupted();
    tokio::pin!(interrupt);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                engine.on_sample()?;
            }
            line = lines.next_line(), if input_open => match line {
                Ok(Some(line)) => match StopwatchKey::parse(&line) {
                    Some(StopwatchKey::Quit) => break,
                    Some(key) => {
                        if let Err(e) = apply_stopwatch_key(&mut engine, key) {
                            Display::show_error(&e.to_string());
                        }
                    }
                    None => Display::show_message(STOPWATCH_KEYS),
                },
                Ok(None) => {
                    debug!("Input closed");
                    input_open = false;
                }
                Err(e) => {
                    warn!("入力を読み取れません: {}", e);
                    input_open = false;
                }
            },
            () = &mut interrupt => break,
        }

        while let Ok(event) = rx.try_recv() {
            match &event {
                StopwatchEvent::Sampled { elapsed_ms } => {
                    Display::show_inline(&format_stopwatch(*elapsed_ms));
                }
                other => {
                    if let Some(line) = Display::render_stopwatch_event(other) {
                        Display::show_message(&line);
                    }
                }
            }
        }
    }

    let state = engine.get_state().clone();
    println!();
    if !state.laps.is_empty() {
        println!("{}", Display::render_laps(&state.laps));
    }
    Ok(state)
}

// ============================================================================
// timer
// ============================================================================

/// Runs the countdown timer until `q` or Ctrl-C and returns its final state.
///
/// `minutes` presets the duration; otherwise the 25-minute default is used.
/// When the countdown completes the alert is dispatched and the timer is
/// reset to its original duration.
pub async fn run_timer<P, N, R>(
    dispatcher: &AlertDispatcher<P, N>,
    sound_enabled: bool,
    minutes: Option<u32>,
    input: R,
) -> Result<TimerState>
where
    P: SoundPlayer,
    N: Notifier,
    R: AsyncBufRead + Unpin,
{
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut engine = TimerEngine::new(tx);
    match minutes {
        Some(minutes) => engine.set_duration(minutes)?,
        None => engine.reset()?,
    }
    // The initial duration is shown below, not as an event
    while rx.try_recv().is_ok() {}

    println!("{}", TIMER_KEYS);
    Display::show_inline(&format_countdown(engine.get_state().remaining_ms));

    let mut ticker = TimerEngine::ticker();
    let mut lines = input.lines();
    let mut input_open = true;
    let interrupt = interrupted();
    tokio::pin!(interrupt);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                engine.tick()?;
            }
            line = lines.next_line(), if input_open => match line {
                Ok(Some(line)) => match TimerKey::parse(&line) {
                    Some(TimerKey::Quit) => break,
                    Some(key) => {
                        if let Err(e) = apply_timer_key(&mut engine, key, &mut ticker) {
                            Display::show_error(&e.to_string());
                        }
                    }
                    None => Display::show_message(TIMER_KEYS),
                },
                Ok(None) => {
                    debug!("Input closed");
                    input_open = false;
                }
                Err(e) => {
                    warn!("入力を読み取れません: {}", e);
                    input_open = false;
                }
            },
            () = &mut interrupt => break,
        }

        while let Ok(event) = rx.try_recv() {
            match &event {
                TimerEvent::Tick { remaining_ms } => {
                    Display::show_inline(&format_countdown(*remaining_ms));
                }
                TimerEvent::Completed => {
                    Display::show_alert(&Alert::TimerComplete);
                    let delivery = dispatcher.dispatch(&Alert::TimerComplete, sound_enabled).await;
                    debug!(?delivery, "Timer completion dispatched");
                    engine.reset()?;
                }
                other => {
                    if let Some(line) = Display::render_timer_event(other) {
                        Display::show_message(&line);
                    }
                }
            }
        }
    }

    println!();
    Ok(engine.get_state().clone())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notification::MockNotifier;
    use crate::sound::MockSoundPlayer;
    use crate::store::MemoryStore;
    use crate::types::{StopwatchPhase, Theme, TimeFormat, TimerPhase};
    use std::sync::Arc;

    fn create_dispatcher() -> AlertDispatcher<Arc<MockSoundPlayer>, Arc<MockNotifier>> {
        AlertDispatcher::new(
            Some(Arc::new(MockSoundPlayer::new())),
            Arc::new(MockNotifier::new()),
        )
    }

    // ------------------------------------------------------------------------
    // Key Parsing Tests
    // ------------------------------------------------------------------------

    mod key_tests {
        use super::*;

        #[test]
        fn test_watch_keys() {
            assert_eq!(WatchKey::parse("f"), Some(WatchKey::Format));
            assert_eq!(WatchKey::parse(" d \n"), Some(WatchKey::Digital));
            assert_eq!(WatchKey::parse("q"), Some(WatchKey::Quit));
            assert_eq!(WatchKey::parse("x"), None);
            assert_eq!(WatchKey::parse(""), None);
        }

        #[test]
        fn test_stopwatch_keys() {
            assert_eq!(StopwatchKey::parse(""), Some(StopwatchKey::Toggle));
            assert_eq!(StopwatchKey::parse("s"), Some(StopwatchKey::Toggle));
            assert_eq!(StopwatchKey::parse("l"), Some(StopwatchKey::Lap));
            assert_eq!(StopwatchKey::parse("r"), Some(StopwatchKey::Reset));
            assert_eq!(StopwatchKey::parse("lap"), None);
        }

        #[test]
        fn test_timer_keys() {
            assert_eq!(TimerKey::parse("s"), Some(TimerKey::Toggle));
            assert_eq!(TimerKey::parse("15"), Some(TimerKey::SetMinutes(15)));
            assert_eq!(TimerKey::parse("1440"), Some(TimerKey::SetMinutes(1440)));
            assert_eq!(TimerKey::parse("0"), None);
            assert_eq!(TimerKey::parse("1441"), None);
            assert_eq!(TimerKey::parse("-3"), None);
            assert_eq!(TimerKey::parse(""), None);
        }
    }

    // ------------------------------------------------------------------------
    // Watch Key Tests
    // ------------------------------------------------------------------------

    mod watch_key_tests {
        use super::*;

        #[test]
        fn test_apply_watch_keys_persist() {
            let storage = Arc::new(MemoryStore::new());
            let mut app = ClockApp::load(Arc::clone(&storage));

            let message = apply_watch_key(&mut app, WatchKey::Format).unwrap();
            assert_eq!(message.as_deref(), Some("時刻形式: 12h"));
            let message = apply_watch_key(&mut app, WatchKey::Sound).unwrap();
            assert_eq!(message.as_deref(), Some("サウンド: off"));
            apply_watch_key(&mut app, WatchKey::Theme).unwrap();

            let reloaded = ClockApp::load(storage);
            assert_eq!(reloaded.preferences().time_format, TimeFormat::TwelveHour);
            assert!(!reloaded.preferences().sound_enabled);
            assert_eq!(reloaded.preferences().theme, Theme::Light);
        }

        #[test]
        fn test_apply_quit_changes_nothing() {
            let storage = Arc::new(MemoryStore::new());
            let mut app = ClockApp::load(Arc::clone(&storage));

            assert_eq!(apply_watch_key(&mut app, WatchKey::Quit).unwrap(), None);
            assert_eq!(storage.write_count(), 0);
        }

        #[test]
        fn test_apply_watch_key_store_failure() {
            let storage = Arc::new(MemoryStore::new());
            storage.set_should_fail(true);
            let mut app = ClockApp::load(storage);

            assert!(apply_watch_key(&mut app, WatchKey::Glow).is_err());
        }
    }

    // ------------------------------------------------------------------------
    // Loop Tests
    // ------------------------------------------------------------------------

    mod loop_tests {
        use super::*;

        #[tokio::test]
        async fn test_watch_applies_keys_until_quit() {
            let storage = Arc::new(MemoryStore::new());
            let mut app = ClockApp::load(Arc::clone(&storage));
            let dispatcher = create_dispatcher();

            run_watch(&mut app, &dispatcher, &b"f\nbogus\nq\n"[..], false)
                .await
                .unwrap();

            assert_eq!(app.preferences().time_format, TimeFormat::TwelveHour);
        }

        #[tokio::test]
        async fn test_stopwatch_lap_then_quit() {
            let state = run_stopwatch(&b"s\nl\nq\n"[..]).await.unwrap();

            assert_eq!(state.phase, StopwatchPhase::Running);
            assert_eq!(state.laps.len(), 1);
        }

        #[tokio::test]
        async fn test_stopwatch_reset() {
            let state = run_stopwatch(&b"s\nl\nr\nq\n"[..]).await.unwrap();
            assert!(state.is_pristine());
        }

        #[tokio::test]
        async fn test_timer_set_and_start() {
            let dispatcher = create_dispatcher();

            let state = run_timer(&dispatcher, true, None, &b"1\ns\nq\n"[..])
                .await
                .unwrap();

            assert_eq!(state.phase, TimerPhase::Running);
            assert_eq!(state.remaining_ms, 60_000);
        }

        #[tokio::test]
        async fn test_timer_invalid_minutes_keep_preset() {
            let dispatcher = create_dispatcher();

            let state = run_timer(&dispatcher, true, Some(3), &b"0\nq\n"[..])
                .await
                .unwrap();

            assert_eq!(state.phase, TimerPhase::Idle);
            assert_eq!(state.remaining_ms, 180_000);
        }
    }
}
