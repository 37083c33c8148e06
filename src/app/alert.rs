//! Audible and desktop feedback for fired alarms and finished timers.
//!
//! Everything here is best-effort: playback failures are logged, and
//! notifications are skipped when permission has not been granted.

use tracing::{debug, warn};

use crate::alarm::Alarm;
use crate::notification::{NotificationKind, Notifier};
use crate::sound::{SoundCue, SoundPlayer};

/// Something the user must be told about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Alert {
    /// An alarm fired.
    Alarm {
        /// `HH:MM`
        time: String,
        /// Alarm label
        label: String,
    },
    /// The countdown timer reached zero.
    TimerComplete,
}

impl Alert {
    fn notification(&self) -> NotificationKind {
        match self {
            Self::Alarm { time, label } => NotificationKind::Alarm {
                time: time.clone(),
                label: label.clone(),
            },
            Self::TimerComplete => NotificationKind::TimerComplete,
        }
    }
}

impl From<&Alarm> for Alert {
    fn from(alarm: &Alarm) -> Self {
        Self::Alarm {
            time: alarm.time.to_string(),
            label: alarm.label.clone(),
        }
    }
}

/// What a dispatch actually did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Delivery {
    /// The alarm cue was played
    pub played: bool,
    /// A desktop notification was delivered
    pub notified: bool,
}

/// Routes alerts and cues to the sound player and the notifier.
pub struct AlertDispatcher<P: SoundPlayer, N: Notifier> {
    /// None when no audio device is available
    player: Option<P>,
    notifier: N,
}

impl<P: SoundPlayer, N: Notifier> AlertDispatcher<P, N> {
    pub fn new(player: Option<P>, notifier: N) -> Self {
        Self { player, notifier }
    }

    /// Plays a cue, logging any failure. Returns true if playback started.
    pub fn play_cue(&self, cue: SoundCue) -> bool {
        let Some(player) = &self.player else {
            return false;
        };

        match player.play(cue) {
            Ok(()) => true,
            Err(e) => {
                warn!("サウンド再生に失敗しました: {} ({})", e, e.suggestion());
                false
            }
        }
    }

    /// Plays the alarm cue (if `sound_enabled`) and sends a notification
    /// (if authorized).
    pub async fn dispatch(&self, alert: &Alert, sound_enabled: bool) -> Delivery {
        let played = sound_enabled && self.play_cue(SoundCue::Alarm);

        let notified = if self.notifier.is_authorized().await {
            match self.notifier.notify(&alert.notification()).await {
                Ok(()) => true,
                Err(e) if e.is_permission_error() => {
                    warn!("{} ({})", e, e.suggestion());
                    false
                }
                Err(e) => {
                    warn!("通知の送信に失敗しました: {}", e);
                    false
                }
            }
        } else {
            debug!("Notification permission not granted, skipping {:?}", alert);
            false
        };

        Delivery { played, notified }
    }
}
