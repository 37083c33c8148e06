//! Desktop notifications for alarms and the countdown timer.
//!
//! Notifications are best-effort: they are only sent when the user has
//! already granted permission, and the clock never asks for it.
//!
//! # Implementations
//!
//! - `MacNotifier`: native macOS notifications via `objc2-user-notifications`
//!   (macOS only)
//! - [`DisabledNotifier`]: used on other platforms; never authorized
//! - [`MockNotifier`]: records notifications for tests
//!
//! [`PlatformNotifier`] names the implementation for the current target.

#[cfg(target_os = "macos")]
mod center;
#[cfg(target_os = "macos")]
mod content;
pub mod error;
#[cfg(target_os = "macos")]
mod request;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

pub use self::error::NotificationError;

/// Maximum length for labels in notifications.
const MAX_LABEL_LENGTH: usize = 100;

/// What a notification announces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationKind {
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

impl NotificationKind {
    /// Returns the notification title.
    #[must_use]
    pub fn title(&self) -> &'static str {
        match self {
            Self::Alarm { .. } => "⏰ アラーム",
            Self::TimerComplete => "⏲ タイマー完了",
        }
    }

    /// Returns the notification body.
    #[must_use]
    pub fn body(&self) -> String {
        match self {
            Self::Alarm { time, label } => match sanitize_label(label) {
                Some(label) => format!("{} になりました - {}", time, label),
                None => format!("{} になりました", time),
            },
            Self::TimerComplete => "タイマーが終了しました".to_string(),
        }
    }
}

/// Sanitizes a user label for display in a notification.
///
/// Returns None if nothing printable is left.
pub fn sanitize_label(label: &str) -> Option<String> {
    let sanitized: String = label
        .chars()
        .take(MAX_LABEL_LENGTH)
        .filter(|c| !c.is_control())
        .collect();

    if sanitized.trim().is_empty() {
        None
    } else {
        Some(sanitized)
    }
}

/// Sends desktop notifications.
#[allow(async_fn_in_trait)]
pub trait Notifier {
    /// Sends a notification.
    ///
    /// # Errors
    ///
    /// Returns an error if the notification could not be delivered.
    async fn notify(&self, kind: &NotificationKind) -> Result<(), NotificationError>;

    /// Returns true if the user has granted notification permission.
    async fn is_authorized(&self) -> bool;
}

// ============================================================================
// MacNotifier
// ============================================================================

/// Native macOS notifier.
#[cfg(target_os = "macos")]
#[derive(Debug, Default, Clone, Copy)]
pub struct MacNotifier;

#[cfg(target_os = "macos")]
impl Notifier for MacNotifier {
    async fn notify(&self, kind: &NotificationKind) -> Result<(), NotificationError> {
        let content = content::create_content(kind);
        let request = request::create_notification_request(&content);
        center::NotificationCenter::add_notification_request(&request).await
    }

    async fn is_authorized(&self) -> bool {
        match center::NotificationCenter::is_authorized().await {
            Ok(authorized) => authorized,
            Err(e) if e.is_permission_error() => {
                tracing::debug!("通知許可の確認に失敗しました: {} ({})", e, e.suggestion());
                false
            }
            Err(e) => {
                tracing::warn!("通知許可の確認に失敗しました: {}", e);
                false
            }
        }
    }
}

// ============================================================================
// DisabledNotifier
// ============================================================================

/// Notifier for platforms without native notification support.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledNotifier;

impl Notifier for DisabledNotifier {
    async fn notify(&self, _kind: &NotificationKind) -> Result<(), NotificationError> {
        Err(NotificationError::NotAvailable)
    }

    async fn is_authorized(&self) -> bool {
        false
    }
}

/// Notifier for the current target platform.
#[cfg(target_os = "macos")]
pub type PlatformNotifier = MacNotifier;

/// Notifier for the current target platform.
#[cfg(not(target_os = "macos"))]
pub type PlatformNotifier = DisabledNotifier;

// ============================================================================
// MockNotifier
// ============================================================================

/// Mock notifier for testing.
#[derive(Debug)]
pub struct MockNotifier {
    notifications: Mutex<Vec<NotificationKind>>,
    authorized: AtomicBool,
    should_fail: AtomicBool,
}

impl Default for MockNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl MockNotifier {
    /// Creates an authorized mock.
    #[must_use]
    pub fn new() -> Self {
        Self {
            notifications: Mutex::new(Vec::new()),
            authorized: AtomicBool::new(true),
            should_fail: AtomicBool::new(false),
        }
    }

    pub fn set_authorized(&self, authorized: bool) {
        self.authorized.store(authorized, Ordering::SeqCst);
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail.store(should_fail, Ordering::SeqCst);
    }

    #[must_use]
    pub fn get_notifications(&self) -> Vec<NotificationKind> {
        self.notifications.lock().unwrap().clone()
    }

    #[must_use]
    pub fn notification_count(&self) -> usize {
        self.notifications.lock().unwrap().len()
    }
}

impl Notifier for MockNotifier {
    async fn notify(&self, kind: &NotificationKind) -> Result<(), NotificationError> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(NotificationError::SendFailed("Mock failure".to_string()));
        }
        if !self.authorized.load(Ordering::SeqCst) {
            return Err(NotificationError::PermissionDenied);
        }
        self.notifications.lock().unwrap().push(kind.clone());
        Ok(())
    }

    async fn is_authorized(&self) -> bool {
        self.authorized.load(Ordering::SeqCst)
    }
}

impl<T: Notifier> Notifier for std::sync::Arc<T> {
    async fn notify(&self, kind: &NotificationKind) -> Result<(), NotificationError> {
        (**self).notify(kind).await
    }

    async fn is_authorized(&self) -> bool {
        (**self).is_authorized().await
    }
}
