//! Fire-and-forget user notifications.
//!
//! Controllers report the outcome of list loads and mutations through a
//! [`Notifier`] handed to them at construction time. The web server plugs in
//! [`FlashNotifier`], tests use [`RecordingNotifier`].

use std::sync::{Mutex, PoisonError};

use actix_web_flash_messages::{FlashMessage, Level};
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Success,
    Error,
    Info,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Info,
            message: message.into(),
        }
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Queues notifications as flash messages on the current response.
///
/// Must be invoked from inside a request handled by the
/// `FlashMessagesFramework` middleware.
#[derive(Debug, Default, Clone, Copy)]
pub struct FlashNotifier;

impl Notifier for FlashNotifier {
    fn notify(&self, notification: Notification) {
        let level = match notification.level {
            NotificationLevel::Success => Level::Success,
            NotificationLevel::Error => Level::Error,
            NotificationLevel::Info => Level::Info,
        };
        FlashMessage::new(notification.message, level).send();
    }
}

/// Keeps every notification in memory so it can be inspected later.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    received: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns everything received so far.
    pub fn notifications(&self) -> Vec<Notification> {
        self.received
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn last(&self) -> Option<Notification> {
        self.notifications().pop()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.received
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notification);
    }
}
