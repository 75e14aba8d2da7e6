//! # Notification Sender
//!
//! Push delivery is best effort. Senders report the result as a [`SendOutcome`]
//! instead of an error, and the booking engine only dispatches after a state change
//! has been committed, on a background task.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushMessage {
    pub title: String,
    pub body: String,
}

impl PushMessage {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }
}

#[derive(Debug)]
pub enum SendOutcome {
    /// Accepted by the transport, with the message id it assigned.
    Delivered(String),
    /// Nothing was sent (no transport configured).
    Skipped,
    /// Transport failure, already logged by the sender.
    Failed(BoxError),
}

impl SendOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, SendOutcome::Delivered(_))
    }
}

#[async_trait]
pub trait NotificationSender: Send + Sync {
    async fn send(&self, device_token: &str, message: &PushMessage) -> SendOutcome;
}

/// Sender used when no push transport is configured; it only logs.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSender;

#[async_trait]
impl NotificationSender for LogSender {
    async fn send(&self, device_token: &str, message: &PushMessage) -> SendOutcome {
        info!(
            "Push transport not configured, dropping '{}' for device {}",
            message.title, device_token
        );
        SendOutcome::Skipped
    }
}
