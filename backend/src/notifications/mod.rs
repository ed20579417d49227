//! Push notification delivery
//!
//! [`PushSender`] is the seam the reminder scheduler dispatches through.
//! [`ExpoPushClient`] talks to an Expo-compatible HTTP push API;
//! [`LogOnlySender`] is used when delivery is disabled.

mod push;

pub use push::{ExpoPushClient, PushError};

use async_trait::async_trait;
use tracing::info;

/// Delivers a single notification to a device token
#[async_trait]
pub trait PushSender: Send + Sync {
    async fn send(&self, token: &str, title: &str, body: &str) -> Result<(), PushError>;
}

/// Dry-run sender that only logs what would have been delivered
#[derive(Debug, Clone, Default)]
pub struct LogOnlySender;

#[async_trait]
impl PushSender for LogOnlySender {
    async fn send(&self, token: &str, title: &str, body: &str) -> Result<(), PushError> {
        info!(token_len = token.len(), title, body, "Push delivery disabled, notification dropped");
        Ok(())
    }
}
