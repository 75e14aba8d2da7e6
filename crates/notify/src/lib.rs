//! # PairSlot Notify
//!
//! Push notification transport for the booking engine, backed by Firebase Cloud
//! Messaging.

pub mod config;
pub mod fcm;

use std::sync::Arc;

use pairslot_core::notify::{LogSender, NotificationSender};
use tracing::{info, warn};

pub use config::{FcmConfig, FcmCredentials};
pub use fcm::{FcmError, FcmSender};

/// Picks the sender for the process: FCM when configured, otherwise a logging no-op.
///
/// # Errors
///
/// Fails when FCM is configured but its service account key cannot be loaded.
pub async fn sender_from_config(
    config: Option<FcmConfig>,
) -> Result<Arc<dyn NotificationSender>, FcmError> {
    match config {
        Some(config) => {
            info!("Push notifications enabled for project {}", config.project_id);
            Ok(Arc::new(FcmSender::connect(config).await?))
        }
        None => {
            warn!("FCM_PROJECT_ID and credentials not set, push notifications are disabled");
            Ok(Arc::new(LogSender))
        }
    }
}
