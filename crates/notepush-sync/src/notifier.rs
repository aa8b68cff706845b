//! Log-backed notification adapter
//!
//! Implements [`INotificationService`] by emitting each notification as a
//! structured `tracing` event. Used by the daemon, which has no terminal to
//! print to; the level follows the notification priority.

use notepush_core::ports::{INotificationService, Notification, NotificationPriority};
use tracing::{error, info, warn};

/// Notification service that writes to the log
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl TracingNotifier {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl INotificationService for TracingNotifier {
    async fn notify(&self, notification: &Notification) -> anyhow::Result<()> {
        let Notification {
            title,
            body,
            priority,
            category,
        } = notification;
        match priority {
            NotificationPriority::Low | NotificationPriority::Normal => {
                info!(%category, %priority, "{title}: {body}")
            }
            NotificationPriority::High => warn!(%category, %priority, "{title}: {body}"),
            NotificationPriority::Critical => error!(%category, %priority, "{title}: {body}"),
        }
        Ok(())
    }
}
