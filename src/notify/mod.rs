//! Real-time push and email
//!
//! Staff dashboards subscribe to the `private-staff` channel; every
//! operational event is pushed there and persisted as a [`Notification`]
//! so the bell survives offline staff. Push and mail failures are logged
//! and swallowed, they never fail the request that triggered them.

pub mod email;
pub mod pusher;

use crate::db::models::{Notification, NotificationKind};
use crate::db::repository::NotificationRepository;
use crate::utils::AppResult;
use async_trait::async_trait;
use std::sync::Arc;

pub use email::{Mailer, SmtpMailer};
pub use pusher::PusherPublisher;

/// Channel the staff dashboard listens on
pub const STAFF_CHANNEL: &str = "private-staff";

/// Real-time event publisher seam
#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(
        &self,
        channel: &str,
        event: &str,
        payload: &serde_json::Value,
    ) -> AppResult<()>;

    /// Sign a private-channel subscription request
    fn authorize_channel(&self, socket_id: &str, channel: &str) -> AppResult<String>;
}

/// Fans operational events out to the staff channel and the notification
/// collection
#[derive(Clone)]
pub struct Notifier {
    publisher: Arc<dyn EventPublisher>,
    notifications: NotificationRepository,
}

impl Notifier {
    pub fn new(publisher: Arc<dyn EventPublisher>, notifications: NotificationRepository) -> Self {
        Self {
            publisher,
            notifications,
        }
    }

    /// Push `event` to the staff channel and persist it. Best effort.
    pub async fn notify_staff(
        &self,
        kind: NotificationKind,
        event: &str,
        message: impl Into<String>,
        data: serde_json::Value,
    ) {
        let message = message.into();
        let payload = serde_json::json!({ "message": message, "data": data });

        if let Err(e) = self.publisher.publish(STAFF_CHANNEL, event, &payload).await {
            tracing::warn!(target: "notify", event, error = %e, "push failed");
        }
        if let Err(e) = self
            .notifications
            .create(Notification::new(kind, message, data))
            .await
        {
            tracing::warn!(target: "notify", event, error = %e, "persisting notification failed");
        }
    }
}
