//! Notification service
//!
//! Persists notifications and pushes them to the recipient when online.

use chat_core::entities::Notification;
use chat_core::{Event, EventType, UserId};
use serde_json::json;
use tracing::{debug, info, instrument};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Notification service
pub struct NotificationService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> NotificationService<'a> {
    /// Create a new NotificationService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Store a notification and deliver a `notification` event to its recipient
    #[instrument(skip(self, notification), fields(recipient = %notification.recipient_id))]
    pub async fn send(&self, notification: Notification) -> ServiceResult<Notification> {
        let notification = self.ctx.notification_repo().create(notification).await?;

        let delivered = match self.ctx.realtime() {
            Some(sink) => {
                let event = Event::new(
                    EventType::Notification,
                    json!({ "notification": &notification }),
                    notification.sender_id,
                );
                sink.send_to_user(notification.recipient_id, &event)
            }
            None => false,
        };

        info!(
            notification_id = %notification.id,
            delivered,
            "Notification stored"
        );
        Ok(notification)
    }

    /// Notifications addressed to a user, newest first
    pub async fn list_for(&self, user_id: UserId) -> ServiceResult<Vec<Notification>> {
        let found = self.ctx.notification_repo().find_by_recipient(user_id).await?;
        debug!(user_id = %user_id, count = found.len(), "Listed notifications");
        Ok(found)
    }
}
