//! In-memory implementation of NotificationRepository

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use chat_core::entities::Notification;
use chat_core::traits::{NotificationRepository, RepoResult};
use chat_core::value_objects::{NotificationId, UserId};

use super::sequence::IdSequence;

/// In-memory implementation of NotificationRepository
#[derive(Debug, Clone, Default)]
pub struct MemNotificationRepository {
    notifications: Arc<RwLock<HashMap<NotificationId, Notification>>>,
    ids: Arc<IdSequence>,
}

impl MemNotificationRepository {
    /// Create a new empty MemNotificationRepository
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl NotificationRepository for MemNotificationRepository {
    async fn find_by_id(&self, id: NotificationId) -> RepoResult<Option<Notification>> {
        Ok(self.notifications.read().get(&id).cloned())
    }

    async fn find_by_recipient(&self, user_id: UserId) -> RepoResult<Vec<Notification>> {
        let mut found: Vec<Notification> = self
            .notifications
            .read()
            .values()
            .filter(|n| n.recipient_id == user_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(found)
    }

    async fn create(&self, mut notification: Notification) -> RepoResult<Notification> {
        if notification.id.is_zero() {
            notification.id = NotificationId::new(self.ids.next());
        } else {
            self.ids.observe(notification.id.into_inner());
        }
        self.notifications
            .write()
            .insert(notification.id, notification.clone());
        Ok(notification)
    }
}
