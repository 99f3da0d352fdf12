//! Notification entity - a message addressed to one user

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{NotificationId, UserId};

/// Notification type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    FriendRequest,
    FriendAccepted,
    GroupInvitation,
    MessageReaction,
    MessageReply,
    GroupMemberJoined,
}

/// Notification status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationStatus {
    #[default]
    Unread,
    Read,
    Accepted,
    Rejected,
}

/// Notification entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub recipient_id: UserId,
    pub sender_id: UserId,
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    pub status: NotificationStatus,
    pub title: String,
    pub message: String,
    /// Chat, message or friendship this notification points at
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Notification {
    /// Create a new unread Notification
    pub fn new(
        recipient_id: UserId,
        sender_id: UserId,
        notification_type: NotificationType,
        title: String,
        message: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: NotificationId::default(),
            recipient_id,
            sender_id,
            notification_type,
            status: NotificationStatus::Unread,
            title,
            message,
            reference_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Attach a reference id
    pub fn with_reference(mut self, reference_id: i64) -> Self {
        self.reference_id = Some(reference_id);
        self
    }

    #[inline]
    pub fn is_unread(&self) -> bool {
        self.status == NotificationStatus::Unread
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_defaults() {
        let n = Notification::new(
            UserId::new(2),
            UserId::new(1),
            NotificationType::FriendRequest,
            "Friend request".to_string(),
            "user 1 wants to be friends".to_string(),
        )
        .with_reference(5);
        assert!(n.is_unread());
        assert_eq!(n.reference_id, Some(5));

        let value = serde_json::to_value(&n).unwrap();
        assert_eq!(value["type"], "friend_request");
        assert_eq!(value["status"], "unread");
    }
}
