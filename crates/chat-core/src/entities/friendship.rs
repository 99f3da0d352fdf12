//! Friendship entity - a relationship between two users

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{FriendshipId, UserId};

/// Friendship status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FriendshipStatus {
    #[default]
    Pending,
    Accepted,
    Rejected,
    Blocked,
}

/// Friendship entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Friendship {
    pub id: FriendshipId,
    pub user_id: UserId,
    pub friend_id: UserId,
    pub status: FriendshipStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Friendship {
    /// Create a new pending Friendship request from `user_id` to `friend_id`
    pub fn new(id: FriendshipId, user_id: UserId, friend_id: UserId) -> Self {
        let now = Utc::now();
        Self {
            id,
            user_id,
            friend_id,
            status: FriendshipStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check if the friendship was accepted
    #[inline]
    pub fn is_accepted(&self) -> bool {
        self.status == FriendshipStatus::Accepted
    }

    /// Check if the user is either side of this friendship
    #[inline]
    pub fn involves(&self, user_id: UserId) -> bool {
        self.user_id == user_id || self.friend_id == user_id
    }

    /// Get the other party of the friendship, seen from `user_id`
    pub fn other_party(&self, user_id: UserId) -> Option<UserId> {
        if self.user_id == user_id {
            Some(self.friend_id)
        } else if self.friend_id == user_id {
            Some(self.user_id)
        } else {
            None
        }
    }

    /// Update the status
    pub fn set_status(&mut self, status: FriendshipStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }
}
