//! Reaction entity - per-message, per-kind aggregate of the users who reacted

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{MessageId, ReactionId, UserId};

/// Reaction kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReactionKind {
    Like,
    Love,
    Laugh,
    Wow,
    Sad,
    Angry,
}

/// Outcome of toggling a user's reaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReactionToggle {
    Added,
    Removed,
}

/// Reaction aggregate
///
/// `count` always equals `user_ids.len()`; a reaction with no users is
/// deleted rather than stored empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reaction {
    pub id: ReactionId,
    pub message_id: MessageId,
    #[serde(rename = "type")]
    pub kind: ReactionKind,
    pub count: usize,
    pub user_ids: Vec<UserId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Reaction {
    /// Create a new Reaction with a single user
    pub fn new(id: ReactionId, message_id: MessageId, kind: ReactionKind, user_id: UserId) -> Self {
        let now = Utc::now();
        Self {
            id,
            message_id,
            kind,
            count: 1,
            user_ids: vec![user_id],
            created_at: now,
            updated_at: now,
        }
    }

    /// Check if the user is part of this reaction
    #[inline]
    pub fn has_user(&self, user_id: UserId) -> bool {
        self.user_ids.contains(&user_id)
    }

    /// Add the user if absent, remove if present
    pub fn toggle_user(&mut self, user_id: UserId) -> ReactionToggle {
        let outcome = if let Some(pos) = self.user_ids.iter().position(|u| *u == user_id) {
            self.user_ids.remove(pos);
            ReactionToggle::Removed
        } else {
            self.user_ids.push(user_id);
            ReactionToggle::Added
        };
        self.count = self.user_ids.len();
        self.updated_at = Utc::now();
        outcome
    }

    /// Check if no user remains on this reaction
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.user_ids.is_empty()
    }
}
