//! Chat entity - a conversation that users join as durable members

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{ChatId, UserId};

/// Kind of chat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatType {
    Individual,
    PrivateGroup,
    PublicGroup,
}

impl ChatType {
    /// Check if this chat type holds more than two participants
    #[inline]
    pub fn is_group(&self) -> bool {
        matches!(self, Self::PrivateGroup | Self::PublicGroup)
    }
}

/// Chat entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chat {
    pub id: ChatId,
    #[serde(rename = "type")]
    pub chat_type: ChatType,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub is_public: bool,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Chat {
    /// Create a new Chat
    pub fn new(id: ChatId, chat_type: ChatType, name: String, created_by: UserId) -> Self {
        let now = Utc::now();
        Self {
            id,
            chat_type,
            name,
            description: None,
            is_public: chat_type == ChatType::PublicGroup,
            created_by,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Membership role inside a chat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberRole {
    Admin,
    #[default]
    Member,
}

/// Durable chat membership
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMember {
    pub chat_id: ChatId,
    pub user_id: UserId,
    pub role: MemberRole,
    pub joined_at: DateTime<Utc>,
}

impl ChatMember {
    /// Create a new ChatMember
    pub fn new(chat_id: ChatId, user_id: UserId, role: MemberRole) -> Self {
        Self {
            chat_id,
            user_id,
            role,
            joined_at: Utc::now(),
        }
    }

    /// Check if member administers the chat
    #[inline]
    pub fn is_admin(&self) -> bool {
        self.role == MemberRole::Admin
    }
}
