//! Message entity - represents a chat message

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{ChatId, MessageId, UserId};

/// Kind of message content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    #[default]
    Text,
    Image,
    Video,
    System,
}

impl MessageKind {
    /// Check if this kind carries a media attachment
    #[inline]
    pub fn is_media(&self) -> bool {
        matches!(self, Self::Image | Self::Video)
    }
}

/// Message entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub chat_id: ChatId,
    pub content: String,
    #[serde(rename = "type")]
    pub kind: MessageKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_to_id: Option<MessageId>,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Message {
    /// Create a new Message
    pub fn new(
        id: MessageId,
        chat_id: ChatId,
        created_by: UserId,
        content: String,
        kind: MessageKind,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            chat_id,
            content,
            kind,
            media_url: None,
            reply_to_id: None,
            created_by,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a system message (membership changes and the like)
    pub fn system(id: MessageId, chat_id: ChatId, created_by: UserId, content: String) -> Self {
        Self::new(id, chat_id, created_by, content, MessageKind::System)
    }

    /// Check if message has been edited
    #[inline]
    pub fn is_edited(&self) -> bool {
        self.updated_at > self.created_at
    }

    /// Check if message is a reply
    #[inline]
    pub fn is_reply(&self) -> bool {
        self.reply_to_id.is_some()
    }

    /// Check if the given user wrote this message
    #[inline]
    pub fn is_authored_by(&self, user_id: UserId) -> bool {
        self.created_by == user_id
    }

    /// Edit the message content
    pub fn edit(&mut self, content: String) {
        self.content = content;
        self.updated_at = Utc::now();
    }

    /// Check if message content is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.content.trim().is_empty()
    }
}
