//! Request DTOs for service operations
//!
//! All request DTOs implement `Deserialize` and `Validate` for input validation.

use chat_core::{ChatId, MessageId, MessageKind};
use serde::Deserialize;
use validator::Validate;

/// New chat message
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewMessageRequest {
    pub chat_id: ChatId,

    #[serde(default)]
    #[validate(length(max = 4000, message = "Message content must be at most 4000 characters"))]
    pub content: String,

    #[serde(default, rename = "type")]
    pub kind: MessageKind,

    #[validate(url(message = "Invalid media URL"))]
    pub media_url: Option<String>,

    pub reply_to_id: Option<MessageId>,
}

impl NewMessageRequest {
    /// Plain text message
    pub fn text(chat_id: ChatId, content: impl Into<String>) -> Self {
        Self {
            chat_id,
            content: content.into(),
            kind: MessageKind::Text,
            media_url: None,
            reply_to_id: None,
        }
    }

    /// Check if there is anything to deliver
    pub fn has_body(&self) -> bool {
        !self.content.trim().is_empty() || self.media_url.is_some()
    }
}

/// Message edit
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct EditMessageRequest {
    #[validate(length(
        min = 1,
        max = 4000,
        message = "Message content must be 1-4000 characters"
    ))]
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_message_validation() {
        let ok = NewMessageRequest::text(ChatId::new(1), "hello");
        assert!(ok.validate().is_ok());
        assert!(ok.has_body());

        let long = NewMessageRequest::text(ChatId::new(1), "x".repeat(4001));
        assert!(long.validate().is_err());

        let blank = NewMessageRequest::text(ChatId::new(1), "   ");
        assert!(!blank.has_body());
    }

    #[test]
    fn test_new_message_decodes_defaults() {
        let req: NewMessageRequest =
            serde_json::from_value(serde_json::json!({"chat_id": 3, "content": "hi"})).unwrap();
        assert_eq!(req.kind, MessageKind::Text);
        assert!(req.reply_to_id.is_none());

        let req: NewMessageRequest = serde_json::from_value(serde_json::json!({
            "chat_id": 3,
            "content": "",
            "type": "image",
            "media_url": "https://cdn.example.com/a.png"
        }))
        .unwrap();
        assert!(req.validate().is_ok());
        assert!(req.has_body());
    }

    #[test]
    fn test_edit_requires_content() {
        let edit = EditMessageRequest {
            content: String::new(),
        };
        assert!(edit.validate().is_err());
    }
}
