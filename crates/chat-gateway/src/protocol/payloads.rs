//! Data carried by inbound events
//!
//! Each struct names the fields one event type requires. Unknown fields are
//! ignored so clients can send extra context.

use chat_core::{ChatId, MessageId, ReactionId, ReactionKind, UserId};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};

/// Decode the data object of an event into a payload struct
pub fn decode<T: DeserializeOwned>(data: &Map<String, Value>) -> Result<T, serde_json::Error> {
    serde_json::from_value(Value::Object(data.clone()))
}

/// `join` / `leave`
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RoomPayload {
    pub chat_id: ChatId,
}

/// `edit_message`
#[derive(Debug, Clone, Deserialize)]
pub struct EditMessagePayload {
    pub message_id: MessageId,
    pub content: String,
}

/// `delete_message`
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct DeleteMessagePayload {
    pub message_id: MessageId,
    pub chat_id: ChatId,
}

/// `add_reaction`
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct AddReactionPayload {
    pub message_id: MessageId,
    #[serde(rename = "type")]
    pub kind: ReactionKind,
    pub chat_id: ChatId,
}

/// `remove_reaction`
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RemoveReactionPayload {
    pub reaction_id: ReactionId,
    pub chat_id: ChatId,
}

/// `typing`
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct TypingPayload {
    pub chat_id: ChatId,
    #[serde(default)]
    pub is_typing: bool,
}

/// `notification`, `friend_invite`, `group_invite`
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct DirectPayload {
    pub recipient_id: UserId,
}
