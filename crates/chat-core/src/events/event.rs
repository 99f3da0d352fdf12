//! Wire event - the single frame shape exchanged over the realtime channel
//!
//! `{"type": "...", "data": {...}, "created_by": 42}`

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::value_objects::UserId;

/// Known event types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Connect,
    Join,
    Leave,
    SendMessage,
    EditMessage,
    DeleteMessage,
    AddReaction,
    RemoveReaction,
    Typing,
    Notification,
    FriendInvite,
    GroupInvite,
    UserOnline,
    UserOffline,
    OnlineUsersList,
}

impl EventType {
    /// Get the wire name
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Connect => "connect",
            Self::Join => "join",
            Self::Leave => "leave",
            Self::SendMessage => "send_message",
            Self::EditMessage => "edit_message",
            Self::DeleteMessage => "delete_message",
            Self::AddReaction => "add_reaction",
            Self::RemoveReaction => "remove_reaction",
            Self::Typing => "typing",
            Self::Notification => "notification",
            Self::FriendInvite => "friend_invite",
            Self::GroupInvite => "group_invite",
            Self::UserOnline => "user_online",
            Self::UserOffline => "user_offline",
            Self::OnlineUsersList => "online_users_list",
        }
    }

    /// Check if this type is only ever produced by the server
    pub const fn is_server_only(&self) -> bool {
        matches!(
            self,
            Self::UserOnline | Self::UserOffline | Self::OnlineUsersList
        )
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognized event type string
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown event type: {0}")]
pub struct UnknownEventType(pub String);

impl FromStr for EventType {
    type Err = UnknownEventType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "connect" => Self::Connect,
            "join" => Self::Join,
            "leave" => Self::Leave,
            "send_message" => Self::SendMessage,
            "edit_message" => Self::EditMessage,
            "delete_message" => Self::DeleteMessage,
            "add_reaction" => Self::AddReaction,
            "remove_reaction" => Self::RemoveReaction,
            "typing" => Self::Typing,
            "notification" => Self::Notification,
            "friend_invite" => Self::FriendInvite,
            "group_invite" => Self::GroupInvite,
            "user_online" => Self::UserOnline,
            "user_offline" => Self::UserOffline,
            "online_users_list" => Self::OnlineUsersList,
            other => return Err(UnknownEventType(other.to_string())),
        })
    }
}

/// A realtime event
///
/// The type is kept as a raw string so frames with unknown types still
/// decode and can be logged before being ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub data: Map<String, Value>,
    #[serde(default)]
    pub created_by: UserId,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Map<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Map<String, Value>>::deserialize(deserializer)?.unwrap_or_default())
}

impl Event {
    /// Build an event. Non-object `data` values are replaced by `{}`.
    pub fn new(event_type: EventType, data: Value, created_by: UserId) -> Self {
        let data = match data {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self {
            event_type: event_type.as_str().to_string(),
            data,
            created_by,
        }
    }

    /// Parse the type field
    pub fn kind(&self) -> Result<EventType, UnknownEventType> {
        self.event_type.parse()
    }

    /// Decode a text frame
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Encode as a text frame
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Look up a data field
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }
}
