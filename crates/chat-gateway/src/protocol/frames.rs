//! Outbound frames and server-originated events

use std::sync::Arc;

use chat_core::{Event, EventType, UserId};
use serde_json::json;

/// An encoded text frame, shared by every recipient of one broadcast
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundFrame(Arc<str>);

impl OutboundFrame {
    /// Serialize an event once
    pub fn encode(event: &Event) -> Result<Self, serde_json::Error> {
        Ok(Self(Arc::from(event.to_json()?)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// `user_online{user_id}` authored by the user who came online
pub fn user_online(user_id: UserId) -> Event {
    Event::new(EventType::UserOnline, json!({ "user_id": user_id }), user_id)
}

/// `user_offline{user_id}` authored by the user who went offline
pub fn user_offline(user_id: UserId) -> Event {
    Event::new(EventType::UserOffline, json!({ "user_id": user_id }), user_id)
}

/// `online_users_list{online_users}`
pub fn online_users_list(online_users: &[UserId]) -> Event {
    Event::new(
        EventType::OnlineUsersList,
        json!({ "online_users": online_users }),
        UserId::SYSTEM,
    )
}
