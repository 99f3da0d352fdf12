//! Typing indicator

use chat_core::{Event, EventType, UserId};
use serde_json::json;

use super::HandlerResult;
use crate::protocol::payloads::TypingPayload;
use crate::server::GatewayState;

pub struct TypingHandler;

impl TypingHandler {
    /// Relay to everyone in the room except the typist
    pub fn handle(state: &GatewayState, actor: UserId, payload: TypingPayload) -> HandlerResult<()> {
        let event = Event::new(
            EventType::Typing,
            json!({
                "user_id": actor,
                "chat_id": payload.chat_id,
                "is_typing": payload.is_typing,
            }),
            actor,
        );
        state
            .broadcaster()
            .broadcast_to_room_except(payload.chat_id, &event, actor);
        Ok(())
    }
}
