//! Message events: persist first, then broadcast to the room

use chat_core::{Event, EventType, UserId};
use chat_service::{ChatService, EditMessageRequest, NewMessageRequest};
use serde_json::json;

use super::HandlerResult;
use crate::protocol::payloads::{DeleteMessagePayload, EditMessagePayload};
use crate::server::GatewayState;

/// Handles `send_message`, `edit_message` and `delete_message`
pub struct MessageHandler;

impl MessageHandler {
    /// Persist a new message and broadcast it to every room member,
    /// the sender included
    pub async fn send(
        state: &GatewayState,
        actor: UserId,
        request: NewMessageRequest,
    ) -> HandlerResult<()> {
        let chat_id = request.chat_id;
        let message = ChatService::new(state.services())
            .send_message(actor, request)
            .await?;

        let event = Event::new(EventType::SendMessage, json!({ "message": message }), actor);
        let sent = state.broadcaster().broadcast_to_room(chat_id, &event);

        tracing::debug!(chat_id = %chat_id, message_id = %message.id, sent = sent, "Message sent");
        Ok(())
    }

    /// Edit a message (author only) and broadcast to its room
    pub async fn edit(
        state: &GatewayState,
        actor: UserId,
        payload: EditMessagePayload,
    ) -> HandlerResult<()> {
        let message = ChatService::new(state.services())
            .edit_message(
                actor,
                payload.message_id,
                EditMessageRequest {
                    content: payload.content,
                },
            )
            .await?;

        let event = Event::new(
            EventType::EditMessage,
            json!({
                "message_id": message.id,
                "chat_id": message.chat_id,
                "content": message.content,
                "message": message,
            }),
            actor,
        );
        state.broadcaster().broadcast_to_room(message.chat_id, &event);
        Ok(())
    }

    /// Delete a message (author only) and broadcast to the given room
    pub async fn delete(
        state: &GatewayState,
        actor: UserId,
        payload: DeleteMessagePayload,
    ) -> HandlerResult<()> {
        ChatService::new(state.services())
            .delete_message(actor, payload.message_id)
            .await?;

        let event = Event::new(
            EventType::DeleteMessage,
            json!({ "message_id": payload.message_id, "chat_id": payload.chat_id }),
            actor,
        );
        state.broadcaster().broadcast_to_room(payload.chat_id, &event);
        Ok(())
    }
}
