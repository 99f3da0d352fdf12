//! Reaction events

use chat_core::{Event, EventType, UserId};
use chat_service::ChatService;
use serde_json::json;

use super::HandlerResult;
use crate::protocol::payloads::{AddReactionPayload, RemoveReactionPayload};
use crate::server::GatewayState;

/// Handles `add_reaction` / `remove_reaction`
pub struct ReactionHandler;

impl ReactionHandler {
    /// Toggle the user's reaction and broadcast the resulting aggregate.
    /// `reaction` is null when the last user took theirs back.
    pub async fn add(
        state: &GatewayState,
        actor: UserId,
        payload: AddReactionPayload,
    ) -> HandlerResult<()> {
        let chat = ChatService::new(state.services());
        let outcome = chat
            .toggle_reaction(actor, payload.message_id, payload.kind)
            .await?;
        let reaction = chat
            .reaction_of_kind(payload.message_id, payload.kind)
            .await?;

        tracing::debug!(
            message_id = %payload.message_id,
            kind = ?payload.kind,
            outcome = ?outcome,
            "Reaction toggled"
        );

        let event = Event::new(
            EventType::AddReaction,
            json!({
                "message_id": payload.message_id,
                "chat_id": payload.chat_id,
                "type": payload.kind,
                "reaction": reaction,
            }),
            actor,
        );
        state.broadcaster().broadcast_to_room(payload.chat_id, &event);
        Ok(())
    }

    /// Delete a whole reaction aggregate and broadcast its removal
    pub async fn remove(
        state: &GatewayState,
        actor: UserId,
        payload: RemoveReactionPayload,
    ) -> HandlerResult<()> {
        ChatService::new(state.services())
            .remove_reaction(payload.reaction_id)
            .await?;

        let event = Event::new(
            EventType::RemoveReaction,
            json!({ "reaction_id": payload.reaction_id, "chat_id": payload.chat_id }),
            actor,
        );
        state.broadcaster().broadcast_to_room(payload.chat_id, &event);
        Ok(())
    }
}
