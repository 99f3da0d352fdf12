//! Join and leave

use std::sync::Arc;

use chat_core::{DomainError, UserId};
use chat_service::{ChatService, ServiceError};

use super::HandlerResult;
use crate::connection::Connection;
use crate::protocol::payloads::RoomPayload;
use crate::server::GatewayState;

/// Handles `join` / `leave`
pub struct RoomHandler;

impl RoomHandler {
    /// Add the user to a live room. Nothing is broadcast.
    pub async fn join(
        state: &GatewayState,
        connection: &Arc<Connection>,
        actor: UserId,
        payload: RoomPayload,
    ) -> HandlerResult<()> {
        let chat_id = payload.chat_id;

        if state.config().realtime.enforce_membership
            && !ChatService::new(state.services())
                .is_member(chat_id, actor)
                .await?
        {
            return Err(ServiceError::from(DomainError::NotChatMember(chat_id)).into());
        }

        if connection.is_closed() {
            tracing::debug!(
                user_id = %actor,
                connection_id = %connection.id(),
                "Join on a closing connection ignored"
            );
            return Ok(());
        }

        // Re-register when the user's live mapping was dropped
        if !state.registry().is_online(actor) {
            state.registry().add(actor, Arc::clone(connection));
        }

        if state.rooms().join(actor, chat_id) {
            tracing::info!(user_id = %actor, chat_id = %chat_id, "Joined room");
        }
        Ok(())
    }

    /// Remove the user from a live room. Nothing is broadcast.
    pub fn leave(state: &GatewayState, actor: UserId, payload: RoomPayload) -> HandlerResult<()> {
        if state.rooms().leave(actor, payload.chat_id) {
            tracing::info!(user_id = %actor, chat_id = %payload.chat_id, "Left room");
        }
        Ok(())
    }
}
