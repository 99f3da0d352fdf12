//! Direct pass-through events (`notification`, `friend_invite`, `group_invite`)

use chat_core::{Event, UserId};

use super::HandlerResult;
use crate::protocol::payloads::DirectPayload;
use crate::server::GatewayState;

pub struct DirectHandler;

impl DirectHandler {
    /// Forward the event's data to the recipient only, authored by the bound user
    pub fn forward(
        state: &GatewayState,
        actor: UserId,
        event: Event,
        payload: DirectPayload,
    ) -> HandlerResult<()> {
        let forwarded = Event {
            event_type: event.event_type,
            data: event.data,
            created_by: actor,
        };

        if !state
            .broadcaster()
            .send_to_user(payload.recipient_id, &forwarded)
        {
            tracing::debug!(
                recipient_id = %payload.recipient_id,
                event = %forwarded.event_type,
                "Recipient offline, event not delivered"
            );
        }
        Ok(())
    }
}
