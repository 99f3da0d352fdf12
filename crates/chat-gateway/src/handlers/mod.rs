//! Inbound event handlers
//!
//! Routes each decoded event to its handler by type, after resolving the
//! acting user.

mod bind;
mod direct;
mod error;
mod message;
mod reaction;
mod room;
mod typing;

pub use bind::BindHandler;
pub use direct::DirectHandler;
pub use error::{HandlerError, HandlerResult};
pub use message::MessageHandler;
pub use reaction::ReactionHandler;
pub use room::RoomHandler;
pub use typing::TypingHandler;

use std::sync::Arc;

use chat_core::{Event, EventType};

use crate::connection::Connection;
use crate::protocol::payloads::decode;
use crate::server::GatewayState;

/// Dispatch incoming client events to the appropriate handler
pub struct EventDispatcher;

impl EventDispatcher {
    /// Handle one inbound event
    pub async fn dispatch(
        state: &GatewayState,
        connection: &Arc<Connection>,
        event: Event,
    ) -> HandlerResult<()> {
        let actor = BindHandler::resolve(state, connection, event.created_by).await?;

        let kind = event.kind()?;
        if kind.is_server_only() {
            return Err(HandlerError::ServerOnly(kind));
        }
        tracing::trace!(user_id = %actor, event = %kind, "Dispatching event");

        match kind {
            EventType::Connect => {
                tracing::debug!(user_id = %actor, "Connect acknowledged");
                Ok(())
            }
            EventType::Join => RoomHandler::join(state, connection, actor, decode(&event.data)?).await,
            EventType::Leave => RoomHandler::leave(state, actor, decode(&event.data)?),
            EventType::SendMessage => MessageHandler::send(state, actor, decode(&event.data)?).await,
            EventType::EditMessage => MessageHandler::edit(state, actor, decode(&event.data)?).await,
            EventType::DeleteMessage => {
                MessageHandler::delete(state, actor, decode(&event.data)?).await
            }
            EventType::AddReaction => ReactionHandler::add(state, actor, decode(&event.data)?).await,
            EventType::RemoveReaction => {
                ReactionHandler::remove(state, actor, decode(&event.data)?).await
            }
            EventType::Typing => TypingHandler::handle(state, actor, decode(&event.data)?),
            EventType::Notification | EventType::FriendInvite | EventType::GroupInvite => {
                let payload = decode(&event.data)?;
                DirectHandler::forward(state, actor, event, payload)
            }
            _ => Err(HandlerError::ServerOnly(kind)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::OutboundFrame;
    use chat_common::AppConfig;
    use chat_core::{ChatId, MessageId, UserId};
    use chat_db::InMemoryStore;
    use serde_json::{json, Value};
    use tokio::sync::mpsc;

    const ROOM: ChatId = ChatId::new(1);

    struct Client {
        connection: Arc<Connection>,
        rx: mpsc::Receiver<OutboundFrame>,
    }

    impl Client {
        fn new() -> Self {
            let (tx, rx) = mpsc::channel(64);
            Self {
                connection: Connection::new(tx),
                rx,
            }
        }

        async fn send(&self, state: &GatewayState, raw: Value) -> HandlerResult<()> {
            let event: Event = serde_json::from_value(raw).unwrap();
            EventDispatcher::dispatch(state, &self.connection, event).await
        }

        /// Received events, presence lists filtered out
        fn drain(&mut self) -> Vec<Event> {
            let mut events = Vec::new();
            while let Ok(frame) = self.rx.try_recv() {
                let event = Event::from_json(frame.as_str()).unwrap();
                if event.kind() != Ok(EventType::OnlineUsersList) {
                    events.push(event);
                }
            }
            events
        }
    }

    fn state() -> (GatewayState, InMemoryStore) {
        let store = InMemoryStore::new();
        let state = GatewayState::new(AppConfig::local(), &store).unwrap();
        (state, store)
    }

    async fn joined(state: &GatewayState, user: i64) -> Client {
        let client = Client::new();
        client
            .send(state, json!({"type": "join", "data": {"chat_id": 1}, "created_by": user}))
            .await
            .unwrap();
        client
    }

    #[tokio::test]
    async fn test_first_identified_event_binds() {
        let (state, _) = state();
        let client = Client::new();

        let err = client
            .send(&state, json!({"type": "connect", "data": {}}))
            .await
            .unwrap_err();
        assert!(matches!(err, HandlerError::NotBound));
        assert!(!client.connection.is_bound());

        client
            .send(&state, json!({"type": "connect", "created_by": 7}))
            .await
            .unwrap();
        assert_eq!(client.connection.user_id(), Some(UserId::new(7)));
        assert!(state.registry().is_current(&client.connection));
    }

    #[tokio::test]
    async fn test_identity_mismatch_is_rejected() {
        let (state, _) = state();
        let client = joined(&state, 7).await;

        let err = client
            .send(&state, json!({"type": "join", "data": {"chat_id": 2}, "created_by": 8}))
            .await
            .unwrap_err();
        assert!(matches!(err, HandlerError::IdentityMismatch { .. }));
        assert!(!state.registry().is_online(UserId::new(8)));
        assert!(!state.rooms().is_member(UserId::new(8), ChatId::new(2)));

        // created_by 0 acts as the bound user
        client
            .send(&state, json!({"type": "join", "data": {"chat_id": 2}}))
            .await
            .unwrap();
        assert!(state.rooms().is_member(UserId::new(7), ChatId::new(2)));
    }

    #[tokio::test]
    async fn test_send_message_reaches_whole_room() {
        let (state, _) = state();
        let mut a = joined(&state, 1).await;
        let mut b = joined(&state, 2).await;
        let mut outsider = Client::new();
        outsider
            .send(&state, json!({"type": "connect", "created_by": 3}))
            .await
            .unwrap();
        a.drain();
        b.drain();
        outsider.drain();

        a.send(
            &state,
            json!({"type": "send_message", "data": {"chat_id": 1, "content": "hi"}, "created_by": 1}),
        )
        .await
        .unwrap();

        for client in [&mut a, &mut b] {
            let events = client.drain();
            assert_eq!(events.len(), 1);
            assert_eq!(events[0].event_type, "send_message");
            assert_eq!(events[0].data["message"]["content"], "hi");
            assert_eq!(events[0].data["message"]["type"], "text");
            assert_eq!(events[0].created_by, UserId::new(1));
        }
        assert!(outsider.drain().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_message_broadcasts_nothing() {
        let (state, _) = state();
        let mut a = joined(&state, 1).await;
        a.drain();

        let err = a
            .send(&state, json!({"type": "send_message", "data": {"chat_id": 1, "content": "  "}}))
            .await
            .unwrap_err();
        assert!(err.is_service_error());

        let err = a
            .send(&state, json!({"type": "send_message", "data": {"content": "no room"}}))
            .await
            .unwrap_err();
        assert!(matches!(err, HandlerError::InvalidPayload(_)));
        assert!(a.drain().is_empty());
    }

    #[tokio::test]
    async fn test_typing_excludes_sender() {
        let (state, _) = state();
        let mut a = joined(&state, 1).await;
        let mut b = joined(&state, 2).await;
        a.drain();
        b.drain();

        a.send(
            &state,
            json!({"type": "typing", "data": {"chat_id": 1, "is_typing": true}}),
        )
        .await
        .unwrap();

        assert!(a.drain().is_empty());
        let events = b.drain();
        assert_eq!(events.len(), 1);
        assert_eq!(
            Value::Object(events[0].data.clone()),
            json!({"user_id": 1, "chat_id": 1, "is_typing": true})
        );
    }

    #[tokio::test]
    async fn test_edit_and_delete_are_author_only() {
        let (state, _) = state();
        let mut a = joined(&state, 1).await;
        let mut b = joined(&state, 2).await;

        a.send(&state, json!({"type": "send_message", "data": {"chat_id": 1, "content": "v1"}}))
            .await
            .unwrap();
        let message_id = a.drain().last().unwrap().data["message"]["id"].as_i64().unwrap();
        b.drain();

        let err = b
            .send(
                &state,
                json!({"type": "edit_message", "data": {"message_id": message_id, "content": "hijack"}}),
            )
            .await
            .unwrap_err();
        assert!(err.is_service_error());
        assert!(a.drain().is_empty());

        a.send(
            &state,
            json!({"type": "edit_message", "data": {"message_id": message_id, "content": "v2"}}),
        )
        .await
        .unwrap();
        let edit = b.drain();
        assert_eq!(edit[0].data["content"], "v2");
        assert_eq!(edit[0].data["chat_id"], 1);

        a.send(
            &state,
            json!({"type": "delete_message", "data": {"message_id": message_id, "chat_id": 1}}),
        )
        .await
        .unwrap();
        let delete = b.drain();
        assert_eq!(
            Value::Object(delete[0].data.clone()),
            json!({"message_id": message_id, "chat_id": 1})
        );

        let gone = state
            .services()
            .message_repo()
            .find_by_id(MessageId::new(message_id))
            .await
            .unwrap();
        assert!(gone.is_none());

        let err = a
            .send(
                &state,
                json!({"type": "edit_message", "data": {"message_id": message_id, "content": "v3"}}),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, HandlerError::Service(ref e) if e.is_not_found()));
    }

    #[tokio::test]
    async fn test_reaction_toggle_broadcasts_aggregate() {
        let (state, _) = state();
        let mut a = joined(&state, 1).await;
        let mut b = joined(&state, 2).await;

        a.send(&state, json!({"type": "send_message", "data": {"chat_id": 1, "content": "react"}}))
            .await
            .unwrap();
        let message_id = a.drain().last().unwrap().data["message"]["id"].clone();
        b.drain();

        let react = json!({"type": "add_reaction", "data": {"message_id": message_id, "type": "like", "chat_id": 1}});

        b.send(&state, react.clone()).await.unwrap();
        let added = a.drain();
        assert_eq!(added[0].data["type"], "like");
        assert_eq!(added[0].data["reaction"]["count"], 1);
        assert_eq!(added[0].data["reaction"]["user_ids"], json!([2]));

        // Same user again takes it back; the aggregate is gone
        b.send(&state, react).await.unwrap();
        let removed = a.drain();
        assert!(removed[0].data["reaction"].is_null());
    }

    #[tokio::test]
    async fn test_remove_reaction() {
        let (state, _) = state();
        let mut a = joined(&state, 1).await;

        a.send(&state, json!({"type": "send_message", "data": {"chat_id": 1, "content": "x"}}))
            .await
            .unwrap();
        let message_id = a.drain().last().unwrap().data["message"]["id"].clone();
        a.send(
            &state,
            json!({"type": "add_reaction", "data": {"message_id": message_id, "type": "wow", "chat_id": 1}}),
        )
        .await
        .unwrap();
        let reaction_id = a.drain().last().unwrap().data["reaction"]["id"].clone();

        a.send(
            &state,
            json!({"type": "remove_reaction", "data": {"reaction_id": reaction_id, "chat_id": 1}}),
        )
        .await
        .unwrap();
        let events = a.drain();
        assert_eq!(events[0].event_type, "remove_reaction");
        assert_eq!(events[0].data["reaction_id"], reaction_id);

        // Already gone
        let err = a
            .send(
                &state,
                json!({"type": "remove_reaction", "data": {"reaction_id": reaction_id, "chat_id": 1}}),
            )
            .await
            .unwrap_err();
        assert!(err.is_service_error());
    }

    #[tokio::test]
    async fn test_notification_goes_to_recipient_only() {
        let (state, _) = state();
        let mut a = joined(&state, 1).await;
        let mut b = joined(&state, 2).await;
        a.drain();
        b.drain();

        a.send(
            &state,
            json!({"type": "friend_invite", "data": {"recipient_id": 2, "note": "hey"}}),
        )
        .await
        .unwrap();

        assert!(a.drain().is_empty());
        let events = b.drain();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type, "friend_invite");
        assert_eq!(events[0].data["note"], "hey");
        assert_eq!(events[0].created_by, UserId::new(1));
    }

    #[tokio::test]
    async fn test_unknown_and_server_only_types_are_ignored() {
        let (state, _) = state();
        let client = joined(&state, 1).await;

        let err = client
            .send(&state, json!({"type": "dance"}))
            .await
            .unwrap_err();
        assert!(matches!(err, HandlerError::UnknownEvent(_)));

        let err = client
            .send(&state, json!({"type": "user_online", "data": {"user_id": 5}}))
            .await
            .unwrap_err();
        assert!(matches!(err, HandlerError::ServerOnly(EventType::UserOnline)));
    }

    #[tokio::test]
    async fn test_replaced_connection_cannot_rejoin() {
        let (state, _) = state();
        let old = Client::new();
        old.send(&state, json!({"type": "connect", "created_by": 1}))
            .await
            .unwrap();
        let new = Client::new();
        new.send(&state, json!({"type": "connect", "created_by": 1}))
            .await
            .unwrap();
        assert!(old.connection.is_closed());

        assert!(state.registry().remove(UserId::new(1)).is_some());
        old.send(&state, json!({"type": "join", "data": {"chat_id": 1}}))
            .await
            .unwrap();

        assert!(!state.registry().is_online(UserId::new(1)));
        assert!(!state.rooms().is_member(UserId::new(1), ROOM));
    }

    #[tokio::test]
    async fn test_leave_stops_delivery() {
        let (state, _) = state();
        let mut a = joined(&state, 1).await;
        let mut b = joined(&state, 2).await;

        b.send(&state, json!({"type": "leave", "data": {"chat_id": 1}}))
            .await
            .unwrap();
        assert!(!state.rooms().is_member(UserId::new(2), ROOM));
        a.drain();
        b.drain();

        a.send(&state, json!({"type": "typing", "data": {"chat_id": 1, "is_typing": true}}))
            .await
            .unwrap();
        assert!(b.drain().is_empty());
    }

    #[tokio::test]
    async fn test_enforced_membership() {
        let store = InMemoryStore::new();
        let chat_id = store.seed_chat("team", &[UserId::new(1)]).await.unwrap();
        let mut config = AppConfig::local();
        config.realtime.enforce_membership = true;
        let state = GatewayState::new(config, &store).unwrap();

        let member = Client::new();
        member
            .send(&state, json!({"type": "join", "data": {"chat_id": chat_id}, "created_by": 1}))
            .await
            .unwrap();
        assert!(state.rooms().is_member(UserId::new(1), chat_id));

        let stranger = Client::new();
        let err = stranger
            .send(&state, json!({"type": "join", "data": {"chat_id": chat_id}, "created_by": 2}))
            .await
            .unwrap_err();
        assert!(err.is_service_error());
        assert!(!state.rooms().is_member(UserId::new(2), chat_id));
    }
}
