//! Broadcaster
//!
//! Fans events out to connected users. Each event is encoded once and the
//! shared frame is queued on every recipient's outbound queue without
//! waiting. Delivery is best-effort: offline users are skipped and a failed
//! enqueue never stops the fan-out.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chat_common::OverflowPolicy;
use chat_core::{ChatId, Event, RealtimeSink, UserId};

use crate::connection::{Connection, ConnectionRegistry, DeliveryError};
use crate::protocol::{CloseCode, OutboundFrame};

/// Delivers events to users and rooms
pub struct Broadcaster {
    registry: Arc<ConnectionRegistry>,
    policy: OverflowPolicy,
    /// Frames discarded under the drop policy
    dropped: AtomicU64,
}

impl Broadcaster {
    #[must_use]
    pub fn new(registry: Arc<ConnectionRegistry>, policy: OverflowPolicy) -> Self {
        Self {
            registry,
            policy,
            dropped: AtomicU64::new(0),
        }
    }

    /// Send an event to one user. False when they are offline or the frame
    /// was not queued.
    pub fn send_to_user(&self, user_id: UserId, event: &Event) -> bool {
        let Some(connection) = self.registry.get(user_id) else {
            tracing::trace!(user_id = %user_id, event = %event.event_type, "Recipient offline");
            return false;
        };
        let Some(frame) = Self::encode(event) else {
            return false;
        };
        self.deliver(&connection, &frame)
    }

    /// Send an event to every live member of a room
    pub fn broadcast_to_room(&self, chat_id: ChatId, event: &Event) -> usize {
        self.fan_out(chat_id, event, None)
    }

    /// Send an event to every live member of a room except `excluded`
    pub fn broadcast_to_room_except(
        &self,
        chat_id: ChatId,
        event: &Event,
        excluded: UserId,
    ) -> usize {
        self.fan_out(chat_id, event, Some(excluded))
    }

    /// Snapshot of online users
    pub fn list_online(&self) -> Vec<UserId> {
        self.registry.list_online()
    }

    /// Frames discarded because a queue was full
    pub fn dropped_frames(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    fn fan_out(&self, chat_id: ChatId, event: &Event, excluded: Option<UserId>) -> usize {
        // Snapshot the members; no lock is held while queueing
        let members = self.registry.rooms().members(chat_id);
        if members.is_empty() {
            return 0;
        }
        let Some(frame) = Self::encode(event) else {
            return 0;
        };

        let mut sent = 0;
        for user_id in members {
            if Some(user_id) == excluded {
                continue;
            }
            if let Some(connection) = self.registry.get(user_id) {
                if self.deliver(&connection, &frame) {
                    sent += 1;
                }
            }
        }

        tracing::trace!(
            chat_id = %chat_id,
            event = %event.event_type,
            sent = sent,
            "Event broadcast to room"
        );
        sent
    }

    fn deliver(&self, connection: &Connection, frame: &OutboundFrame) -> bool {
        match connection.try_send(frame.clone()) {
            Ok(()) => true,
            Err(DeliveryError::Full) => {
                match self.policy {
                    OverflowPolicy::Drop => {
                        self.dropped.fetch_add(1, Ordering::Relaxed);
                        tracing::warn!(
                            connection_id = %connection.id(),
                            user_id = ?connection.user_id(),
                            "Outbound queue full, frame dropped"
                        );
                    }
                    OverflowPolicy::Disconnect => {
                        tracing::warn!(
                            connection_id = %connection.id(),
                            user_id = ?connection.user_id(),
                            "Outbound queue full, closing slow consumer"
                        );
                        connection.close(CloseCode::SlowConsumer);
                    }
                }
                false
            }
            Err(DeliveryError::Closed) => {
                tracing::debug!(connection_id = %connection.id(), "Connection closed, frame skipped");
                false
            }
        }
    }

    fn encode(event: &Event) -> Option<OutboundFrame> {
        OutboundFrame::encode(event)
            .map_err(|e| {
                tracing::error!(event = %event.event_type, error = %e, "Failed to encode event");
            })
            .ok()
    }
}

impl RealtimeSink for Broadcaster {
    fn send_to_user(&self, user_id: UserId, event: &Event) -> bool {
        Broadcaster::send_to_user(self, user_id, event)
    }

    fn broadcast_to_room(&self, chat_id: ChatId, event: &Event) -> usize {
        Broadcaster::broadcast_to_room(self, chat_id, event)
    }

    fn broadcast_to_room_except(&self, chat_id: ChatId, event: &Event, excluded: UserId) -> usize {
        Broadcaster::broadcast_to_room_except(self, chat_id, event, excluded)
    }

    fn list_online(&self) -> Vec<UserId> {
        Broadcaster::list_online(self)
    }
}

impl std::fmt::Debug for Broadcaster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Broadcaster")
            .field("registry", &self.registry)
            .field("policy", &self.policy)
            .field("dropped", &self.dropped.load(Ordering::Relaxed))
            .finish()
    }
}
