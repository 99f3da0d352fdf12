//! Realtime delivery port
//!
//! Code outside the gateway (services, HTTP handlers) pushes events to
//! connected users through this trait. Delivery is best-effort and never
//! blocks: offline users are skipped.

use crate::events::Event;
use crate::value_objects::{ChatId, UserId};

pub trait RealtimeSink: Send + Sync {
    /// Deliver an event to one user. Returns false if the user is offline
    /// or the frame could not be queued.
    fn send_to_user(&self, user_id: UserId, event: &Event) -> bool;

    /// Deliver an event to every live member of a room. Returns the number
    /// of members the frame was queued for.
    fn broadcast_to_room(&self, chat_id: ChatId, event: &Event) -> usize;

    /// Same as `broadcast_to_room`, skipping `excluded`
    fn broadcast_to_room_except(&self, chat_id: ChatId, event: &Event, excluded: UserId) -> usize;

    /// Snapshot of users with a live connection
    fn list_online(&self) -> Vec<UserId>;
}
