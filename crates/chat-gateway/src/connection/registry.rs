//! Connection registry
//!
//! Maps each online user to their single live connection. Uses `DashMap`
//! so lookups from broadcast paths never contend on a global lock.

use std::sync::Arc;

use chat_core::UserId;
use dashmap::DashMap;

use super::Connection;
use crate::protocol::CloseCode;
use crate::rooms::RoomIndex;

/// Online users and their connections
pub struct ConnectionRegistry {
    /// User ID to live connection
    connections: DashMap<UserId, Arc<Connection>>,

    /// Live room membership, cleaned up when a user goes offline
    rooms: Arc<RoomIndex>,
}

impl ConnectionRegistry {
    #[must_use]
    pub fn new(rooms: Arc<RoomIndex>) -> Self {
        Self {
            connections: DashMap::new(),
            rooms,
        }
    }

    /// Register `connection` as the live transport for `user_id`.
    ///
    /// A different connection previously registered for the user is told to
    /// close with [`CloseCode::SessionReplaced`] and returned.
    pub fn add(&self, user_id: UserId, connection: Arc<Connection>) -> Option<Arc<Connection>> {
        let connection_id = connection.id();
        let previous = self.connections.insert(user_id, connection);
        self.rooms.register_user(user_id);

        match previous {
            Some(previous) if previous.id() != connection_id => {
                previous.close(CloseCode::SessionReplaced);
                tracing::info!(
                    user_id = %user_id,
                    replaced = %previous.id(),
                    connection_id = %connection_id,
                    "Connection replaced"
                );
                Some(previous)
            }
            _ => {
                tracing::debug!(user_id = %user_id, connection_id = %connection_id, "Connection added");
                None
            }
        }
    }

    /// Deregister the user and take them out of every room
    pub fn remove(&self, user_id: UserId) -> Option<Arc<Connection>> {
        let removed = self.connections.remove(&user_id).map(|(_, conn)| conn);
        let rooms = self.rooms.remove_user(user_id);
        tracing::debug!(user_id = %user_id, rooms = rooms.len(), "Connection removed");
        removed
    }

    /// Deregister `connection`, but only if it is still the one mapped to
    /// its user. A replaced connection's shutdown leaves its successor alone.
    pub fn release(&self, connection: &Connection) -> bool {
        let Some(user_id) = connection.user_id() else {
            return false;
        };

        let released = self
            .connections
            .remove_if(&user_id, |_, current| current.id() == connection.id())
            .is_some();

        if released {
            let rooms = self.rooms.remove_user(user_id);
            tracing::debug!(
                user_id = %user_id,
                connection_id = %connection.id(),
                rooms = rooms.len(),
                "Connection released"
            );
        }
        released
    }

    /// Get the live connection for a user
    pub fn get(&self, user_id: UserId) -> Option<Arc<Connection>> {
        self.connections.get(&user_id).map(|r| Arc::clone(r.value()))
    }

    pub fn is_online(&self, user_id: UserId) -> bool {
        self.connections.contains_key(&user_id)
    }

    /// Check whether `connection` is the one registered for its user
    pub fn is_current(&self, connection: &Connection) -> bool {
        connection.user_id().is_some_and(|user_id| {
            self.connections
                .get(&user_id)
                .is_some_and(|current| current.id() == connection.id())
        })
    }

    /// Snapshot of online users, sorted
    pub fn list_online(&self) -> Vec<UserId> {
        let mut users: Vec<UserId> = self.connections.iter().map(|r| *r.key()).collect();
        users.sort_unstable();
        users
    }

    /// Get the total number of registered connections
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    pub fn rooms(&self) -> &RoomIndex {
        &self.rooms
    }
}

impl std::fmt::Debug for ConnectionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionRegistry")
            .field("connections", &self.connections.len())
            .field("rooms", &self.rooms.room_count())
            .finish()
    }
}
