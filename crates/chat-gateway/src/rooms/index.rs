//! Room index
//!
//! Which users are joined to which live rooms, kept in both directions.
//! Both tables sit under a single lock so `u ∈ members(r)` holds exactly when
//! `r ∈ rooms_of(u)`.

use std::collections::{HashMap, HashSet};

use chat_core::{ChatId, UserId};
use parking_lot::RwLock;

#[derive(Debug, Default)]
struct Tables {
    /// Room ID to joined users
    members: HashMap<ChatId, HashSet<UserId>>,
    /// User ID to joined rooms
    rooms: HashMap<UserId, HashSet<ChatId>>,
}

/// Bidirectional user/room membership for live connections
#[derive(Debug, Default)]
pub struct RoomIndex {
    tables: RwLock<Tables>,
}

impl RoomIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Join a room. Returns false, without touching anything, when the user
    /// is already a member.
    pub fn join(&self, user_id: UserId, chat_id: ChatId) -> bool {
        let mut tables = self.tables.write();
        if !tables.members.entry(chat_id).or_default().insert(user_id) {
            return false;
        }
        tables.rooms.entry(user_id).or_default().insert(chat_id);
        true
    }

    /// Leave a room. Empty rooms are dropped.
    pub fn leave(&self, user_id: UserId, chat_id: ChatId) -> bool {
        let mut tables = self.tables.write();
        let removed = match tables.members.get_mut(&chat_id) {
            Some(members) => {
                let removed = members.remove(&user_id);
                if members.is_empty() {
                    tables.members.remove(&chat_id);
                }
                removed
            }
            None => false,
        };
        if let Some(rooms) = tables.rooms.get_mut(&user_id) {
            rooms.remove(&chat_id);
        }
        removed
    }

    /// Users joined to a room; empty for unknown rooms
    pub fn members(&self, chat_id: ChatId) -> HashSet<UserId> {
        self.tables
            .read()
            .members
            .get(&chat_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Rooms a user is joined to
    pub fn rooms_of(&self, user_id: UserId) -> HashSet<ChatId> {
        self.tables
            .read()
            .rooms
            .get(&user_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Make sure the user has a (possibly empty) reverse entry
    pub fn register_user(&self, user_id: UserId) {
        self.tables.write().rooms.entry(user_id).or_default();
    }

    /// Drop the user from every room they are in. Returns those rooms, sorted.
    pub fn remove_user(&self, user_id: UserId) -> Vec<ChatId> {
        let mut tables = self.tables.write();
        let Some(rooms) = tables.rooms.remove(&user_id) else {
            return Vec::new();
        };

        for chat_id in &rooms {
            if let Some(members) = tables.members.get_mut(chat_id) {
                members.remove(&user_id);
                if members.is_empty() {
                    tables.members.remove(chat_id);
                }
            }
        }

        let mut rooms: Vec<ChatId> = rooms.into_iter().collect();
        rooms.sort_unstable();
        rooms
    }

    /// Everyone sharing at least one live room with the user
    pub fn co_members(&self, user_id: UserId) -> HashSet<UserId> {
        let tables = self.tables.read();
        let Some(rooms) = tables.rooms.get(&user_id) else {
            return HashSet::new();
        };

        rooms
            .iter()
            .filter_map(|chat_id| tables.members.get(chat_id))
            .flatten()
            .copied()
            .filter(|other| *other != user_id)
            .collect()
    }

    pub fn is_member(&self, user_id: UserId, chat_id: ChatId) -> bool {
        self.tables
            .read()
            .members
            .get(&chat_id)
            .is_some_and(|members| members.contains(&user_id))
    }

    /// Number of rooms with at least one member
    pub fn room_count(&self) -> usize {
        self.tables.read().members.len()
    }

    #[cfg(test)]
    fn is_consistent(&self) -> bool {
        let tables = self.tables.read();
        let forward = tables.members.iter().all(|(chat_id, users)| {
            !users.is_empty()
                && users.iter().all(|u| {
                    tables
                        .rooms
                        .get(u)
                        .is_some_and(|rooms| rooms.contains(chat_id))
                })
        });
        let backward = tables.rooms.iter().all(|(u, rooms)| {
            rooms.iter().all(|chat_id| {
                tables
                    .members
                    .get(chat_id)
                    .is_some_and(|users| users.contains(u))
            })
        });
        forward && backward
    }
}
