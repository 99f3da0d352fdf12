//! Presence notifier
//!
//! Tells friends when a user comes online or goes offline, and keeps each
//! user's `online_users_list` current. A recipient sees an online user when
//! it is themselves or when the two share a room, either durably (chat
//! membership) or live (joined to the same room right now).
//!
//! Lists are refreshed incrementally: only the user whose presence changed
//! and the online users who share a room with them are recomputed.

use std::collections::BTreeSet;
use std::sync::Arc;

use chat_core::UserId;
use chat_service::{ChatService, FriendshipService, ServiceContext};

use crate::broadcast::Broadcaster;
use crate::connection::{Connection, ConnectionRegistry};
use crate::protocol::{online_users_list, user_offline, user_online};

/// Runs the connect and disconnect presence sequences
pub struct PresenceNotifier {
    services: Arc<ServiceContext>,
    registry: Arc<ConnectionRegistry>,
    broadcaster: Arc<Broadcaster>,
}

impl PresenceNotifier {
    #[must_use]
    pub fn new(
        services: Arc<ServiceContext>,
        registry: Arc<ConnectionRegistry>,
        broadcaster: Arc<Broadcaster>,
    ) -> Self {
        Self {
            services,
            registry,
            broadcaster,
        }
    }

    /// Run after `user_id` has been registered
    pub async fn on_connect(&self, user_id: UserId) {
        let friends = self.friends_of(user_id).await;

        // Friends already online, announced to the newcomer
        for friend in friends.iter().copied().filter(|f| self.registry.is_online(*f)) {
            self.broadcaster.send_to_user(user_id, &user_online(friend));
        }

        // The newcomer, announced to friends
        let announcement = user_online(user_id);
        for friend in &friends {
            self.broadcaster.send_to_user(*friend, &announcement);
        }

        let mut targets = self.visible_peers(user_id).await;
        targets.insert(user_id);
        self.refresh_lists(targets).await;

        tracing::debug!(user_id = %user_id, friends = friends.len(), "Presence online");
    }

    /// Run when a connection's worker shuts down. Does nothing unless the
    /// connection is still the one registered for its user; returns whether
    /// it released the user.
    pub async fn on_disconnect(&self, connection: &Connection) -> bool {
        let Some(user_id) = connection.user_id() else {
            return false;
        };
        if !self.registry.is_current(connection) {
            tracing::debug!(
                user_id = %user_id,
                connection_id = %connection.id(),
                "Superseded connection closed, presence unchanged"
            );
            return false;
        }

        // Computed before release, while live room membership still exists
        let targets = self.visible_peers(user_id).await;

        if !self.registry.release(connection) {
            tracing::debug!(
                user_id = %user_id,
                connection_id = %connection.id(),
                "Replaced while closing, presence unchanged"
            );
            return false;
        }

        let friends = self.friends_of(user_id).await;
        // A reconnect during the lookup has already announced the user online
        if self.registry.is_online(user_id) {
            tracing::debug!(user_id = %user_id, "Reconnected before offline fan-out");
        } else {
            let announcement = user_offline(user_id);
            for friend in friends {
                self.broadcaster.send_to_user(friend, &announcement);
            }
        }

        self.refresh_lists(targets).await;

        tracing::debug!(user_id = %user_id, "Presence offline");
        true
    }

    /// Online users `recipient` is allowed to see, sorted
    pub async fn online_list_for(&self, recipient: UserId) -> Vec<UserId> {
        let visible = self.visible_peers(recipient).await;
        self.registry
            .list_online()
            .into_iter()
            .filter(|u| *u == recipient || visible.contains(u))
            .collect()
    }

    async fn refresh_lists(&self, targets: BTreeSet<UserId>) {
        for recipient in targets {
            if !self.registry.is_online(recipient) {
                continue;
            }
            let list = self.online_list_for(recipient).await;
            self.broadcaster
                .send_to_user(recipient, &online_users_list(&list));
        }
    }

    /// Users sharing a durable chat or a live room with `user_id`
    async fn visible_peers(&self, user_id: UserId) -> BTreeSet<UserId> {
        let mut peers = match ChatService::new(&self.services).peers_of(user_id).await {
            Ok(peers) => peers,
            Err(e) => {
                tracing::warn!(user_id = %user_id, error = %e, "Failed to load chat peers");
                BTreeSet::new()
            }
        };
        peers.extend(self.registry.rooms().co_members(user_id));
        peers
    }

    async fn friends_of(&self, user_id: UserId) -> Vec<UserId> {
        match FriendshipService::new(&self.services).friend_ids(user_id).await {
            Ok(friends) => friends,
            Err(e) => {
                tracing::warn!(user_id = %user_id, error = %e, "Failed to load friends");
                Vec::new()
            }
        }
    }
}

impl std::fmt::Debug for PresenceNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PresenceNotifier")
            .field("registry", &self.registry)
            .finish()
    }
}
