//! Bundle of every in-memory repository

use std::sync::Arc;

use chat_core::entities::{
    Chat, ChatMember, ChatType, Friendship, FriendshipStatus, MemberRole,
};
use chat_core::traits::{ChatRepository, FriendshipRepository, RepoResult};
use chat_core::value_objects::{ChatId, FriendshipId, UserId};

use crate::memory::{
    MemChatRepository, MemFriendshipRepository, MemMessageRepository, MemNotificationRepository,
    MemReactionRepository,
};

/// Shared handles to one set of in-memory tables
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    pub chats: Arc<MemChatRepository>,
    pub messages: Arc<MemMessageRepository>,
    pub reactions: Arc<MemReactionRepository>,
    pub friendships: Arc<MemFriendshipRepository>,
    pub notifications: Arc<MemNotificationRepository>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a group chat with the given members; the first member is its admin
    pub async fn seed_chat(&self, name: &str, members: &[UserId]) -> RepoResult<ChatId> {
        let creator = members.first().copied().unwrap_or_default();
        let chat = self
            .chats
            .create(Chat::new(
                ChatId::default(),
                ChatType::PrivateGroup,
                name.to_string(),
                creator,
            ))
            .await?;

        for (i, user) in members.iter().enumerate() {
            let role = if i == 0 {
                MemberRole::Admin
            } else {
                MemberRole::Member
            };
            self.chats
                .add_member(ChatMember::new(chat.id, *user, role))
                .await?;
        }
        Ok(chat.id)
    }

    /// Record an accepted friendship between two users
    pub async fn seed_friends(&self, a: UserId, b: UserId) -> RepoResult<FriendshipId> {
        let friendship = self
            .friendships
            .create(Friendship::new(FriendshipId::default(), a, b))
            .await?;
        self.friendships
            .update_status(friendship.id, FriendshipStatus::Accepted)
            .await?;
        Ok(friendship.id)
    }
}
