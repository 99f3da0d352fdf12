//! In-memory implementation of FriendshipRepository

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::instrument;

use chat_core::entities::{Friendship, FriendshipStatus};
use chat_core::error::DomainError;
use chat_core::traits::{FriendshipRepository, RepoResult};
use chat_core::value_objects::{FriendshipId, UserId};

use super::sequence::IdSequence;

/// In-memory implementation of FriendshipRepository
#[derive(Debug, Clone, Default)]
pub struct MemFriendshipRepository {
    friendships: Arc<RwLock<HashMap<FriendshipId, Friendship>>>,
    ids: Arc<IdSequence>,
}

impl MemFriendshipRepository {
    /// Create a new empty MemFriendshipRepository
    pub fn new() -> Self {
        Self::default()
    }

    fn collect_sorted(&self, keep: impl Fn(&Friendship) -> bool) -> Vec<Friendship> {
        let mut found: Vec<Friendship> = self
            .friendships
            .read()
            .values()
            .filter(|f| keep(f))
            .cloned()
            .collect();
        found.sort_by_key(|f| f.id);
        found
    }
}

#[async_trait]
impl FriendshipRepository for MemFriendshipRepository {
    async fn find_by_id(&self, id: FriendshipId) -> RepoResult<Option<Friendship>> {
        Ok(self.friendships.read().get(&id).cloned())
    }

    async fn find_between(&self, a: UserId, b: UserId) -> RepoResult<Option<Friendship>> {
        Ok(self
            .friendships
            .read()
            .values()
            .find(|f| f.involves(a) && f.other_party(a) == Some(b))
            .cloned())
    }

    async fn find_by_user(&self, user_id: UserId) -> RepoResult<Vec<Friendship>> {
        Ok(self.collect_sorted(|f| f.involves(user_id)))
    }

    async fn find_accepted(&self, user_id: UserId) -> RepoResult<Vec<Friendship>> {
        Ok(self.collect_sorted(|f| f.involves(user_id) && f.is_accepted()))
    }

    #[instrument(skip(self, friendship), fields(user_id = %friendship.user_id, friend_id = %friendship.friend_id))]
    async fn create(&self, mut friendship: Friendship) -> RepoResult<Friendship> {
        let mut friendships = self.friendships.write();
        let (a, b) = (friendship.user_id, friendship.friend_id);
        if friendships
            .values()
            .any(|f| f.involves(a) && f.other_party(a) == Some(b))
        {
            return Err(DomainError::FriendshipExists);
        }

        if friendship.id.is_zero() {
            friendship.id = FriendshipId::new(self.ids.next());
        } else {
            self.ids.observe(friendship.id.into_inner());
        }
        friendships.insert(friendship.id, friendship.clone());
        Ok(friendship)
    }

    #[instrument(skip(self))]
    async fn update_status(&self, id: FriendshipId, status: FriendshipStatus) -> RepoResult<()> {
        let mut friendships = self.friendships.write();
        let friendship = friendships
            .get_mut(&id)
            .ok_or_else(|| DomainError::ValidationError(format!("unknown friendship {id}")))?;
        friendship.set_status(status);
        Ok(())
    }
}
