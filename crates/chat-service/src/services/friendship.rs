//! Friendship service
//!
//! The accepted-friend lookup presence relies on.

use chat_core::UserId;

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Friendship service
pub struct FriendshipService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> FriendshipService<'a> {
    /// Create a new FriendshipService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Users with an accepted friendship with `user_id`, sorted
    pub async fn friend_ids(&self, user_id: UserId) -> ServiceResult<Vec<UserId>> {
        let mut ids: Vec<UserId> = self
            .ctx
            .friendship_repo()
            .find_accepted(user_id)
            .await?
            .iter()
            .filter_map(|f| f.other_party(user_id))
            .collect();
        ids.sort_unstable();
        ids.dedup();
        Ok(ids)
    }
}
