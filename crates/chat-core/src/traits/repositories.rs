//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs, and the storage layer provides
//! the implementation. Records passed to `create` carry a zero id; the
//! repository assigns one and returns the stored record.

use async_trait::async_trait;

use crate::entities::{
    Chat, ChatMember, Friendship, FriendshipStatus, Message, Notification, Reaction, ReactionKind,
    ReactionToggle,
};
use crate::error::DomainError;
use crate::value_objects::{
    ChatId, FriendshipId, MessageId, NotificationId, ReactionId, UserId,
};

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Chat Repository
// ============================================================================

#[async_trait]
pub trait ChatRepository: Send + Sync {
    /// Find chat by ID
    async fn find_by_id(&self, id: ChatId) -> RepoResult<Option<Chat>>;

    /// List all chats a user is a durable member of
    async fn find_by_user(&self, user_id: UserId) -> RepoResult<Vec<Chat>>;

    /// Create a new chat
    async fn create(&self, chat: Chat) -> RepoResult<Chat>;

    /// List the members of a chat
    async fn find_members(&self, chat_id: ChatId) -> RepoResult<Vec<ChatMember>>;

    /// Add a member to a chat
    async fn add_member(&self, member: ChatMember) -> RepoResult<()>;

    /// Remove a member from a chat, returns false when they were not a member
    async fn remove_member(&self, chat_id: ChatId, user_id: UserId) -> RepoResult<bool>;

    /// Check durable membership
    async fn is_member(&self, chat_id: ChatId, user_id: UserId) -> RepoResult<bool>;
}

// ============================================================================
// Message Repository
// ============================================================================

#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Find message by ID
    async fn find_by_id(&self, id: MessageId) -> RepoResult<Option<Message>>;

    /// List messages of a chat, oldest first
    async fn find_by_chat(&self, chat_id: ChatId, limit: usize) -> RepoResult<Vec<Message>>;

    /// Create a new message
    async fn create(&self, message: Message) -> RepoResult<Message>;

    /// Update an existing message
    async fn update(&self, message: &Message) -> RepoResult<()>;

    /// Delete a message
    async fn delete(&self, id: MessageId) -> RepoResult<()>;
}

// ============================================================================
// Reaction Repository
// ============================================================================

#[async_trait]
pub trait ReactionRepository: Send + Sync {
    /// Find reaction aggregate by ID
    async fn find_by_id(&self, id: ReactionId) -> RepoResult<Option<Reaction>>;

    /// Get all reaction aggregates for a message
    async fn find_by_message(&self, message_id: MessageId) -> RepoResult<Vec<Reaction>>;

    /// Get the aggregate of one kind for a message
    async fn find_by_kind(
        &self,
        message_id: MessageId,
        kind: ReactionKind,
    ) -> RepoResult<Option<Reaction>>;

    /// Atomically add the user to the aggregate, or remove them if present.
    /// Creates the aggregate on first use and deletes it when the last user
    /// leaves.
    async fn toggle(
        &self,
        message_id: MessageId,
        kind: ReactionKind,
        user_id: UserId,
    ) -> RepoResult<ReactionToggle>;

    /// Delete a whole aggregate
    async fn delete(&self, id: ReactionId) -> RepoResult<()>;

    /// Remove all reactions from a message
    async fn delete_by_message(&self, message_id: MessageId) -> RepoResult<()>;
}

// ============================================================================
// Friendship Repository
// ============================================================================

#[async_trait]
pub trait FriendshipRepository: Send + Sync {
    /// Find friendship by ID
    async fn find_by_id(&self, id: FriendshipId) -> RepoResult<Option<Friendship>>;

    /// Find the friendship between two users, in either direction
    async fn find_between(&self, a: UserId, b: UserId) -> RepoResult<Option<Friendship>>;

    /// List all friendships involving a user
    async fn find_by_user(&self, user_id: UserId) -> RepoResult<Vec<Friendship>>;

    /// List accepted friendships involving a user
    async fn find_accepted(&self, user_id: UserId) -> RepoResult<Vec<Friendship>>;

    /// Create a new friendship
    async fn create(&self, friendship: Friendship) -> RepoResult<Friendship>;

    /// Change the status of a friendship
    async fn update_status(&self, id: FriendshipId, status: FriendshipStatus) -> RepoResult<()>;
}

// ============================================================================
// Notification Repository
// ============================================================================

#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Find notification by ID
    async fn find_by_id(&self, id: NotificationId) -> RepoResult<Option<Notification>>;

    /// List notifications addressed to a user, newest first
    async fn find_by_recipient(&self, user_id: UserId) -> RepoResult<Vec<Notification>>;

    /// Create a new notification
    async fn create(&self, notification: Notification) -> RepoResult<Notification>;
}
