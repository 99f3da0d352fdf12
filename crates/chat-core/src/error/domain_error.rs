//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::{ChatId, MessageId, ReactionId, UserId};

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Chat not found: {0}")]
    ChatNotFound(ChatId),

    #[error("Message not found: {0}")]
    MessageNotFound(MessageId),

    #[error("Reaction not found: {0}")]
    ReactionNotFound(ReactionId),

    #[error("User {user_id} is not a member of chat {chat_id}")]
    MemberNotFound { chat_id: ChatId, user_id: UserId },

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Message content is empty")]
    EmptyContent,

    #[error("Content too long: max {max} characters")]
    ContentTooLong { max: usize },

    // =========================================================================
    // Authorization Errors
    // =========================================================================
    #[error("Not message author")]
    NotMessageAuthor,

    #[error("Not a member of chat {0}")]
    NotChatMember(ChatId),

    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Already a member of this chat")]
    AlreadyMember,

    #[error("Friendship already exists")]
    FriendshipExists,

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::ChatNotFound(_) => "UNKNOWN_CHAT",
            Self::MessageNotFound(_) => "UNKNOWN_MESSAGE",
            Self::ReactionNotFound(_) => "UNKNOWN_REACTION",
            Self::MemberNotFound { .. } => "UNKNOWN_MEMBER",

            // Validation
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::EmptyContent => "EMPTY_CONTENT",
            Self::ContentTooLong { .. } => "CONTENT_TOO_LONG",

            // Authorization
            Self::NotMessageAuthor => "NOT_MESSAGE_AUTHOR",
            Self::NotChatMember(_) => "NOT_CHAT_MEMBER",
            Self::InvalidCredentials(_) => "INVALID_CREDENTIALS",

            // Conflict
            Self::AlreadyMember => "ALREADY_MEMBER",
            Self::FriendshipExists => "FRIENDSHIP_EXISTS",

            // Infrastructure
            Self::StorageError(_) => "STORAGE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::ChatNotFound(_)
                | Self::MessageNotFound(_)
                | Self::ReactionNotFound(_)
                | Self::MemberNotFound { .. }
        )
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_) | Self::EmptyContent | Self::ContentTooLong { .. }
        )
    }

    /// Check if this is an authorization error
    pub fn is_authorization(&self) -> bool {
        matches!(
            self,
            Self::NotMessageAuthor | Self::NotChatMember(_) | Self::InvalidCredentials(_)
        )
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::AlreadyMember | Self::FriendshipExists)
    }
}
