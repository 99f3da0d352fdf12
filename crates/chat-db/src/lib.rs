//! # chat-db
//!
//! Storage layer implementing the chat-core repository traits in memory.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use chat_db::InMemoryStore;
//! use chat_core::UserId;
//!
//! async fn example() -> Result<(), chat_core::DomainError> {
//!     let store = InMemoryStore::new();
//!     let chat_id = store.seed_chat("general", &[UserId::new(1), UserId::new(2)]).await?;
//!     // Hand `store` to the service context...
//!     Ok(())
//! }
//! ```

pub mod memory;
pub mod store;

// Re-export commonly used types
pub use memory::{
    MemChatRepository, MemFriendshipRepository, MemMessageRepository, MemNotificationRepository,
    MemReactionRepository,
};
pub use store::InMemoryStore;
