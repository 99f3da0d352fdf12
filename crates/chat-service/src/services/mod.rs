//! Business logic services
//!
//! Service layer implementations that handle validation, authorship rules
//! and orchestration of repository operations.

pub mod chat;
pub mod context;
pub mod error;
pub mod friendship;
pub mod notification;

// Re-export all services for convenience
pub use chat::ChatService;
pub use context::{ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use friendship::FriendshipService;
pub use notification::NotificationService;
