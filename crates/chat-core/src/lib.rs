//! # chat-core
//!
//! Domain layer containing entities, typed identifiers, the wire event and the
//! ports (repositories, realtime sink, authenticator) the outer layers implement.
//! This crate has zero dependencies on infrastructure (storage, web framework, etc.).

pub mod entities;
pub mod error;
pub mod events;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    Chat, ChatMember, ChatType, Friendship, FriendshipStatus, MemberRole, Message, MessageKind,
    Notification, NotificationStatus, NotificationType, Reaction, ReactionKind, ReactionToggle,
};
pub use error::DomainError;
pub use events::{Event, EventType, UnknownEventType};
pub use traits::{
    Authenticator, ChatRepository, FriendshipRepository, MessageRepository,
    NotificationRepository, ReactionRepository, RealtimeSink, RepoResult,
};
pub use value_objects::{
    ChatId, FriendshipId, IdParseError, MessageId, NotificationId, ReactionId, UserId,
};
