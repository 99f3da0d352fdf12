//! Repository implementations
//!
//! In-memory implementations of the repository traits defined in chat-core.
//! Every repository is a cheap `Clone` handle over shared tables.

mod chat;
mod friendship;
mod message;
mod notification;
mod reaction;
mod sequence;

pub use chat::MemChatRepository;
pub use friendship::MemFriendshipRepository;
pub use message::MemMessageRepository;
pub use notification::MemNotificationRepository;
pub use reaction::MemReactionRepository;
pub use sequence::IdSequence;
