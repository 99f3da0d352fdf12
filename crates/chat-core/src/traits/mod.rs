//! Ports implemented by the storage and gateway layers

mod auth;
mod realtime;
mod repositories;

pub use auth::Authenticator;
pub use realtime::RealtimeSink;
pub use repositories::{
    ChatRepository, FriendshipRepository, MessageRepository, NotificationRepository,
    ReactionRepository, RepoResult,
};
