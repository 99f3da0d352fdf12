//! Domain entities - core business objects

mod chat;
mod friendship;
mod message;
mod notification;
mod reaction;

pub use chat::{Chat, ChatMember, ChatType, MemberRole};
pub use friendship::{Friendship, FriendshipStatus};
pub use message::{Message, MessageKind};
pub use notification::{Notification, NotificationStatus, NotificationType};
pub use reaction::{Reaction, ReactionKind, ReactionToggle};
