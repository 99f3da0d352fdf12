//! Value objects - immutable types defined by their value

mod ids;

pub use ids::{ChatId, FriendshipId, IdParseError, MessageId, NotificationId, ReactionId, UserId};
