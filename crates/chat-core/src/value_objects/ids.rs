//! Typed identifiers
//!
//! Every entity is addressed by a stable 64-bit integer. The newtypes keep a
//! `ChatId` from being passed where a `UserId` is expected while still
//! serializing as a plain JSON integer on the wire.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Error when parsing an identifier from a string
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum IdParseError {
    #[error("invalid identifier format")]
    InvalidFormat,
}

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Create an identifier from a raw i64 value
            #[inline]
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            /// Get the inner i64 value
            #[inline]
            pub const fn into_inner(self) -> i64 {
                self.0
            }

            /// Check if the identifier is zero (unset)
            #[inline]
            pub const fn is_zero(&self) -> bool {
                self.0 == 0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl std::str::FromStr for $name {
            type Err = IdParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.parse::<i64>()
                    .map(Self)
                    .map_err(|_| IdParseError::InvalidFormat)
            }
        }
    };
}

define_id!(
    /// User identity. `UserId(0)` is the "no identity" value carried by
    /// unauthenticated frames.
    UserId
);
define_id!(
    /// Chat (room) identity
    ChatId
);
define_id!(
    /// Message identity
    MessageId
);
define_id!(
    /// Reaction aggregate identity
    ReactionId
);
define_id!(
    /// Notification identity
    NotificationId
);
define_id!(
    /// Friendship record identity
    FriendshipId
);

impl UserId {
    /// The "nobody" identity used for server-originated events
    pub const SYSTEM: Self = Self(0);
}
