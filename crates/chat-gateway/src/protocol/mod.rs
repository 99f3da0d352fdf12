//! Wire protocol
//!
//! Close codes, outbound frames and the typed payloads of inbound events.

mod close_codes;
mod frames;
pub mod payloads;

pub use close_codes::CloseCode;
pub use frames::{online_users_list, user_offline, user_online, OutboundFrame};
