//! Event delivery
//!
//! Routes events from the dispatcher and from services to connected users.

mod broadcaster;

pub use broadcaster::Broadcaster;
