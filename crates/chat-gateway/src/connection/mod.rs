//! Connection management
//!
//! Live WebSocket connections and the user-to-connection registry.

mod connection;
mod registry;

pub use connection::{Connection, DeliveryError};
pub use registry::ConnectionRegistry;
