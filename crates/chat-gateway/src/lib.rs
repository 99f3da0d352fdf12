//! # chat-gateway
//!
//! Real-time core for the chat service: WebSocket connections, live rooms,
//! presence and event fan-out.
//!
//! ## Wire format
//!
//! Every frame in both directions is a JSON text message:
//!
//! ```json
//! {"type": "send_message", "data": {"chat_id": 1, "content": "hi"}, "created_by": 42}
//! ```
//!
//! A connection binds to the first non-zero `created_by` it sees (or to the
//! user of a `?token=` credential on upgrade) and keeps that identity.

pub mod broadcast;
pub mod connection;
pub mod handlers;
pub mod presence;
pub mod protocol;
pub mod rooms;
pub mod server;

pub use broadcast::Broadcaster;
pub use connection::{Connection, ConnectionRegistry, DeliveryError};
pub use handlers::{EventDispatcher, HandlerError, HandlerResult};
pub use presence::PresenceNotifier;
pub use protocol::{CloseCode, OutboundFrame};
pub use rooms::RoomIndex;
pub use server::{create_app, create_router, run, run_server, serve, GatewayState};
