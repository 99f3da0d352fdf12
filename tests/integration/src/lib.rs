//! Integration test utilities for the realtime gateway
//!
//! Boots the real axum app on an ephemeral port over in-memory storage and
//! drives it with WebSocket and HTTP clients.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
