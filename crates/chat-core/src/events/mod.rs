//! Realtime events

mod event;

pub use event::{Event, EventType, UnknownEventType};
