//! Data transfer objects for service inputs

pub mod requests;

pub use requests::{EditMessageRequest, NewMessageRequest};
