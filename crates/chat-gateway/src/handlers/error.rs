//! Handler error types

use chat_core::{EventType, UnknownEventType, UserId};
use chat_service::ServiceError;
use thiserror::Error;

/// Why an inbound event was not acted on. None of these close the socket.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// Event data is missing a field or has the wrong shape
    #[error("Invalid payload: {0}")]
    InvalidPayload(#[from] serde_json::Error),

    /// Event arrived before the connection had an identity
    #[error("Connection is not bound to a user")]
    NotBound,

    /// Event claims a different user than the one bound
    #[error("Identity mismatch: connection is bound to {bound}, event claims {claimed}")]
    IdentityMismatch { bound: UserId, claimed: UserId },

    /// Client sent an event type only the server produces
    #[error("Event type {0} is server-only")]
    ServerOnly(EventType),

    /// Event type not recognized
    #[error(transparent)]
    UnknownEvent(#[from] UnknownEventType),

    /// Collaborator (storage/service) failure
    #[error("Service error: {0}")]
    Service(#[from] ServiceError),
}

impl HandlerError {
    /// Client broke the protocol; the event is dropped
    pub fn is_protocol_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidPayload(_) | Self::NotBound | Self::IdentityMismatch { .. } | Self::ServerOnly(_)
        )
    }

    /// A collaborator refused or failed; nothing was broadcast
    pub fn is_service_error(&self) -> bool {
        matches!(self, Self::Service(_))
    }
}

/// Handler result type
pub type HandlerResult<T> = Result<T, HandlerError>;
