//! Individual WebSocket connection
//!
//! The handle other tasks use to reach one socket: a bounded outbound queue
//! drained by the connection's writer task, plus a close signal.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

use chat_core::UserId;
use thiserror::Error;
use tokio::sync::{mpsc, Notify};
use uuid::Uuid;

use crate::protocol::{CloseCode, OutboundFrame};

/// Why a frame could not be queued
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DeliveryError {
    #[error("outbound queue is full")]
    Full,

    #[error("connection is closed")]
    Closed,
}

/// A single WebSocket connection
pub struct Connection {
    /// Unique connection ID
    id: Uuid,

    /// Bound user identity, set at most once
    user_id: OnceLock<UserId>,

    /// Queue drained by the writer task
    sender: mpsc::Sender<OutboundFrame>,

    /// First close reason requested for this connection
    close_code: OnceLock<CloseCode>,

    /// Wakes the writer task when a close is requested
    shutdown: Notify,

    /// Frames discarded because the queue was full
    dropped: AtomicU64,
}

impl Connection {
    /// Create a new, unbound connection
    pub fn new(sender: mpsc::Sender<OutboundFrame>) -> Arc<Self> {
        Arc::new(Self {
            id: Uuid::new_v4(),
            user_id: OnceLock::new(),
            sender,
            close_code: OnceLock::new(),
            shutdown: Notify::new(),
            dropped: AtomicU64::new(0),
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The bound user, if any
    pub fn user_id(&self) -> Option<UserId> {
        self.user_id.get().copied()
    }

    /// Bind the connection to a user. Succeeds when unbound or already bound
    /// to the same user; a connection never changes identity.
    pub fn bind(&self, user_id: UserId) -> bool {
        self.user_id.get_or_init(|| user_id) == &user_id
    }

    pub fn is_bound(&self) -> bool {
        self.user_id.get().is_some()
    }

    /// Queue a frame without waiting
    pub fn try_send(&self, frame: OutboundFrame) -> Result<(), DeliveryError> {
        self.sender.try_send(frame).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                DeliveryError::Full
            }
            mpsc::error::TrySendError::Closed(_) => DeliveryError::Closed,
        })
    }

    /// Ask the writer task to send a close frame and stop. Only the first
    /// reason is kept.
    pub fn close(&self, code: CloseCode) {
        if self.close_code.set(code).is_ok() {
            self.shutdown.notify_one();
        }
    }

    /// Resolves once `close` has been called
    pub async fn closed(&self) -> CloseCode {
        loop {
            if let Some(code) = self.close_code.get() {
                return *code;
            }
            self.shutdown.notified().await;
        }
    }

    pub fn close_code(&self) -> Option<CloseCode> {
        self.close_code.get().copied()
    }

    /// Frames discarded so far
    pub fn dropped_frames(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Check if the writer side has gone away
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed() || self.close_code.get().is_some()
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("id", &self.id)
            .field("user_id", &self.user_id.get())
            .field("dropped", &self.dropped.load(Ordering::Relaxed))
            .finish()
    }
}
