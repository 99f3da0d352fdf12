//! Identity binding
//!
//! A connection starts unbound and takes the identity of the first event that
//! names a user (or of a verified token at upgrade). After that the identity
//! never changes.

use std::sync::Arc;

use chat_core::UserId;

use super::{HandlerError, HandlerResult};
use crate::connection::Connection;
use crate::server::GatewayState;

/// Resolves and binds connection identity
pub struct BindHandler;

impl BindHandler {
    /// Resolve the acting user for an event claiming `claimed`, binding the
    /// connection first if needed.
    pub async fn resolve(
        state: &GatewayState,
        connection: &Arc<Connection>,
        claimed: UserId,
    ) -> HandlerResult<UserId> {
        if let Some(bound) = connection.user_id() {
            if !claimed.is_zero() && claimed != bound {
                return Err(HandlerError::IdentityMismatch { bound, claimed });
            }
            return Ok(bound);
        }

        // With mandatory auth, identity only ever comes from the token
        if claimed.is_zero() || state.config().realtime.require_auth {
            return Err(HandlerError::NotBound);
        }

        Self::bind(state, connection, claimed).await?;
        Ok(claimed)
    }

    /// Bind the connection to `user_id`, register it and announce presence
    pub async fn bind(
        state: &GatewayState,
        connection: &Arc<Connection>,
        user_id: UserId,
    ) -> HandlerResult<()> {
        if !connection.bind(user_id) {
            return Err(HandlerError::IdentityMismatch {
                bound: connection.user_id().unwrap_or_default(),
                claimed: user_id,
            });
        }

        state.registry().add(user_id, Arc::clone(connection));
        tracing::info!(
            user_id = %user_id,
            connection_id = %connection.id(),
            "User connected"
        );

        state.presence().on_connect(user_id).await;
        Ok(())
    }
}
