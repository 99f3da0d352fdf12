//! WebSocket handler
//!
//! Upgrades the connection, then runs one read task and one write task per
//! socket. The write task is the only place frames reach the socket.

use std::borrow::Cow;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{
        ws::{CloseFrame, Message, WebSocket},
        Query, State, WebSocketUpgrade,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chat_common::{AppError, ErrorResponse};
use chat_core::{Event, UserId};
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;

use crate::connection::Connection;
use crate::handlers::{BindHandler, EventDispatcher, HandlerError};
use crate::protocol::{CloseCode, OutboundFrame};
use crate::server::GatewayState;

/// How long the writer gets to flush a close frame once the reader is done
const CLOSE_GRACE: Duration = Duration::from_secs(1);

/// Upgrade query parameters
#[derive(Debug, Default, Deserialize)]
pub struct ConnectParams {
    pub token: Option<String>,
}

/// WebSocket gateway handler
pub async fn gateway_handler(
    State(state): State<GatewayState>,
    Query(params): Query<ConnectParams>,
    ws: WebSocketUpgrade,
) -> Response {
    let user_id = match authenticate(&state, params.token.as_deref()) {
        Ok(user_id) => user_id,
        Err(e) => {
            tracing::info!(error = %e, "WebSocket upgrade rejected");
            return (StatusCode::UNAUTHORIZED, Json(ErrorResponse::from(&e))).into_response();
        }
    };

    ws.on_upgrade(move |socket| handle_socket(state, socket, user_id))
}

/// Resolve the upgrade credential. `Ok(None)` means the identity will come
/// from the first event instead.
fn authenticate(state: &GatewayState, token: Option<&str>) -> Result<Option<UserId>, AppError> {
    let require = state.config().realtime.require_auth;

    let (Some(token), Some(authenticator)) = (token, state.authenticator()) else {
        if require {
            return Err(AppError::MissingAuth);
        }
        if token.is_some() {
            tracing::debug!("Token supplied but authentication is not configured, ignoring");
        }
        return Ok(None);
    };

    let token = token.strip_prefix("Bearer ").unwrap_or(token);
    Ok(Some(authenticator.authenticate(token)?))
}

/// Handle an upgraded WebSocket connection
async fn handle_socket(state: GatewayState, socket: WebSocket, user_id: Option<UserId>) {
    let (tx, rx) = mpsc::channel::<OutboundFrame>(state.config().realtime.outbound_queue);
    let connection = Connection::new(tx);

    tracing::info!(connection_id = %connection.id(), "WebSocket connection established");

    let (ws_sink, ws_stream) = socket.split();

    let mut send_task = tokio::spawn(write_loop(Arc::clone(&connection), rx, ws_sink));

    if let Some(user_id) = user_id {
        if let Err(e) = BindHandler::bind(&state, &connection, user_id).await {
            tracing::warn!(connection_id = %connection.id(), error = %e, "Failed to bind connection");
        }
    }

    let mut recv_task = tokio::spawn(read_loop(
        state.clone(),
        Arc::clone(&connection),
        ws_stream,
    ));

    // Wait for either side to finish
    tokio::select! {
        result = &mut recv_task => {
            if let Ok(Some(code)) = result {
                connection.close(code);
                if tokio::time::timeout(CLOSE_GRACE, &mut send_task).await.is_err() {
                    tracing::debug!(connection_id = %connection.id(), "Writer did not finish in time");
                }
            }
            send_task.abort();
        }
        _ = &mut send_task => {
            tracing::debug!(
                connection_id = %connection.id(),
                close_code = ?connection.close_code(),
                "Send task ended"
            );
            recv_task.abort();
        }
    }

    cleanup_connection(&state, &connection).await;
}

/// Read inbound frames until the peer goes away or the idle timeout fires
async fn read_loop(
    state: GatewayState,
    connection: Arc<Connection>,
    mut ws_stream: SplitStream<WebSocket>,
) -> Option<CloseCode> {
    let idle_timeout = state.config().realtime.idle_timeout();

    loop {
        let next = match idle_timeout {
            Some(limit) => match tokio::time::timeout(limit, ws_stream.next()).await {
                Ok(next) => next,
                Err(_) => {
                    tracing::info!(connection_id = %connection.id(), "Connection idle, closing");
                    return Some(CloseCode::IdleTimeout);
                }
            },
            None => ws_stream.next().await,
        };

        match next {
            Some(Ok(Message::Text(text))) => handle_text_message(&state, &connection, &text).await,
            Some(Ok(Message::Binary(_))) => {
                tracing::debug!(connection_id = %connection.id(), "Binary frame ignored");
            }
            Some(Ok(Message::Ping(_) | Message::Pong(_))) => {
                // Pong is handled automatically by axum
                tracing::trace!(connection_id = %connection.id(), "Ping/pong");
            }
            Some(Ok(Message::Close(_))) | None => {
                tracing::info!(connection_id = %connection.id(), "Client closed connection");
                return None;
            }
            Some(Err(e)) => {
                tracing::warn!(connection_id = %connection.id(), error = %e, "WebSocket error");
                return None;
            }
        }
    }
}

/// Drain the outbound queue into the socket until a close is requested
async fn write_loop(
    connection: Arc<Connection>,
    mut rx: mpsc::Receiver<OutboundFrame>,
    mut ws_sink: SplitSink<WebSocket, Message>,
) {
    loop {
        tokio::select! {
            biased;
            code = connection.closed() => {
                let frame = CloseFrame {
                    code: code.as_u16(),
                    reason: Cow::Borrowed(code.description()),
                };
                if ws_sink.send(Message::Close(Some(frame))).await.is_err() {
                    tracing::debug!(connection_id = %connection.id(), "Close frame not delivered");
                }
                tracing::debug!(connection_id = %connection.id(), close_code = %code, "Connection closed by server");
                break;
            }
            frame = rx.recv() => {
                let Some(frame) = frame else { break };
                if ws_sink.send(Message::Text(frame.as_str().to_owned())).await.is_err() {
                    tracing::warn!(connection_id = %connection.id(), "Failed to send message to WebSocket");
                    break;
                }
            }
        }
    }

    let _ = ws_sink.close().await;
}

/// Handle a text frame from the client. Nothing here closes the socket.
async fn handle_text_message(state: &GatewayState, connection: &Arc<Connection>, text: &str) {
    let event = match Event::from_json(text) {
        Ok(event) => event,
        Err(e) => {
            tracing::debug!(connection_id = %connection.id(), error = %e, "Malformed frame dropped");
            return;
        }
    };

    let event_type = event.event_type.clone();
    match EventDispatcher::dispatch(state, connection, event).await {
        Ok(()) => {}
        Err(HandlerError::UnknownEvent(e)) => {
            tracing::debug!(connection_id = %connection.id(), error = %e, "Event ignored");
        }
        Err(e) if e.is_protocol_error() => {
            tracing::warn!(
                connection_id = %connection.id(),
                user_id = ?connection.user_id(),
                event = %event_type,
                error = %e,
                "Protocol error, event dropped"
            );
        }
        Err(e) => {
            tracing::warn!(
                connection_id = %connection.id(),
                user_id = ?connection.user_id(),
                event = %event_type,
                error = %e,
                "Event handling failed"
            );
        }
    }
}

/// Clean up a connection on disconnect
async fn cleanup_connection(state: &GatewayState, connection: &Arc<Connection>) {
    tracing::info!(
        connection_id = %connection.id(),
        user_id = ?connection.user_id(),
        dropped = connection.dropped_frames(),
        "Cleaning up connection"
    );

    if state.presence().on_disconnect(connection).await {
        if let Some(user_id) = connection.user_id() {
            tracing::info!(user_id = %user_id, "User disconnected");
        }
    }
}
