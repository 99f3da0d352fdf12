//! HTTP endpoints beside the WebSocket upgrade

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chat_common::{AppError, ErrorResponse};
use chat_core::{ChatId, Event, EventType, MemberRole, UserId};
use chat_service::{ChatService, ServiceError};
use serde::Serialize;
use serde_json::json;

use crate::server::GatewayState;

/// Health check endpoint
///
/// GET /health
pub async fn health_check() -> &'static str {
    "OK"
}

#[derive(Debug, Serialize)]
pub struct OnlineUsersResponse {
    pub online_users: Vec<UserId>,
}

/// GET /online
pub async fn online_users(State(state): State<GatewayState>) -> Json<OnlineUsersResponse> {
    Json(OnlineUsersResponse {
        online_users: state.registry().list_online(),
    })
}

/// Add a durable chat member
///
/// PUT /chats/{chat_id}/members/{user_id}
pub async fn add_member(
    State(state): State<GatewayState>,
    Path((chat_id, user_id)): Path<(ChatId, UserId)>,
) -> Result<StatusCode, RestError> {
    ChatService::new(state.services())
        .add_member(chat_id, user_id, MemberRole::Member)
        .await?;

    tracing::info!(chat_id = %chat_id, user_id = %user_id, "Member added over HTTP");
    Ok(StatusCode::NO_CONTENT)
}

/// Remove a durable chat member, tell the room, then drop the user from the
/// live room
///
/// DELETE /chats/{chat_id}/members/{user_id}
pub async fn remove_member(
    State(state): State<GatewayState>,
    Path((chat_id, user_id)): Path<(ChatId, UserId)>,
) -> Result<StatusCode, RestError> {
    let chat = ChatService::new(state.services());
    chat.remove_member(chat_id, user_id).await?;

    let notice = chat
        .post_system_message(
            chat_id,
            UserId::SYSTEM,
            format!("User {user_id} was removed from the chat"),
        )
        .await?;
    let event = Event::new(
        EventType::SendMessage,
        json!({ "message": notice }),
        UserId::SYSTEM,
    );
    state.broadcaster().broadcast_to_room(chat_id, &event);

    state.rooms().leave(user_id, chat_id);

    tracing::info!(chat_id = %chat_id, user_id = %user_id, "Member removed over HTTP");
    Ok(StatusCode::NO_CONTENT)
}

/// Error returned by the HTTP endpoints
#[derive(Debug)]
pub struct RestError(AppError);

impl From<ServiceError> for RestError {
    fn from(err: ServiceError) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            tracing::error!(error = ?self.0, "Server error occurred");
        }

        (status, Json(ErrorResponse::from(&self.0))).into_response()
    }
}
