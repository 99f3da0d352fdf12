//! Gateway server setup
//!
//! Routes, application assembly and the listener loop.

mod handler;
mod rest;
mod state;

pub use handler::{gateway_handler, ConnectParams};
pub use rest::{
    add_member, health_check, online_users, remove_member, OnlineUsersResponse, RestError,
};
pub use state::GatewayState;

use std::net::SocketAddr;

use axum::{
    routing::{get, put},
    Router,
};
use chat_common::{AppConfig, AppError};
use chat_db::InMemoryStore;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// Create the gateway router
pub fn create_router() -> Router<GatewayState> {
    Router::new()
        .route("/ws", get(gateway_handler))
        .route("/health", get(health_check))
        .route("/online", get(online_users))
        .route(
            "/chats/:chat_id/members/:user_id",
            put(add_member).delete(remove_member),
        )
}

/// Build the complete application
pub fn create_app(state: GatewayState) -> Router {
    create_router()
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the gateway server on an already bound listener
pub async fn serve(listener: TcpListener, app: Router) -> Result<(), AppError> {
    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::Config(format!("Server error: {e}")))
}

/// Run the gateway server
pub async fn run_server(app: Router, addr: SocketAddr) -> Result<(), AppError> {
    tracing::info!("Starting Gateway server on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    tracing::info!("Gateway listening on ws://{}/ws", addr);

    serve(listener, app).await
}

/// Run the complete gateway server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr: SocketAddr = config
        .gateway
        .address()
        .parse()
        .map_err(|e| AppError::Config(format!("Invalid gateway address: {e}")))?;

    let store = InMemoryStore::new();
    let state = GatewayState::new(config, &store)?;
    let app = create_app(state);

    run_server(app, addr).await
}
