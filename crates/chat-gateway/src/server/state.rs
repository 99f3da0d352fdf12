//! Gateway state
//!
//! Application state for the gateway server.

use std::sync::Arc;

use chat_common::{AppConfig, AppError, JwtService};
use chat_core::Authenticator;
use chat_db::InMemoryStore;
use chat_service::{ServiceContext, ServiceContextBuilder};

use crate::broadcast::Broadcaster;
use crate::connection::ConnectionRegistry;
use crate::presence::PresenceNotifier;
use crate::rooms::RoomIndex;

/// Gateway application state
///
/// Holds all shared dependencies for the gateway server.
#[derive(Clone)]
pub struct GatewayState {
    /// Service context with repositories and the realtime sink
    services: Arc<ServiceContext>,
    /// Online users and their connections
    registry: Arc<ConnectionRegistry>,
    /// Event fan-out
    broadcaster: Arc<Broadcaster>,
    /// Connect/disconnect presence sequences
    presence: Arc<PresenceNotifier>,
    /// Token validation, present when a JWT secret is configured
    authenticator: Option<Arc<dyn Authenticator>>,
    /// Application configuration
    config: Arc<AppConfig>,
}

impl GatewayState {
    /// Wire the realtime core over a storage backend
    pub fn new(config: AppConfig, store: &InMemoryStore) -> Result<Self, AppError> {
        let rooms = Arc::new(RoomIndex::new());
        let registry = Arc::new(ConnectionRegistry::new(rooms));
        let broadcaster = Arc::new(Broadcaster::new(
            Arc::clone(&registry),
            config.realtime.overflow_policy,
        ));

        let services = Arc::new(
            ServiceContextBuilder::new()
                .in_memory(store)
                .realtime(broadcaster.clone())
                .build()?,
        );

        let presence = Arc::new(PresenceNotifier::new(
            Arc::clone(&services),
            Arc::clone(&registry),
            Arc::clone(&broadcaster),
        ));

        let authenticator = config
            .jwt
            .as_ref()
            .map(|jwt| Arc::new(JwtService::from_config(jwt)) as Arc<dyn Authenticator>);

        Ok(Self {
            services,
            registry,
            broadcaster,
            presence,
            authenticator,
            config: Arc::new(config),
        })
    }

    /// Get the service context
    pub fn services(&self) -> &ServiceContext {
        &self.services
    }

    /// Get the connection registry
    pub fn registry(&self) -> &ConnectionRegistry {
        &self.registry
    }

    /// Get the live room index
    pub fn rooms(&self) -> &RoomIndex {
        self.registry.rooms()
    }

    /// Get the broadcaster
    pub fn broadcaster(&self) -> &Broadcaster {
        &self.broadcaster
    }

    /// Get the presence notifier
    pub fn presence(&self) -> &PresenceNotifier {
        &self.presence
    }

    /// Get the token authenticator, if configured
    pub fn authenticator(&self) -> Option<&dyn Authenticator> {
        self.authenticator.as_deref()
    }

    /// Get the application configuration
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

impl std::fmt::Debug for GatewayState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayState")
            .field("registry", &self.registry)
            .field("authenticator", &self.authenticator.is_some())
            .field("config", &"AppConfig")
            .finish()
    }
}
