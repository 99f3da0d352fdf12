//! Service context - dependency container for services
//!
//! Holds all repositories and the realtime sink needed by services.

use std::sync::Arc;

use chat_core::traits::{
    ChatRepository, FriendshipRepository, MessageRepository, NotificationRepository,
    ReactionRepository, RealtimeSink,
};
use chat_db::InMemoryStore;

use super::error::{ServiceError, ServiceResult};

/// Service context containing all dependencies
///
/// This is the main dependency container that gets passed to all services.
/// It provides access to:
/// - Storage repositories
/// - The realtime sink used to push events to connected users (optional;
///   without one, pushes are skipped)
#[derive(Clone)]
pub struct ServiceContext {
    // Repositories
    chat_repo: Arc<dyn ChatRepository>,
    message_repo: Arc<dyn MessageRepository>,
    reaction_repo: Arc<dyn ReactionRepository>,
    friendship_repo: Arc<dyn FriendshipRepository>,
    notification_repo: Arc<dyn NotificationRepository>,

    // Delivery
    realtime: Option<Arc<dyn RealtimeSink>>,
}

impl ServiceContext {
    /// Create a new service context with all dependencies
    pub fn new(
        chat_repo: Arc<dyn ChatRepository>,
        message_repo: Arc<dyn MessageRepository>,
        reaction_repo: Arc<dyn ReactionRepository>,
        friendship_repo: Arc<dyn FriendshipRepository>,
        notification_repo: Arc<dyn NotificationRepository>,
        realtime: Option<Arc<dyn RealtimeSink>>,
    ) -> Self {
        Self {
            chat_repo,
            message_repo,
            reaction_repo,
            friendship_repo,
            notification_repo,
            realtime,
        }
    }

    // === Repositories ===

    /// Get the chat repository
    pub fn chat_repo(&self) -> &dyn ChatRepository {
        self.chat_repo.as_ref()
    }

    /// Get the message repository
    pub fn message_repo(&self) -> &dyn MessageRepository {
        self.message_repo.as_ref()
    }

    /// Get the reaction repository
    pub fn reaction_repo(&self) -> &dyn ReactionRepository {
        self.reaction_repo.as_ref()
    }

    /// Get the friendship repository
    pub fn friendship_repo(&self) -> &dyn FriendshipRepository {
        self.friendship_repo.as_ref()
    }

    /// Get the notification repository
    pub fn notification_repo(&self) -> &dyn NotificationRepository {
        self.notification_repo.as_ref()
    }

    // === Delivery ===

    /// Get the realtime sink, if one is attached
    pub fn realtime(&self) -> Option<&dyn RealtimeSink> {
        self.realtime.as_deref()
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("repositories", &"...")
            .field("realtime", &self.realtime.is_some())
            .finish()
    }
}

/// Builder for creating ServiceContext with custom configuration
#[derive(Default)]
pub struct ServiceContextBuilder {
    chat_repo: Option<Arc<dyn ChatRepository>>,
    message_repo: Option<Arc<dyn MessageRepository>>,
    reaction_repo: Option<Arc<dyn ReactionRepository>>,
    friendship_repo: Option<Arc<dyn FriendshipRepository>>,
    notification_repo: Option<Arc<dyn NotificationRepository>>,
    realtime: Option<Arc<dyn RealtimeSink>>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use every repository of an in-memory store
    pub fn in_memory(self, store: &InMemoryStore) -> Self {
        self.chat_repo(store.chats.clone())
            .message_repo(store.messages.clone())
            .reaction_repo(store.reactions.clone())
            .friendship_repo(store.friendships.clone())
            .notification_repo(store.notifications.clone())
    }

    pub fn chat_repo(mut self, repo: Arc<dyn ChatRepository>) -> Self {
        self.chat_repo = Some(repo);
        self
    }

    pub fn message_repo(mut self, repo: Arc<dyn MessageRepository>) -> Self {
        self.message_repo = Some(repo);
        self
    }

    pub fn reaction_repo(mut self, repo: Arc<dyn ReactionRepository>) -> Self {
        self.reaction_repo = Some(repo);
        self
    }

    pub fn friendship_repo(mut self, repo: Arc<dyn FriendshipRepository>) -> Self {
        self.friendship_repo = Some(repo);
        self
    }

    pub fn notification_repo(mut self, repo: Arc<dyn NotificationRepository>) -> Self {
        self.notification_repo = Some(repo);
        self
    }

    pub fn realtime(mut self, sink: Arc<dyn RealtimeSink>) -> Self {
        self.realtime = Some(sink);
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required repository is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        Ok(ServiceContext::new(
            self.chat_repo
                .ok_or_else(|| ServiceError::validation("chat_repo is required"))?,
            self.message_repo
                .ok_or_else(|| ServiceError::validation("message_repo is required"))?,
            self.reaction_repo
                .ok_or_else(|| ServiceError::validation("reaction_repo is required"))?,
            self.friendship_repo
                .ok_or_else(|| ServiceError::validation("friendship_repo is required"))?,
            self.notification_repo
                .ok_or_else(|| ServiceError::validation("notification_repo is required"))?,
            self.realtime,
        ))
    }
}
