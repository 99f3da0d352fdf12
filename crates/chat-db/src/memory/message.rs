//! In-memory implementation of MessageRepository

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::instrument;

use chat_core::entities::Message;
use chat_core::error::DomainError;
use chat_core::traits::{MessageRepository, RepoResult};
use chat_core::value_objects::{ChatId, MessageId};

use super::sequence::IdSequence;

/// In-memory implementation of MessageRepository
#[derive(Debug, Clone, Default)]
pub struct MemMessageRepository {
    messages: Arc<RwLock<HashMap<MessageId, Message>>>,
    ids: Arc<IdSequence>,
}

impl MemMessageRepository {
    /// Create a new empty MemMessageRepository
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MessageRepository for MemMessageRepository {
    async fn find_by_id(&self, id: MessageId) -> RepoResult<Option<Message>> {
        Ok(self.messages.read().get(&id).cloned())
    }

    async fn find_by_chat(&self, chat_id: ChatId, limit: usize) -> RepoResult<Vec<Message>> {
        let mut messages: Vec<Message> = self
            .messages
            .read()
            .values()
            .filter(|m| m.chat_id == chat_id)
            .cloned()
            .collect();
        messages.sort_by_key(|m| m.id);

        let skip = messages.len().saturating_sub(limit);
        Ok(messages.split_off(skip))
    }

    #[instrument(skip(self, message), fields(chat_id = %message.chat_id))]
    async fn create(&self, mut message: Message) -> RepoResult<Message> {
        if message.id.is_zero() {
            message.id = MessageId::new(self.ids.next());
        } else {
            self.ids.observe(message.id.into_inner());
        }

        self.messages.write().insert(message.id, message.clone());
        Ok(message)
    }

    #[instrument(skip(self, message), fields(message_id = %message.id))]
    async fn update(&self, message: &Message) -> RepoResult<()> {
        match self.messages.write().get_mut(&message.id) {
            Some(stored) => {
                *stored = message.clone();
                Ok(())
            }
            None => Err(DomainError::MessageNotFound(message.id)),
        }
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: MessageId) -> RepoResult<()> {
        self.messages
            .write()
            .remove(&id)
            .map(|_| ())
            .ok_or(DomainError::MessageNotFound(id))
    }
}
