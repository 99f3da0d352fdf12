//! In-memory implementation of ChatRepository

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::instrument;

use chat_core::entities::{Chat, ChatMember};
use chat_core::error::DomainError;
use chat_core::traits::{ChatRepository, RepoResult};
use chat_core::value_objects::{ChatId, UserId};

use super::sequence::IdSequence;

#[derive(Debug, Default)]
struct ChatTables {
    chats: HashMap<ChatId, Chat>,
    /// chat -> user -> membership, ordered so member listings are stable
    members: HashMap<ChatId, BTreeMap<UserId, ChatMember>>,
}

/// In-memory implementation of ChatRepository
#[derive(Debug, Clone, Default)]
pub struct MemChatRepository {
    tables: Arc<RwLock<ChatTables>>,
    ids: Arc<IdSequence>,
}

impl MemChatRepository {
    /// Create a new empty MemChatRepository
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ChatRepository for MemChatRepository {
    async fn find_by_id(&self, id: ChatId) -> RepoResult<Option<Chat>> {
        Ok(self.tables.read().chats.get(&id).cloned())
    }

    #[instrument(skip(self))]
    async fn find_by_user(&self, user_id: UserId) -> RepoResult<Vec<Chat>> {
        let tables = self.tables.read();
        let mut chats: Vec<Chat> = tables
            .members
            .iter()
            .filter(|(_, members)| members.contains_key(&user_id))
            .filter_map(|(chat_id, _)| tables.chats.get(chat_id).cloned())
            .collect();
        chats.sort_by_key(|c| c.id);
        Ok(chats)
    }

    #[instrument(skip(self), fields(chat_name = %chat.name))]
    async fn create(&self, mut chat: Chat) -> RepoResult<Chat> {
        if chat.id.is_zero() {
            chat.id = ChatId::new(self.ids.next());
        } else {
            self.ids.observe(chat.id.into_inner());
        }

        let mut tables = self.tables.write();
        tables.chats.insert(chat.id, chat.clone());
        tables.members.entry(chat.id).or_default();
        Ok(chat)
    }

    async fn find_members(&self, chat_id: ChatId) -> RepoResult<Vec<ChatMember>> {
        Ok(self
            .tables
            .read()
            .members
            .get(&chat_id)
            .map(|m| m.values().cloned().collect())
            .unwrap_or_default())
    }

    #[instrument(skip(self))]
    async fn add_member(&self, member: ChatMember) -> RepoResult<()> {
        let mut tables = self.tables.write();
        if !tables.chats.contains_key(&member.chat_id) {
            return Err(DomainError::ChatNotFound(member.chat_id));
        }

        let members = tables.members.entry(member.chat_id).or_default();
        if members.contains_key(&member.user_id) {
            return Err(DomainError::AlreadyMember);
        }
        members.insert(member.user_id, member);
        Ok(())
    }

    #[instrument(skip(self))]
    async fn remove_member(&self, chat_id: ChatId, user_id: UserId) -> RepoResult<bool> {
        let mut tables = self.tables.write();
        Ok(tables
            .members
            .get_mut(&chat_id)
            .is_some_and(|members| members.remove(&user_id).is_some()))
    }

    async fn is_member(&self, chat_id: ChatId, user_id: UserId) -> RepoResult<bool> {
        Ok(self
            .tables
            .read()
            .members
            .get(&chat_id)
            .is_some_and(|members| members.contains_key(&user_id)))
    }
}
