//! In-memory implementation of ReactionRepository
//!
//! Aggregates are keyed by `(message, kind)`. The toggle runs under a single
//! write lock so concurrent toggles of the same pair never lose an update.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::{debug, instrument};

use chat_core::entities::{Reaction, ReactionKind, ReactionToggle};
use chat_core::error::DomainError;
use chat_core::traits::{ReactionRepository, RepoResult};
use chat_core::value_objects::{MessageId, ReactionId, UserId};

use super::sequence::IdSequence;

#[derive(Debug, Default)]
struct ReactionTables {
    by_id: HashMap<ReactionId, Reaction>,
    by_key: HashMap<(MessageId, ReactionKind), ReactionId>,
}

impl ReactionTables {
    fn remove(&mut self, id: ReactionId) -> Option<Reaction> {
        let reaction = self.by_id.remove(&id)?;
        self.by_key.remove(&(reaction.message_id, reaction.kind));
        Some(reaction)
    }
}

/// In-memory implementation of ReactionRepository
#[derive(Debug, Clone, Default)]
pub struct MemReactionRepository {
    tables: Arc<RwLock<ReactionTables>>,
    ids: Arc<IdSequence>,
}

impl MemReactionRepository {
    /// Create a new empty MemReactionRepository
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReactionRepository for MemReactionRepository {
    async fn find_by_id(&self, id: ReactionId) -> RepoResult<Option<Reaction>> {
        Ok(self.tables.read().by_id.get(&id).cloned())
    }

    async fn find_by_message(&self, message_id: MessageId) -> RepoResult<Vec<Reaction>> {
        let mut reactions: Vec<Reaction> = self
            .tables
            .read()
            .by_id
            .values()
            .filter(|r| r.message_id == message_id)
            .cloned()
            .collect();
        reactions.sort_by_key(|r| r.id);
        Ok(reactions)
    }

    async fn find_by_kind(
        &self,
        message_id: MessageId,
        kind: ReactionKind,
    ) -> RepoResult<Option<Reaction>> {
        let tables = self.tables.read();
        Ok(tables
            .by_key
            .get(&(message_id, kind))
            .and_then(|id| tables.by_id.get(id))
            .cloned())
    }

    #[instrument(skip(self))]
    async fn toggle(
        &self,
        message_id: MessageId,
        kind: ReactionKind,
        user_id: UserId,
    ) -> RepoResult<ReactionToggle> {
        let mut tables = self.tables.write();

        let Some(id) = tables.by_key.get(&(message_id, kind)).copied() else {
            let id = ReactionId::new(self.ids.next());
            tables
                .by_id
                .insert(id, Reaction::new(id, message_id, kind, user_id));
            tables.by_key.insert((message_id, kind), id);
            return Ok(ReactionToggle::Added);
        };

        let reaction = tables
            .by_id
            .get_mut(&id)
            .ok_or(DomainError::ReactionNotFound(id))?;
        let outcome = reaction.toggle_user(user_id);

        if reaction.is_empty() {
            tables.remove(id);
            debug!(reaction_id = %id, "Reaction emptied and removed");
        }
        Ok(outcome)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: ReactionId) -> RepoResult<()> {
        self.tables
            .write()
            .remove(id)
            .map(|_| ())
            .ok_or(DomainError::ReactionNotFound(id))
    }

    async fn delete_by_message(&self, message_id: MessageId) -> RepoResult<()> {
        let mut tables = self.tables.write();
        let ids: Vec<ReactionId> = tables
            .by_id
            .values()
            .filter(|r| r.message_id == message_id)
            .map(|r| r.id)
            .collect();
        for id in ids {
            tables.remove(id);
        }
        Ok(())
    }
}
