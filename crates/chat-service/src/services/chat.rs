//! Chat service
//!
//! Messages, reactions and durable membership: the collaborator the realtime
//! gateway persists through before it broadcasts anything.

use std::collections::BTreeSet;

use chat_core::entities::{
    Chat, ChatMember, MemberRole, Message, Reaction, ReactionKind, ReactionToggle,
};
use chat_core::{ChatId, DomainError, MessageId, ReactionId, UserId};
use tracing::{info, instrument, warn};
use validator::Validate;

use crate::dto::{EditMessageRequest, NewMessageRequest};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Chat service
pub struct ChatService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ChatService<'a> {
    /// Create a new ChatService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    // =========================================================================
    // Chats and membership
    // =========================================================================

    /// List chats the user is a durable member of
    pub async fn chats_for_user(&self, user_id: UserId) -> ServiceResult<Vec<Chat>> {
        Ok(self.ctx.chat_repo().find_by_user(user_id).await?)
    }

    /// List members of a chat
    pub async fn members(&self, chat_id: ChatId) -> ServiceResult<Vec<ChatMember>> {
        Ok(self.ctx.chat_repo().find_members(chat_id).await?)
    }

    /// Check durable membership
    pub async fn is_member(&self, chat_id: ChatId, user_id: UserId) -> ServiceResult<bool> {
        Ok(self.ctx.chat_repo().is_member(chat_id, user_id).await?)
    }

    /// Add a member to a chat
    #[instrument(skip(self))]
    pub async fn add_member(
        &self,
        chat_id: ChatId,
        user_id: UserId,
        role: MemberRole,
    ) -> ServiceResult<()> {
        self.ctx
            .chat_repo()
            .add_member(ChatMember::new(chat_id, user_id, role))
            .await?;
        info!(chat_id = %chat_id, user_id = %user_id, "Member added");
        Ok(())
    }

    /// Remove a member from a chat
    ///
    /// # Errors
    /// `DomainError::MemberNotFound` when the user was not a member
    #[instrument(skip(self))]
    pub async fn remove_member(&self, chat_id: ChatId, user_id: UserId) -> ServiceResult<()> {
        if !self.ctx.chat_repo().remove_member(chat_id, user_id).await? {
            return Err(DomainError::MemberNotFound { chat_id, user_id }.into());
        }
        info!(chat_id = %chat_id, user_id = %user_id, "Member removed");
        Ok(())
    }

    /// Everyone sharing at least one durable chat with the user, sorted
    pub async fn peers_of(&self, user_id: UserId) -> ServiceResult<BTreeSet<UserId>> {
        let mut peers = BTreeSet::new();
        for chat in self.chats_for_user(user_id).await? {
            for member in self.members(chat.id).await? {
                if member.user_id != user_id {
                    peers.insert(member.user_id);
                }
            }
        }
        Ok(peers)
    }

    // =========================================================================
    // Messages
    // =========================================================================

    /// Persist a new message
    #[instrument(skip(self, request), fields(chat_id = %request.chat_id))]
    pub async fn send_message(
        &self,
        author: UserId,
        request: NewMessageRequest,
    ) -> ServiceResult<Message> {
        request.validate()?;
        if !request.has_body() {
            return Err(DomainError::EmptyContent.into());
        }

        if let Some(reply_to) = request.reply_to_id {
            match self.ctx.message_repo().find_by_id(reply_to).await? {
                Some(original) if original.chat_id != request.chat_id => {
                    return Err(ServiceError::validation(
                        "Replied-to message must be in the same chat",
                    ));
                }
                Some(_) => {}
                None => warn!(reply_to = %reply_to, "Replied-to message not found"),
            }
        }

        let mut message = Message::new(
            MessageId::default(),
            request.chat_id,
            author,
            request.content,
            request.kind,
        );
        message.media_url = request.media_url;
        message.reply_to_id = request.reply_to_id;

        let message = self.ctx.message_repo().create(message).await?;
        info!(message_id = %message.id, author = %author, "Message created");
        Ok(message)
    }

    /// Post a server-authored system message
    #[instrument(skip(self, content))]
    pub async fn post_system_message(
        &self,
        chat_id: ChatId,
        author: UserId,
        content: String,
    ) -> ServiceResult<Message> {
        let message = self
            .ctx
            .message_repo()
            .create(Message::system(MessageId::default(), chat_id, author, content))
            .await?;
        info!(message_id = %message.id, "System message created");
        Ok(message)
    }

    /// Replace the content of a message. Only its author may edit it.
    #[instrument(skip(self, request))]
    pub async fn edit_message(
        &self,
        actor: UserId,
        message_id: MessageId,
        request: EditMessageRequest,
    ) -> ServiceResult<Message> {
        request.validate()?;

        let mut message = self.find_message(message_id).await?;
        if !message.is_authored_by(actor) {
            return Err(DomainError::NotMessageAuthor.into());
        }

        message.edit(request.content);
        self.ctx.message_repo().update(&message).await?;

        info!(message_id = %message_id, "Message edited");
        Ok(message)
    }

    /// Delete a message and its reactions. Only its author may delete it.
    #[instrument(skip(self))]
    pub async fn delete_message(&self, actor: UserId, message_id: MessageId) -> ServiceResult<Message> {
        let message = self.find_message(message_id).await?;
        if !message.is_authored_by(actor) {
            return Err(DomainError::NotMessageAuthor.into());
        }

        self.ctx.message_repo().delete(message_id).await?;
        self.ctx.reaction_repo().delete_by_message(message_id).await?;

        info!(message_id = %message_id, "Message deleted");
        Ok(message)
    }

    async fn find_message(&self, message_id: MessageId) -> ServiceResult<Message> {
        self.ctx
            .message_repo()
            .find_by_id(message_id)
            .await?
            .ok_or_else(|| DomainError::MessageNotFound(message_id).into())
    }

    // =========================================================================
    // Reactions
    // =========================================================================

    /// Add the user to the reaction of `kind`, or take them off it if present
    #[instrument(skip(self))]
    pub async fn toggle_reaction(
        &self,
        actor: UserId,
        message_id: MessageId,
        kind: ReactionKind,
    ) -> ServiceResult<ReactionToggle> {
        self.find_message(message_id).await?;

        let outcome = self
            .ctx
            .reaction_repo()
            .toggle(message_id, kind, actor)
            .await?;

        info!(message_id = %message_id, ?kind, ?outcome, "Reaction toggled");
        Ok(outcome)
    }

    /// Current aggregate of one kind, if anyone still reacts with it
    pub async fn reaction_of_kind(
        &self,
        message_id: MessageId,
        kind: ReactionKind,
    ) -> ServiceResult<Option<Reaction>> {
        Ok(self.ctx.reaction_repo().find_by_kind(message_id, kind).await?)
    }

    /// All aggregates on a message
    pub async fn reactions_for(&self, message_id: MessageId) -> ServiceResult<Vec<Reaction>> {
        Ok(self.ctx.reaction_repo().find_by_message(message_id).await?)
    }

    /// Delete a whole reaction aggregate
    #[instrument(skip(self))]
    pub async fn remove_reaction(&self, reaction_id: ReactionId) -> ServiceResult<()> {
        self.ctx.reaction_repo().delete(reaction_id).await?;
        info!(reaction_id = %reaction_id, "Reaction removed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::ServiceContextBuilder;
    use chat_db::InMemoryStore;

    fn context(store: &InMemoryStore) -> ServiceContext {
        ServiceContextBuilder::new().in_memory(store).build().unwrap()
    }

    const ALICE: UserId = UserId::new(1);
    const BOB: UserId = UserId::new(2);
    const CAROL: UserId = UserId::new(3);

    #[tokio::test]
    async fn test_send_message_persists() {
        let store = InMemoryStore::new();
        let ctx = context(&store);
        let service = ChatService::new(&ctx);

        let msg = service
            .send_message(ALICE, NewMessageRequest::text(ChatId::new(9), "hi"))
            .await
            .unwrap();
        assert!(!msg.id.is_zero());
        assert_eq!(msg.created_by, ALICE);
        assert_eq!(msg.chat_id, ChatId::new(9));
    }

    #[tokio::test]
    async fn test_send_message_rejects_empty_and_long() {
        let store = InMemoryStore::new();
        let ctx = context(&store);
        let service = ChatService::new(&ctx);

        let empty = service
            .send_message(ALICE, NewMessageRequest::text(ChatId::new(1), "  "))
            .await;
        assert!(matches!(empty, Err(ServiceError::Domain(DomainError::EmptyContent))));

        let long = service
            .send_message(ALICE, NewMessageRequest::text(ChatId::new(1), "x".repeat(4001)))
            .await;
        assert!(matches!(long, Err(ServiceError::Validation(_))));
    }

    #[tokio::test]
    async fn test_edit_and_delete_are_author_only() {
        let store = InMemoryStore::new();
        let ctx = context(&store);
        let service = ChatService::new(&ctx);

        let msg = service
            .send_message(ALICE, NewMessageRequest::text(ChatId::new(1), "draft"))
            .await
            .unwrap();

        let edit = EditMessageRequest {
            content: "hijacked".to_string(),
        };
        let denied = service.edit_message(BOB, msg.id, edit).await;
        assert!(matches!(
            denied,
            Err(ServiceError::Domain(DomainError::NotMessageAuthor))
        ));
        assert!(service.delete_message(BOB, msg.id).await.is_err());

        let edited = service
            .edit_message(
                ALICE,
                msg.id,
                EditMessageRequest {
                    content: "final".to_string(),
                },
            )
            .await
            .unwrap();
        assert_eq!(edited.content, "final");

        let deleted = service.delete_message(ALICE, msg.id).await.unwrap();
        assert_eq!(deleted.chat_id, ChatId::new(1));
        let again = service.delete_message(ALICE, msg.id).await;
        assert!(again.is_err_and(|e| e.is_not_found()));
    }

    #[tokio::test]
    async fn test_toggle_reaction_round_trip() {
        let store = InMemoryStore::new();
        let ctx = context(&store);
        let service = ChatService::new(&ctx);
        let msg = service
            .send_message(ALICE, NewMessageRequest::text(ChatId::new(1), "react to me"))
            .await
            .unwrap();

        assert_eq!(
            service
                .toggle_reaction(BOB, msg.id, ReactionKind::Like)
                .await
                .unwrap(),
            ReactionToggle::Added
        );
        let agg = service
            .reaction_of_kind(msg.id, ReactionKind::Like)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(agg.user_ids, vec![BOB]);

        assert_eq!(
            service
                .toggle_reaction(BOB, msg.id, ReactionKind::Like)
                .await
                .unwrap(),
            ReactionToggle::Removed
        );
        assert!(service
            .reaction_of_kind(msg.id, ReactionKind::Like)
            .await
            .unwrap()
            .is_none());

        assert_eq!(
            service
                .toggle_reaction(BOB, msg.id, ReactionKind::Like)
                .await
                .unwrap(),
            ReactionToggle::Added
        );
        let again = service
            .reaction_of_kind(msg.id, ReactionKind::Like)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(again.count, 1);
        assert_eq!(again.user_ids, vec![BOB]);
    }

    #[tokio::test]
    async fn test_toggle_reaction_unknown_message() {
        let store = InMemoryStore::new();
        let ctx = context(&store);
        let service = ChatService::new(&ctx);

        let result = service
            .toggle_reaction(BOB, MessageId::new(404), ReactionKind::Wow)
            .await;
        assert!(result.is_err_and(|e| e.is_not_found()));
    }

    #[tokio::test]
    async fn test_membership_and_peers() {
        let store = InMemoryStore::new();
        let ctx = context(&store);
        let service = ChatService::new(&ctx);

        let chat = store.seed_chat("team", &[ALICE]).await.unwrap();
        service
            .add_member(chat, BOB, MemberRole::Member)
            .await
            .unwrap();
        assert!(service
            .add_member(chat, BOB, MemberRole::Member)
            .await
            .is_err());
        assert_eq!(service.chats_for_user(BOB).await.unwrap().len(), 1);

        let peers = service.peers_of(ALICE).await.unwrap();
        assert_eq!(peers.into_iter().collect::<Vec<_>>(), vec![BOB]);
        assert!(service.peers_of(CAROL).await.unwrap().is_empty());

        service.remove_member(chat, BOB).await.unwrap();
        let missing = service.remove_member(chat, BOB).await;
        assert!(missing.is_err_and(|e| e.is_not_found()));
        assert!(!service.is_member(chat, BOB).await.unwrap());
    }
}
