//! Message service
//!
//! Fetch, send and mark-read. Each operation resolves its guard in the same
//! order: identity first, then existence, then the per-message check.

use std::sync::Arc;

use tracing::info;

use crate::application::guards::{require_authenticated, require_participant, require_recipient};
use crate::domain::{
    AuthenticatedUser, DomainError, DomainResult, Message, MessageDetail, NewMessage,
    ReadReceipt, RepositoryProvider,
};

pub struct MessageService {
    repos: Arc<dyn RepositoryProvider>,
}

impl MessageService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    /// A message with both participants joined in, for either participant.
    pub async fn get_message(
        &self,
        identity: Option<&AuthenticatedUser>,
        id: i32,
    ) -> DomainResult<MessageDetail> {
        let user = require_authenticated(identity)?;

        let message = self
            .repos
            .messages()
            .get_message(id)
            .await?
            .ok_or_else(|| DomainError::message_not_found(id))?;

        require_participant(user, &message)?;
        Ok(message)
    }

    /// Send `body` from the authenticated user to `to_username`.
    pub async fn create_message(
        &self,
        identity: Option<&AuthenticatedUser>,
        to_username: &str,
        body: &str,
    ) -> DomainResult<Message> {
        let user = require_authenticated(identity)?;

        if body.trim().is_empty() {
            return Err(DomainError::Validation("body: must not be empty".into()));
        }

        if self.repos.users().get_profile(to_username).await?.is_none() {
            return Err(DomainError::user_not_found(to_username));
        }

        let message = self
            .repos
            .messages()
            .insert_message(NewMessage {
                from_username: user.username.clone(),
                to_username: to_username.to_string(),
                body: body.to_string(),
            })
            .await?;

        info!(
            message_id = message.id,
            from = %message.from_username,
            to = %message.to_username,
            "Message sent"
        );
        Ok(message)
    }

    /// Stamp `read_at`. Only the recipient may; marking twice moves the stamp.
    pub async fn mark_read(
        &self,
        identity: Option<&AuthenticatedUser>,
        id: i32,
    ) -> DomainResult<ReadReceipt> {
        let user = require_authenticated(identity)?;

        let message = self
            .repos
            .messages()
            .get_message(id)
            .await?
            .ok_or_else(|| DomainError::message_not_found(id))?;

        require_recipient(user, &message)?;

        let receipt = self
            .repos
            .messages()
            .mark_read(id)
            .await?
            .ok_or_else(|| DomainError::message_not_found(id))?;

        info!(message_id = id, reader = %user.username, "Message marked read");
        Ok(receipt)
    }
}
