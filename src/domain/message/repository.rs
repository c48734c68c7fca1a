use async_trait::async_trait;

use super::{Message, MessageDetail, NewMessage, ReadReceipt, ReceivedMessage, SentMessage};
use crate::domain::DomainResult;

#[async_trait]
pub trait MessageRepository: Send + Sync {
    async fn get_message(&self, id: i32) -> DomainResult<Option<MessageDetail>>;

    /// Insert with `sent_at = now` and no `read_at`. The id is assigned by storage.
    async fn insert_message(&self, message: NewMessage) -> DomainResult<Message>;

    /// Set `read_at = now`, overwriting any earlier value. `None` when no such id.
    async fn mark_read(&self, id: i32) -> DomainResult<Option<ReadReceipt>>;

    /// Messages sent by `username`, oldest first.
    async fn messages_from(&self, username: &str) -> DomainResult<Vec<SentMessage>>;

    /// Messages received by `username`, oldest first.
    async fn messages_to(&self, username: &str) -> DomainResult<Vec<ReceivedMessage>>;
}
