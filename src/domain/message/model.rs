use chrono::{DateTime, Utc};

use crate::domain::user::PublicProfile;

/// Anything with a sender and a recipient.
pub trait Participants {
    fn sender(&self) -> &str;
    fn recipient(&self) -> &str;

    fn is_participant(&self, username: &str) -> bool {
        self.sender() == username || self.recipient() == username
    }
}

/// Stored message row.
///
/// `read_at` starts as `None` and is only ever set by the recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: i32,
    pub from_username: String,
    pub to_username: String,
    pub body: String,
    pub sent_at: DateTime<Utc>,
    pub read_at: Option<DateTime<Utc>>,
}

impl Participants for Message {
    fn sender(&self) -> &str {
        &self.from_username
    }

    fn recipient(&self) -> &str {
        &self.to_username
    }
}

/// A message with both participants' public profiles joined in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageDetail {
    pub id: i32,
    pub body: String,
    pub sent_at: DateTime<Utc>,
    pub read_at: Option<DateTime<Utc>>,
    pub from_user: PublicProfile,
    pub to_user: PublicProfile,
}

impl Participants for MessageDetail {
    fn sender(&self) -> &str {
        &self.from_user.username
    }

    fn recipient(&self) -> &str {
        &self.to_user.username
    }
}

/// Outbox entry: the recipient is the interesting party.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub id: i32,
    pub to_user: PublicProfile,
    pub body: String,
    pub sent_at: DateTime<Utc>,
    pub read_at: Option<DateTime<Utc>>,
}

/// Inbox entry: the sender is the interesting party.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceivedMessage {
    pub id: i32,
    pub from_user: PublicProfile,
    pub body: String,
    pub sent_at: DateTime<Utc>,
    pub read_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadReceipt {
    pub id: i32,
    pub read_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewMessage {
    pub from_username: String,
    pub to_username: String,
    pub body: String,
}
