//! User DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{PublicProfile, ReceivedMessage, SentMessage, UserProfile};

/// Fields of a user that any signed-in user may see
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PublicProfileDto {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
}

impl From<PublicProfile> for PublicProfileDto {
    fn from(p: PublicProfile) -> Self {
        Self {
            username: p.username,
            first_name: p.first_name,
            last_name: p.last_name,
            phone: p.phone,
        }
    }
}

/// Full profile, returned only to its owner
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserProfileDto {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub join_at: DateTime<Utc>,
    pub last_login_at: DateTime<Utc>,
}

impl From<UserProfile> for UserProfileDto {
    fn from(p: UserProfile) -> Self {
        Self {
            username: p.username,
            first_name: p.first_name,
            last_name: p.last_name,
            phone: p.phone,
            join_at: p.join_at,
            last_login_at: p.last_login_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UsersResponse {
    pub users: Vec<PublicProfileDto>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub user: UserProfileDto,
}

/// Inbox entry
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReceivedMessageDto {
    pub id: i32,
    pub from_user: PublicProfileDto,
    pub body: String,
    pub sent_at: DateTime<Utc>,
    pub read_at: Option<DateTime<Utc>>,
}

impl From<ReceivedMessage> for ReceivedMessageDto {
    fn from(m: ReceivedMessage) -> Self {
        Self {
            id: m.id,
            from_user: m.from_user.into(),
            body: m.body,
            sent_at: m.sent_at,
            read_at: m.read_at,
        }
    }
}

/// Outbox entry
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SentMessageDto {
    pub id: i32,
    pub to_user: PublicProfileDto,
    pub body: String,
    pub sent_at: DateTime<Utc>,
    pub read_at: Option<DateTime<Utc>>,
}

impl From<SentMessage> for SentMessageDto {
    fn from(m: SentMessage) -> Self {
        Self {
            id: m.id,
            to_user: m.to_user.into(),
            body: m.body,
            sent_at: m.sent_at,
            read_at: m.read_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct InboxResponse {
    pub messages: Vec<ReceivedMessageDto>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OutboxResponse {
    pub messages: Vec<SentMessageDto>,
}
