//! Message DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::{Message, MessageDetail, ReadReceipt};
use crate::interfaces::http::modules::users::PublicProfileDto;

/// New message. The sender is always the caller.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateMessageRequest {
    #[validate(length(min = 1, max = 50, message = "to_username is required"))]
    pub to_username: String,
    #[validate(length(min = 1, message = "body must not be empty"))]
    pub body: String,
}

/// Stored message as created
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageDto {
    pub id: i32,
    pub from_username: String,
    pub to_username: String,
    pub body: String,
    pub sent_at: DateTime<Utc>,
    pub read_at: Option<DateTime<Utc>>,
}

impl From<Message> for MessageDto {
    fn from(m: Message) -> Self {
        Self {
            id: m.id,
            from_username: m.from_username,
            to_username: m.to_username,
            body: m.body,
            sent_at: m.sent_at,
            read_at: m.read_at,
        }
    }
}

/// Message with both participants' public profiles
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageDetailDto {
    pub id: i32,
    pub body: String,
    pub sent_at: DateTime<Utc>,
    pub read_at: Option<DateTime<Utc>>,
    pub from_user: PublicProfileDto,
    pub to_user: PublicProfileDto,
}

impl From<MessageDetail> for MessageDetailDto {
    fn from(m: MessageDetail) -> Self {
        Self {
            id: m.id,
            body: m.body,
            sent_at: m.sent_at,
            read_at: m.read_at,
            from_user: m.from_user.into(),
            to_user: m.to_user.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReadReceiptDto {
    pub id: i32,
    pub read_at: DateTime<Utc>,
}

impl From<ReadReceipt> for ReadReceiptDto {
    fn from(r: ReadReceipt) -> Self {
        Self {
            id: r.id,
            read_at: r.read_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageDetailResponse {
    pub message: MessageDetailDto,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreatedMessageResponse {
    pub message: MessageDto,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReadReceiptResponse {
    pub message: ReadReceiptDto,
}
