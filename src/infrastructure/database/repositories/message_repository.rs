//! SeaORM implementation of MessageRepository

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, NotSet, QueryFilter,
    QueryOrder, Set,
};

use super::user_repository::user_model_to_public;
use crate::domain::{
    DomainError, DomainResult, Message, MessageDetail, MessageRepository, NewMessage,
    PublicProfile, ReadReceipt, ReceivedMessage, SentMessage,
};
use crate::infrastructure::database::entities::{message, user};

pub struct SeaOrmMessageRepository {
    db: DatabaseConnection,
}

impl SeaOrmMessageRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Public profiles for `usernames`, keyed by username.
    async fn profiles<'a, I>(&self, usernames: I) -> DomainResult<HashMap<String, PublicProfile>>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut names: Vec<&str> = usernames.into_iter().collect();
        names.sort_unstable();
        names.dedup();

        let models = user::Entity::find()
            .filter(user::Column::Username.is_in(names))
            .all(&self.db)
            .await?;

        Ok(models
            .into_iter()
            .map(|m| (m.username.clone(), user_model_to_public(m)))
            .collect())
    }
}

fn message_model_to_domain(model: message::Model) -> Message {
    Message {
        id: model.id,
        from_username: model.from_username,
        to_username: model.to_username,
        body: model.body,
        sent_at: model.sent_at,
        read_at: model.read_at,
    }
}

/// The foreign keys make a miss here a storage fault, not a client error.
fn joined(profiles: &HashMap<String, PublicProfile>, username: &str) -> DomainResult<PublicProfile> {
    profiles.get(username).cloned().ok_or_else(|| {
        DomainError::Storage(format!("message references missing user '{}'", username))
    })
}

#[async_trait]
impl MessageRepository for SeaOrmMessageRepository {
    async fn get_message(&self, id: i32) -> DomainResult<Option<MessageDetail>> {
        let Some(model) = message::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };

        let profiles = self
            .profiles([model.from_username.as_str(), model.to_username.as_str()])
            .await?;

        Ok(Some(MessageDetail {
            id: model.id,
            from_user: joined(&profiles, &model.from_username)?,
            to_user: joined(&profiles, &model.to_username)?,
            body: model.body,
            sent_at: model.sent_at,
            read_at: model.read_at,
        }))
    }

    async fn insert_message(&self, new: NewMessage) -> DomainResult<Message> {
        let active = message::ActiveModel {
            id: NotSet,
            from_username: Set(new.from_username),
            to_username: Set(new.to_username),
            body: Set(new.body),
            sent_at: Set(Utc::now()),
            read_at: Set(None),
        };

        let model = active.insert(&self.db).await?;
        Ok(message_model_to_domain(model))
    }

    async fn mark_read(&self, id: i32) -> DomainResult<Option<ReadReceipt>> {
        let Some(model) = message::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };

        let now = Utc::now();
        let mut active: message::ActiveModel = model.into();
        active.read_at = Set(Some(now));
        let updated = active.update(&self.db).await?;

        Ok(Some(ReadReceipt {
            id: updated.id,
            read_at: updated.read_at.unwrap_or(now),
        }))
    }

    async fn messages_from(&self, username: &str) -> DomainResult<Vec<SentMessage>> {
        let models = message::Entity::find()
            .filter(message::Column::FromUsername.eq(username))
            .order_by_asc(message::Column::Id)
            .all(&self.db)
            .await?;

        let profiles = self
            .profiles(models.iter().map(|m| m.to_username.as_str()))
            .await?;

        models
            .into_iter()
            .map(|m| {
                Ok(SentMessage {
                    id: m.id,
                    to_user: joined(&profiles, &m.to_username)?,
                    body: m.body,
                    sent_at: m.sent_at,
                    read_at: m.read_at,
                })
            })
            .collect()
    }

    async fn messages_to(&self, username: &str) -> DomainResult<Vec<ReceivedMessage>> {
        let models = message::Entity::find()
            .filter(message::Column::ToUsername.eq(username))
            .order_by_asc(message::Column::Id)
            .all(&self.db)
            .await?;

        let profiles = self
            .profiles(models.iter().map(|m| m.from_username.as_str()))
            .await?;

        models
            .into_iter()
            .map(|m| {
                Ok(ReceivedMessage {
                    id: m.id,
                    from_user: joined(&profiles, &m.from_username)?,
                    body: m.body,
                    sent_at: m.sent_at,
                    read_at: m.read_at,
                })
            })
            .collect()
    }
}
