//! SeaORM implementation of UserRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::prelude::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    SqlErr,
};
use tracing::debug;

use crate::domain::{
    DomainError, DomainResult, NewAccount, PublicProfile, UserProfile, UserRepository,
};
use crate::infrastructure::database::entities::user;

pub struct SeaOrmUserRepository {
    db: DatabaseConnection,
}

impl SeaOrmUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn user_model_to_profile(model: user::Model) -> UserProfile {
    UserProfile {
        username: model.username,
        first_name: model.first_name,
        last_name: model.last_name,
        phone: model.phone,
        join_at: model.join_at,
        last_login_at: model.last_login_at,
    }
}

pub(super) fn user_model_to_public(model: user::Model) -> PublicProfile {
    PublicProfile {
        username: model.username,
        first_name: model.first_name,
        last_name: model.last_name,
        phone: model.phone,
    }
}

// ── Repository implementation ───────────────────────────────────

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn get_credential(&self, username: &str) -> DomainResult<Option<String>> {
        let model = user::Entity::find_by_id(username.to_string())
            .one(&self.db)
            .await?;

        Ok(model.map(|m| m.password_hash))
    }

    async fn insert_account(&self, account: NewAccount) -> DomainResult<UserProfile> {
        let now = Utc::now();
        let username = account.username.clone();

        let new_user = user::ActiveModel {
            username: Set(account.username),
            password_hash: Set(account.password_hash),
            first_name: Set(account.first_name),
            last_name: Set(account.last_name),
            phone: Set(account.phone),
            join_at: Set(now),
            last_login_at: Set(now),
        };

        let model = new_user.insert(&self.db).await.map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                DomainError::Validation(format!("Username '{}' is already taken", username))
            }
            _ => DomainError::from(e),
        })?;

        debug!(username = %model.username, "Account row inserted");
        Ok(user_model_to_profile(model))
    }

    async fn update_last_login(&self, username: &str) -> DomainResult<Option<DateTime<Utc>>> {
        let now = Utc::now();
        let result = user::Entity::update_many()
            .col_expr(user::Column::LastLoginAt, Expr::value(now))
            .filter(user::Column::Username.eq(username))
            .exec(&self.db)
            .await?;

        Ok((result.rows_affected > 0).then_some(now))
    }

    async fn list_profiles(&self) -> DomainResult<Vec<PublicProfile>> {
        let models = user::Entity::find()
            .order_by_asc(user::Column::Username)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(user_model_to_public).collect())
    }

    async fn get_profile(&self, username: &str) -> DomainResult<Option<UserProfile>> {
        let model = user::Entity::find_by_id(username.to_string())
            .one(&self.db)
            .await?;

        Ok(model.map(user_model_to_profile))
    }
}
