use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{NewAccount, PublicProfile, UserProfile};
use crate::domain::DomainResult;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Stored password hash, `None` when the user does not exist.
    async fn get_credential(&self, username: &str) -> DomainResult<Option<String>>;

    /// Insert credential and profile. `join_at` and `last_login_at` are both
    /// set to the insertion time. Fails with `Validation` on a taken username.
    async fn insert_account(&self, account: NewAccount) -> DomainResult<UserProfile>;

    /// Stamp `last_login_at` with the current time. `None` when no such user.
    async fn update_last_login(&self, username: &str) -> DomainResult<Option<DateTime<Utc>>>;

    /// All profiles ordered by username ascending.
    async fn list_profiles(&self) -> DomainResult<Vec<PublicProfile>>;

    async fn get_profile(&self, username: &str) -> DomainResult<Option<UserProfile>>;
}
