//! SeaORM implementation of RepositoryProvider

use sea_orm::DatabaseConnection;

use crate::domain::{MessageRepository, RepositoryProvider, UserRepository};

use super::message_repository::SeaOrmMessageRepository;
use super::user_repository::SeaOrmUserRepository;

/// Unified repository provider backed by SeaORM.
///
/// Holds one connection pool and exposes per-aggregate repository accessors.
///
/// ```ignore
/// let repos = SeaOrmRepositoryProvider::new(db.clone());
/// let profile = repos.users().get_profile("alice").await?;
/// let message = repos.messages().get_message(1).await?;
/// ```
pub struct SeaOrmRepositoryProvider {
    users: SeaOrmUserRepository,
    messages: SeaOrmMessageRepository,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            users: SeaOrmUserRepository::new(db.clone()),
            messages: SeaOrmMessageRepository::new(db),
        }
    }
}

impl RepositoryProvider for SeaOrmRepositoryProvider {
    fn users(&self) -> &dyn UserRepository {
        &self.users
    }

    fn messages(&self) -> &dyn MessageRepository {
        &self.messages
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::{ConnectOptions, Database};
    use sea_orm_migration::MigratorTrait;

    use super::*;
    use crate::domain::{NewAccount, NewMessage};
    use crate::infrastructure::database::migrator::Migrator;

    async fn provider() -> SeaOrmRepositoryProvider {
        // One pooled connection, otherwise every connection sees its own empty database.
        let mut opts = ConnectOptions::new("sqlite::memory:");
        opts.max_connections(1).min_connections(1);
        let db = Database::connect(opts).await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        SeaOrmRepositoryProvider::new(db)
    }

    fn account(username: &str) -> NewAccount {
        NewAccount {
            username: username.into(),
            password_hash: format!("hash-of-{}", username),
            first_name: "First".into(),
            last_name: "Last".into(),
            phone: "+15550000".into(),
        }
    }

    #[tokio::test]
    async fn accounts_round_trip_through_sqlite() {
        let repos = provider().await;
        let created = repos.users().insert_account(account("bob")).await.unwrap();
        repos.users().insert_account(account("alice")).await.unwrap();

        assert_eq!(created.join_at, created.last_login_at);
        assert_eq!(
            repos.users().get_credential("bob").await.unwrap().as_deref(),
            Some("hash-of-bob")
        );
        assert_eq!(repos.users().get_credential("nobody").await.unwrap(), None);

        let names: Vec<String> = repos
            .users()
            .list_profiles()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.username)
            .collect();
        assert_eq!(names, vec!["alice", "bob"]);
    }

    #[tokio::test]
    async fn duplicate_username_is_a_validation_error() {
        let repos = provider().await;
        repos.users().insert_account(account("bob")).await.unwrap();
        let err = repos.users().insert_account(account("bob")).await.unwrap_err();
        assert_eq!(err.status_code(), 400);
    }

    #[tokio::test]
    async fn update_last_login_reports_missing_user() {
        let repos = provider().await;
        assert!(repos.users().update_last_login("ghost").await.unwrap().is_none());

        let created = repos.users().insert_account(account("bob")).await.unwrap();
        let stamped = repos.users().update_last_login("bob").await.unwrap().unwrap();
        assert!(stamped >= created.last_login_at);

        let profile = repos.users().get_profile("bob").await.unwrap().unwrap();
        assert_eq!(profile.join_at, created.join_at);
        assert_eq!(profile.last_login_at, stamped);
    }

    #[tokio::test]
    async fn messages_join_participants_and_mark_read() {
        let repos = provider().await;
        repos.users().insert_account(account("alice")).await.unwrap();
        repos.users().insert_account(account("bob")).await.unwrap();

        let sent = repos
            .messages()
            .insert_message(NewMessage {
                from_username: "alice".into(),
                to_username: "bob".into(),
                body: "hello".into(),
            })
            .await
            .unwrap();
        assert!(sent.read_at.is_none());

        let detail = repos.messages().get_message(sent.id).await.unwrap().unwrap();
        assert_eq!(detail.from_user.username, "alice");
        assert_eq!(detail.to_user.username, "bob");

        let receipt = repos.messages().mark_read(sent.id).await.unwrap().unwrap();
        assert_eq!(receipt.id, sent.id);

        let inbox = repos.messages().messages_to("bob").await.unwrap();
        assert_eq!(inbox.len(), 1);
        assert_eq!(inbox[0].from_user.username, "alice");
        assert!(inbox[0].read_at.is_some());

        let outbox = repos.messages().messages_from("alice").await.unwrap();
        assert_eq!(outbox.len(), 1);
        assert_eq!(outbox[0].to_user.username, "bob");

        assert!(repos.messages().get_message(sent.id + 1).await.unwrap().is_none());
        assert!(repos.messages().mark_read(sent.id + 1).await.unwrap().is_none());
    }
}
