//! Repository provider for the domain layer
//!
//! Consumers request only the repository they need:
//!
//! ```ignore
//! async fn handle(repos: &dyn RepositoryProvider) {
//!     let hash = repos.users().get_credential("alice").await?;
//!     let msg = repos.messages().get_message(1).await?;
//! }
//! ```

use super::message::MessageRepository;
use super::user::UserRepository;

pub trait RepositoryProvider: Send + Sync {
    fn users(&self) -> &dyn UserRepository;
    fn messages(&self) -> &dyn MessageRepository;
}
