//! Domain layer: entities, DTOs and repository traits. No I/O.

pub mod identity;
pub mod message;
pub mod repositories;
pub mod user;

pub use identity::AuthenticatedUser;
pub use message::{
    Message, MessageDetail, MessageRepository, NewMessage, Participants, ReadReceipt,
    ReceivedMessage, SentMessage,
};
pub use repositories::RepositoryProvider;
pub use user::{NewAccount, PublicProfile, RegisterUserDto, UserProfile, UserRepository};

pub use crate::shared::errors::{DomainError, DomainResult};
