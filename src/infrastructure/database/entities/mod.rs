//! Database entities module

pub mod message;
pub mod user;

pub use message::Entity as Message;
pub use user::Entity as User;
