//! Messaging module — direct messages between two users

pub mod service;

pub use service::MessageService;
