//! Message aggregate
//!
//! A message references its two participants by username; it owns neither.

pub mod model;
pub mod repository;

pub use model::{
    Message, MessageDetail, NewMessage, Participants, ReadReceipt, ReceivedMessage, SentMessage,
};

pub use repository::MessageRepository;
