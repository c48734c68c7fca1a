//! User aggregate
//!
//! An account is one credential plus one profile, keyed by username.

pub mod model;
pub mod repository;

mod dto_register;

pub use model::{NewAccount, PublicProfile, UserProfile};

pub use dto_register::RegisterUserDto;

pub use repository::UserRepository;
