//! # Messagely
//!
//! Authentication and authorization core for a two-party messaging service:
//! account registration, password login, stateless signed tokens, and the
//! guards that decide who may read, send and mark messages.
//!
//! ## Architecture
//!
//! - **domain**: accounts, messages, identity and repository traits
//! - **application**: use-case services and authorization guards
//! - **infrastructure**: JWT and bcrypt, SeaORM persistence, in-memory store
//! - **interfaces**: REST API (axum) with Swagger documentation
//! - **shared**: error taxonomy and graceful shutdown
//! - **config** / **server**: TOML configuration and the server runtime

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

pub use config::{default_config_path, AppConfig};

pub use infrastructure::{init_database, DatabaseConfig, InMemoryStorage, SeaOrmRepositoryProvider};

pub use interfaces::http::create_api_router;

pub use shared::errors::{DomainError, DomainResult};
