//! Identity module — accounts & authentication
//!
//! `CredentialStore` owns password hashing, `resolve_identity` turns a bearer
//! token into an identity, and `UserService` orchestrates the account
//! use-cases: registration, login, profile and mailbox reads.

pub mod credentials;
pub mod resolver;
pub mod service;

pub use credentials::CredentialStore;
pub use resolver::resolve_identity;
pub use service::{AuthResult, Registration, UserService};
