//! Application layer
//!
//! Use-case services composed from the domain repositories, the crypto
//! primitives and the authorization guards.

pub mod guards;
pub mod identity;
pub mod messaging;

pub use guards::{require_authenticated, require_participant, require_recipient, require_self, Denial};
pub use identity::{resolve_identity, AuthResult, CredentialStore, Registration, UserService};
pub use messaging::MessageService;
