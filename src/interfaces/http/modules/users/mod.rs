//! Users module — directory, own profile, inbox and outbox

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
