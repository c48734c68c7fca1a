//! Messages module — fetch, send, mark read

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
