//! In-memory storage for tests and ephemeral runs

mod memory;

pub use memory::InMemoryStorage;
