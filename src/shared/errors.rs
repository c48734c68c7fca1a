use thiserror::Error;

/// Failures surfaced by the identity and messaging operations.
///
/// Every variant is per-request; none of them is fatal to the process.
/// Messages are written for the client, so they never carry secrets or
/// reveal whether a username exists.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{0}")]
    Validation(String),

    /// Unknown user and wrong password share this variant.
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Crypto error: {0}")]
    Crypto(String),
}

impl DomainError {
    pub fn user_not_found(username: &str) -> Self {
        Self::NotFound(format!("No user of {} found", username))
    }

    pub fn message_not_found(id: i32) -> Self {
        Self::NotFound(format!("No such message: {}", id))
    }

    /// HTTP-equivalent status code for this failure.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) | Self::InvalidCredentials => 400,
            Self::Unauthorized(_) => 401,
            Self::NotFound(_) => 404,
            Self::Storage(_) | Self::Crypto(_) => 500,
        }
    }
}

impl From<sea_orm::DbErr> for DomainError {
    fn from(e: sea_orm::DbErr) -> Self {
        Self::Storage(e.to_string())
    }
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;
