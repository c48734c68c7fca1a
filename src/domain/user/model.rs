use chrono::{DateTime, Utc};

/// Full profile, visible only to its owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    /// Set once at registration.
    pub join_at: DateTime<Utc>,
    pub last_login_at: DateTime<Utc>,
}

/// Fields any authenticated user may see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicProfile {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
}

impl From<UserProfile> for PublicProfile {
    fn from(p: UserProfile) -> Self {
        Self {
            username: p.username,
            first_name: p.first_name,
            last_name: p.last_name,
            phone: p.phone,
        }
    }
}

/// Row to insert at registration. `password_hash` is already hashed.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
}
