//! Password hashing and identity token signing

pub mod jwt;
pub mod password;

pub use jwt::{JwtConfig, TokenClaims, TokenError, TokenService};
pub use password::{hash_password, verify_password};
