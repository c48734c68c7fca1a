//! Credential store
//!
//! Hashes and verifies passwords and answers "is this the right password for
//! this user" as a single boolean. An unknown user and a wrong password are
//! the same `false`; the unknown-user path still runs one bcrypt
//! verification against a dummy hash so both cost the same.

use std::sync::Arc;

use bcrypt::BcryptError;
use tracing::warn;

use crate::domain::{DomainError, DomainResult, RepositoryProvider};
use crate::infrastructure::crypto::password::{
    hash_password, verify_password, MAX_WORK_FACTOR, MIN_WORK_FACTOR,
};

const DUMMY_PASSWORD: &str = "messagely-timing-equalizer";

pub struct CredentialStore {
    repos: Arc<dyn RepositoryProvider>,
    work_factor: u32,
    dummy_hash: String,
}

impl CredentialStore {
    /// Fails when `work_factor` is outside bcrypt's 4..=31.
    pub fn new(repos: Arc<dyn RepositoryProvider>, work_factor: u32) -> DomainResult<Self> {
        if !(MIN_WORK_FACTOR..=MAX_WORK_FACTOR).contains(&work_factor) {
            return Err(DomainError::Crypto(format!(
                "bcrypt work factor must be between {} and {}, got {}",
                MIN_WORK_FACTOR, MAX_WORK_FACTOR, work_factor
            )));
        }

        let dummy_hash = hash_password(DUMMY_PASSWORD, work_factor)
            .map_err(|e| DomainError::Crypto(e.to_string()))?;

        Ok(Self {
            repos,
            work_factor,
            dummy_hash,
        })
    }

    pub fn work_factor(&self) -> u32 {
        self.work_factor
    }

    /// Salted one-way hash of `plaintext` at the configured work factor.
    pub async fn hash(&self, plaintext: &str) -> DomainResult<String> {
        let plaintext = plaintext.to_string();
        let work_factor = self.work_factor;

        tokio::task::spawn_blocking(move || hash_password(&plaintext, work_factor))
            .await
            .map_err(|e| DomainError::Crypto(e.to_string()))?
            .map_err(|e| DomainError::Crypto(e.to_string()))
    }

    /// True iff `hash` was produced from `plaintext`. A malformed hash or a
    /// plaintext too long to hash without truncation is `false`.
    pub async fn verify(&self, plaintext: &str, hash: &str) -> bool {
        let plaintext = plaintext.to_string();
        let hash = hash.to_string();

        match tokio::task::spawn_blocking(move || verify_password(&plaintext, &hash)).await {
            Ok(Ok(valid)) => valid,
            Ok(Err(BcryptError::Truncation(_))) => false,
            Ok(Err(e)) => {
                warn!(error = %e, "Stored password hash could not be parsed");
                false
            }
            Err(e) => {
                warn!(error = %e, "Password verification task failed");
                false
            }
        }
    }

    /// True iff `username` exists and `plaintext` is its password.
    ///
    /// Only storage failures are errors; every other negative is `Ok(false)`.
    pub async fn authenticate(&self, username: &str, plaintext: &str) -> DomainResult<bool> {
        match self.repos.users().get_credential(username).await? {
            Some(stored) => Ok(self.verify(plaintext, &stored).await),
            None => {
                let _ = self.verify(plaintext, &self.dummy_hash).await;
                Ok(false)
            }
        }
    }
}
