//! Authorization guards
//!
//! Small pure predicates over the request identity and a resource. Route
//! shaped checks (`require_authenticated`, `require_self`) run before any
//! storage lookup; message checks run on the looked-up row. All of them
//! deny with the same vocabulary, which becomes a 401.

use thiserror::Error;

use crate::domain::{AuthenticatedUser, DomainError, Participants};

const UNAUTHORIZED: &str = "Unauthorized";
const CANNOT_READ_MESSAGE: &str = "Cannot read this message";
const CANNOT_MARK_READ: &str = "Cannot set this message to read";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct Denial {
    reason: &'static str,
}

impl Denial {
    pub fn reason(&self) -> &'static str {
        self.reason
    }
}

impl From<Denial> for DomainError {
    fn from(denial: Denial) -> Self {
        DomainError::Unauthorized(denial.reason.to_string())
    }
}

/// Allow iff a verified identity is attached.
pub fn require_authenticated(
    identity: Option<&AuthenticatedUser>,
) -> Result<&AuthenticatedUser, Denial> {
    identity.ok_or(Denial {
        reason: UNAUTHORIZED,
    })
}

/// Allow iff the identity is exactly `username` (case-sensitive). An absent
/// identity and a different user get the same denial.
pub fn require_self<'a>(
    identity: Option<&'a AuthenticatedUser>,
    username: &str,
) -> Result<&'a AuthenticatedUser, Denial> {
    match identity {
        Some(user) if user.username == username => Ok(user),
        _ => Err(Denial {
            reason: UNAUTHORIZED,
        }),
    }
}

/// Allow iff the identity sent or received `message`.
pub fn require_participant(
    identity: &AuthenticatedUser,
    message: &impl Participants,
) -> Result<(), Denial> {
    if message.is_participant(&identity.username) {
        Ok(())
    } else {
        Err(Denial {
            reason: CANNOT_READ_MESSAGE,
        })
    }
}

/// Allow iff the identity received `message`. The sender is refused.
pub fn require_recipient(
    identity: &AuthenticatedUser,
    message: &impl Participants,
) -> Result<(), Denial> {
    if message.recipient() == identity.username {
        Ok(())
    } else {
        Err(Denial {
            reason: CANNOT_MARK_READ,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::Message;

    fn alice() -> AuthenticatedUser {
        AuthenticatedUser::new("alice")
    }

    fn message(from: &str, to: &str) -> Message {
        Message {
            id: 1,
            from_username: from.into(),
            to_username: to.into(),
            body: "hi".into(),
            sent_at: Utc::now(),
            read_at: None,
        }
    }

    #[test]
    fn authenticated_requires_identity() {
        let user = alice();
        assert_eq!(require_authenticated(Some(&user)).unwrap(), &user);
        assert_eq!(require_authenticated(None).unwrap_err().reason(), "Unauthorized");
    }

    #[test]
    fn self_denies_anonymous() {
        assert!(require_self(None, "alice").is_err());
    }

    #[test]
    fn self_denies_other_user() {
        assert!(require_self(Some(&alice()), "bob").is_err());
    }

    #[test]
    fn self_is_case_sensitive() {
        assert!(require_self(Some(&alice()), "Alice").is_err());
        assert!(require_self(Some(&alice()), "alice ").is_err());
    }

    #[test]
    fn self_allows_exact_match() {
        assert!(require_self(Some(&alice()), "alice").is_ok());
    }

    #[test]
    fn anonymous_and_mismatch_deny_identically() {
        assert_eq!(
            require_self(None, "alice").unwrap_err(),
            require_self(Some(&alice()), "bob").unwrap_err()
        );
    }

    #[test]
    fn participant_allows_sender_and_recipient() {
        assert!(require_participant(&alice(), &message("alice", "bob")).is_ok());
        assert!(require_participant(&alice(), &message("bob", "alice")).is_ok());
        assert_eq!(
            require_participant(&alice(), &message("bob", "carol"))
                .unwrap_err()
                .reason(),
            "Cannot read this message"
        );
    }

    #[test]
    fn recipient_refuses_sender() {
        assert!(require_recipient(&alice(), &message("bob", "alice")).is_ok());
        assert_eq!(
            require_recipient(&alice(), &message("alice", "bob"))
                .unwrap_err()
                .reason(),
            "Cannot set this message to read"
        );
    }

    #[test]
    fn denial_becomes_unauthorized_error() {
        let err: DomainError = require_authenticated(None).unwrap_err().into();
        assert_eq!(err.status_code(), 401);
        assert_eq!(err.to_string(), "Unauthorized");
    }
}
