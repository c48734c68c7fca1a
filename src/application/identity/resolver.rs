//! Identity resolution
//!
//! Turns an optional raw token into an optional identity. Every failure
//! collapses to anonymous; nothing downstream learns why.

use tracing::debug;

use crate::domain::AuthenticatedUser;
use crate::infrastructure::crypto::jwt::TokenService;

pub fn resolve_identity(token: Option<&str>, tokens: &TokenService) -> Option<AuthenticatedUser> {
    let token = token?;
    let claims = tokens.verify(token).ok();
    if claims.is_none() {
        debug!("Presented token did not verify; continuing as anonymous");
    }
    claims.map(|c| AuthenticatedUser::new(c.username))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::crypto::jwt::TokenClaims;

    #[test]
    fn valid_token_yields_identity() {
        let tokens = TokenService::new("s3cret");
        let token = tokens.issue(&TokenClaims::new("alice")).unwrap();
        assert_eq!(
            resolve_identity(Some(&token), &tokens),
            Some(AuthenticatedUser::new("alice"))
        );
    }

    #[test]
    fn missing_token_is_anonymous() {
        assert_eq!(resolve_identity(None, &TokenService::new("s3cret")), None);
    }

    #[test]
    fn any_bad_token_is_anonymous() {
        let tokens = TokenService::new("s3cret");
        let foreign = TokenService::new("other")
            .issue(&TokenClaims::new("alice"))
            .unwrap();

        for token in ["", "garbage", "a.b.c", foreign.as_str()] {
            assert_eq!(resolve_identity(Some(token), &tokens), None);
        }
    }
}
