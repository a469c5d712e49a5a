//! Signed session tokens.
//!
//! HS256 JWTs carrying the [`Claims`] of the user they were issued to. The
//! service is stateless apart from the signing key: revocation happens in
//! the access gate, which checks the user still exists.

use chrono::{DateTime, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

use crate::models::session::Claims;
use crate::models::user::User;

/// Token lifetime in seconds (7 days).
pub const TOKEN_TTL_SECS: i64 = 7 * 24 * 60 * 60;

/// Errors returned by [`TokenService`].
#[derive(Debug, Error)]
pub enum TokenError {
    /// Bad signature, wrong algorithm or malformed token.
    #[error("invalid token")]
    Invalid,

    /// Signature is valid but the token is past its expiry.
    #[error("token expired")]
    Expired,

    /// The token could not be signed.
    #[error("token signing failed: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

/// Issues and verifies session tokens with a process-wide secret.
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("algorithm", &Algorithm::HS256)
            .finish_non_exhaustive()
    }
}

impl TokenService {
    /// Create a token service signing with `secret`.
    #[must_use]
    pub fn new(secret: &SecretString) -> Self {
        let key = secret.expose_secret().as_bytes();

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "iat"]);

        Self {
            encoding: EncodingKey::from_secret(key),
            decoding: DecodingKey::from_secret(key),
            validation,
        }
    }

    /// Issue a token for `user`, valid for seven days from now.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Signing` if encoding fails.
    pub fn issue(&self, user: &User) -> Result<String, TokenError> {
        self.issue_at(user, Utc::now())
    }

    /// Issue a token as if it had been issued at `issued_at`.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Signing` if encoding fails.
    pub fn issue_at(&self, user: &User, issued_at: DateTime<Utc>) -> Result<String, TokenError> {
        let iat = issued_at.timestamp();
        let claims = Claims::for_user(user, iat, iat + TOKEN_TTL_SECS);

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding).map_err(TokenError::Signing)
    }

    /// Verify a token and return its claims unchanged.
    ///
    /// The signature is checked before expiry, so a forged token is always
    /// `Invalid` even when its `exp` is in the past.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Expired` for a correctly signed token past its
    /// expiry, and `TokenError::Invalid` for anything else.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use beverly_core::{Email, Role, UserId, Username};
    use chrono::Duration;

    use super::*;

    fn secret(s: &str) -> SecretString {
        SecretString::from(s.to_string())
    }

    fn user() -> User {
        User {
            id: UserId::generate(),
            email: Email::parse("alice@example.com").unwrap(),
            username: Username::parse("alice").unwrap(),
            password_hash: String::new(),
            role: Role::Admin,
            created_at: Utc::now(),
            last_login: None,
        }
    }

    #[test]
    fn test_issue_then_verify_round_trips_identity() {
        let tokens = TokenService::new(&secret("k3y-for-unit-tests-only-9f8e7d6c5b4a"));
        let user = user();

        let claims = tokens.verify(&tokens.issue(&user).unwrap()).unwrap();
        assert_eq!(claims.id, user.id);
        assert_eq!(claims.email, user.email);
        assert_eq!(claims.username, user.username);
        assert_eq!(claims.role, user.role);
        assert_eq!(claims.exp - claims.iat, TOKEN_TTL_SECS);
    }

    #[test]
    fn test_expired_token_is_expired_not_invalid() {
        let tokens = TokenService::new(&secret("k3y-for-unit-tests-only-9f8e7d6c5b4a"));
        let issued = Utc::now() - Duration::days(8);
        let token = tokens.issue_at(&user(), issued).unwrap();

        assert!(matches!(tokens.verify(&token), Err(TokenError::Expired)));
    }

    #[test]
    fn test_token_near_expiry_still_verifies() {
        let tokens = TokenService::new(&secret("k3y-for-unit-tests-only-9f8e7d6c5b4a"));
        let issued = Utc::now() - Duration::days(7) + Duration::minutes(1);
        let token = tokens.issue_at(&user(), issued).unwrap();

        assert!(tokens.verify(&token).is_ok());
    }

    #[test]
    fn test_wrong_secret_is_invalid() {
        let issuer = TokenService::new(&secret("k3y-for-unit-tests-only-9f8e7d6c5b4a"));
        let verifier = TokenService::new(&secret("another-k3y-entirely-0a1b2c3d4e5f"));
        let token = issuer.issue(&user()).unwrap();

        assert!(matches!(verifier.verify(&token), Err(TokenError::Invalid)));
    }

    #[test]
    fn test_forged_expired_token_is_invalid() {
        let issuer = TokenService::new(&secret("k3y-for-unit-tests-only-9f8e7d6c5b4a"));
        let verifier = TokenService::new(&secret("another-k3y-entirely-0a1b2c3d4e5f"));
        let token = issuer
            .issue_at(&user(), Utc::now() - Duration::days(30))
            .unwrap();

        assert!(matches!(verifier.verify(&token), Err(TokenError::Invalid)));
    }

    #[test]
    fn test_malformed_and_tampered_tokens_are_invalid() {
        let tokens = TokenService::new(&secret("k3y-for-unit-tests-only-9f8e7d6c5b4a"));
        assert!(matches!(tokens.verify("not.a.jwt"), Err(TokenError::Invalid)));
        assert!(matches!(tokens.verify(""), Err(TokenError::Invalid)));

        // Alice's signature over someone else's payload
        let alice = tokens.issue(&user()).unwrap();
        let other = tokens.issue(&user()).unwrap();
        let alice_parts: Vec<&str> = alice.split('.').collect();
        let other_parts: Vec<&str> = other.split('.').collect();
        let spliced = format!("{}.{}.{}", alice_parts[0], other_parts[1], alice_parts[2]);
        assert!(matches!(tokens.verify(&spliced), Err(TokenError::Invalid)));
    }
}
