// SPDX-License-Identifier: AGPL-3.0-or-later

//! Bearer token issuance and verification.
//!
//! Tokens are HS256 JWTs carrying the user id and wallet address, valid for
//! seven days. The token is opaque to callers; everything else in the API
//! only consumes the extracted [`Claims`].

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::AuthError;

/// Token validity window: 7 days.
pub const TOKEN_TTL_SECS: i64 = 7 * 24 * 60 * 60;

/// Clock skew tolerance (60 seconds).
const CLOCK_SKEW_LEEWAY: u64 = 60;

/// Claims carried by a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User row id
    pub id: i64,
    /// Lower-cased wallet address the session was proven for
    pub wallet_address: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration (Unix timestamp)
    pub exp: i64,
}

/// HS256 signing and verification keys derived from the configured secret.
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenKeys {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Issue a token for a verified user.
    pub fn issue(&self, user_id: i64, wallet_address: &str) -> Result<String, AuthError> {
        let iat = Utc::now().timestamp();
        let claims = Claims {
            id: user_id,
            wallet_address: wallet_address.to_string(),
            iat,
            exp: iat + TOKEN_TTL_SECS,
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AuthError::Internal(e.to_string()))
    }

    /// Verify a token and return its claims.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = CLOCK_SKEW_LEEWAY;

        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|err| match err.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issue_then_verify_roundtrips() {
        let keys = TokenKeys::new("test-secret");
        let token = keys.issue(42, "0xabc0000000000000000000000000000000000def").unwrap();

        let claims = keys.verify(&token).unwrap();
        assert_eq!(claims.id, 42);
        assert_eq!(claims.wallet_address, "0xabc0000000000000000000000000000000000def");
        assert_eq!(claims.exp - claims.iat, TOKEN_TTL_SECS);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let keys = TokenKeys::new("secret-a");
        let other = TokenKeys::new("secret-b");
        let token = keys.issue(1, "0x01").unwrap();

        assert!(matches!(
            other.verify(&token).unwrap_err(),
            AuthError::InvalidToken
        ));
    }

    #[test]
    fn tampered_token_is_rejected() {
        let keys = TokenKeys::new("test-secret");
        let mut token = keys.issue(1, "0x01").unwrap();
        token.push('x');

        assert!(matches!(
            keys.verify(&token).unwrap_err(),
            AuthError::InvalidToken
        ));
    }

    #[test]
    fn expired_token_is_rejected() {
        let secret = "test-secret";
        let keys = TokenKeys::new(secret);

        // Hand-roll a token whose expiry is well past the leeway window.
        let iat = Utc::now().timestamp() - 7200;
        let claims = Claims {
            id: 9,
            wallet_address: "0x09".into(),
            iat,
            exp: iat + 3600,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap();

        assert!(matches!(
            keys.verify(&token).unwrap_err(),
            AuthError::TokenExpired
        ));
    }

    #[test]
    fn garbage_token_is_rejected() {
        let keys = TokenKeys::new("test-secret");
        assert!(matches!(
            keys.verify("not.a.jwt").unwrap_err(),
            AuthError::InvalidToken
        ));
    }
}
