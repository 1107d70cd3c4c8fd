// SPDX-License-Identifier: AGPL-3.0-or-later

//! Axum extractors for bearer-authenticated requests.
//!
//! Use `Auth` in handlers that require a session:
//!
//! ```rust,ignore
//! async fn my_assets(Auth(user): Auth) -> impl IntoResponse {
//!     // user is AuthUser
//! }
//! ```
//!
//! `MaybeAuth` never rejects: it yields `Some(AuthUser)` for a valid token
//! and `None` otherwise, for routes where a session is optional.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use super::{token::Claims, AuthError};
use crate::state::AppState;

/// The authenticated caller, as proven by a bearer token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: i64,
    pub wallet_address: String,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.id,
            wallet_address: claims.wallet_address,
        }
    }
}

/// Required-authentication extractor. Rejects with 401 when the token is
/// missing, malformed, expired, or unverifiable.
#[derive(Debug)]
pub struct Auth(pub AuthUser);

impl FromRequestParts<AppState> for Auth {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        let claims = state.tokens.verify(token)?;
        Ok(Auth(claims.into()))
    }
}

/// Optional-authentication extractor. Never rejects.
pub struct MaybeAuth(pub Option<AuthUser>);

impl FromRequestParts<AppState> for MaybeAuth {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = bearer_token(parts)
            .ok()
            .and_then(|token| state.tokens.verify(token).ok())
            .map(AuthUser::from);
        Ok(MaybeAuth(user))
    }
}

/// Pull the bearer token out of the Authorization header.
fn bearer_token(parts: &Parts) -> Result<&str, AuthError> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingAuthHeader)?
        .to_str()
        .map_err(|_| AuthError::InvalidAuthHeader)?;

    header
        .strip_prefix("Bearer ")
        .ok_or(AuthError::InvalidAuthHeader)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with_auth(value: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/api/assets/mine");
        if let Some(value) = value {
            builder = builder.header(AUTHORIZATION, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[tokio::test]
    async fn valid_bearer_token_yields_user() {
        let state = AppState::for_tests();
        let token = state.tokens.issue(5, "0xfeed").unwrap();
        let mut parts = parts_with_auth(Some(&format!("Bearer {token}")));

        let Auth(user) = Auth::from_request_parts(&mut parts, &state).await.unwrap();
        assert_eq!(user.id, 5);
        assert_eq!(user.wallet_address, "0xfeed");
    }

    #[tokio::test]
    async fn missing_header_is_rejected() {
        let state = AppState::for_tests();
        let mut parts = parts_with_auth(None);

        let err = Auth::from_request_parts(&mut parts, &state)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::MissingAuthHeader));
    }

    #[tokio::test]
    async fn non_bearer_scheme_is_rejected() {
        let state = AppState::for_tests();
        let mut parts = parts_with_auth(Some("Basic dXNlcjpwYXNz"));

        let err = Auth::from_request_parts(&mut parts, &state)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidAuthHeader));
    }

    #[tokio::test]
    async fn maybe_auth_is_none_without_token() {
        let state = AppState::for_tests();
        let mut parts = parts_with_auth(None);

        let MaybeAuth(user) = MaybeAuth::from_request_parts(&mut parts, &state)
            .await
            .unwrap();
        assert!(user.is_none());
    }

    #[tokio::test]
    async fn maybe_auth_is_none_for_garbage_token() {
        let state = AppState::for_tests();
        let mut parts = parts_with_auth(Some("Bearer garbage"));

        let MaybeAuth(user) = MaybeAuth::from_request_parts(&mut parts, &state)
            .await
            .unwrap();
        assert!(user.is_none());
    }

    #[tokio::test]
    async fn maybe_auth_yields_user_for_valid_token() {
        let state = AppState::for_tests();
        let token = state.tokens.issue(8, "0xbeef").unwrap();
        let mut parts = parts_with_auth(Some(&format!("Bearer {token}")));

        let MaybeAuth(user) = MaybeAuth::from_request_parts(&mut parts, &state)
            .await
            .unwrap();
        assert_eq!(user.unwrap().id, 8);
    }
}
