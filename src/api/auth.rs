// SPDX-License-Identifier: AGPL-3.0-or-later

//! Nonce issuance and signature verification endpoints.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    auth::{signature, AuthError},
    db,
    error::ApiError,
    state::AppState,
};

/// Response for `GET /api/auth/nonce/{address}`.
#[derive(Debug, Serialize, ToSchema)]
pub struct NonceResponse {
    /// The freshly issued single-use nonce
    pub nonce: String,
    /// The exact challenge message the wallet must sign
    pub message: String,
}

/// Payload for `POST /api/auth/verify`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct VerifyRequest {
    /// Wallet address the caller claims to control
    #[serde(default)]
    pub address: String,
    /// Personal-sign signature over the issued challenge
    #[serde(default)]
    pub signature: String,
}

/// The authenticated session identity returned alongside the token.
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionUser {
    pub id: i64,
    #[serde(rename = "walletAddress")]
    pub wallet_address: String,
}

/// Response for a successful verification.
#[derive(Debug, Serialize, ToSchema)]
pub struct VerifyResponse {
    pub token: String,
    pub user: SessionUser,
}

/// Issue a login nonce for a wallet address.
///
/// Creates the user row on first contact; otherwise overwrites the stored
/// nonce, invalidating any previously issued challenge.
#[utoipa::path(
    get,
    path = "/api/auth/nonce/{address}",
    tag = "Auth",
    params(
        ("address" = String, Path, description = "EVM wallet address (0x + 40 hex chars)")
    ),
    responses(
        (status = 200, description = "Nonce issued", body = NonceResponse),
        (status = 400, description = "Implausible wallet address"),
    )
)]
pub async fn get_nonce(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<Json<NonceResponse>, ApiError> {
    if !signature::is_plausible_address(&address) {
        return Err(ApiError::validation("Invalid wallet address"));
    }

    let normalized = address.to_lowercase();
    let nonce = signature::generate_nonce();
    db::users::upsert_nonce(&state.db, &normalized, &nonce).await?;

    tracing::debug!(address = %normalized, "nonce issued");

    let message = signature::challenge_message(&nonce);
    Ok(Json(NonceResponse { nonce, message }))
}

/// Exchange a signed challenge for a bearer token.
///
/// On success the nonce rotates, so the same signature can never verify
/// twice. On failure the nonce stays put; each retry still has to produce a
/// valid signature over it.
#[utoipa::path(
    post,
    path = "/api/auth/verify",
    tag = "Auth",
    request_body = VerifyRequest,
    responses(
        (status = 200, description = "Signature verified, session issued", body = VerifyResponse),
        (status = 400, description = "Missing address or signature"),
        (status = 401, description = "Unknown user or invalid signature"),
    )
)]
pub async fn verify(
    State(state): State<AppState>,
    Json(request): Json<VerifyRequest>,
) -> Result<Json<VerifyResponse>, ApiError> {
    if request.address.trim().is_empty() || request.signature.trim().is_empty() {
        return Err(ApiError::validation("Address and signature required"));
    }

    let normalized = request.address.to_lowercase();
    let user = db::users::find_by_address(&state.db, &normalized)
        .await?
        .ok_or(AuthError::UserNotFound)?;

    signature::verify_wallet_signature(&normalized, &user.nonce, &request.signature)?;

    // Rotate before issuing the session: a replayed signature over the old
    // nonce must fail from this point on.
    let next_nonce = signature::generate_nonce();
    db::users::rotate_nonce(&state.db, &normalized, &next_nonce).await?;

    let token = state.tokens.issue(user.id, &user.wallet_address)?;

    tracing::info!(user_id = user.id, address = %user.wallet_address, "wallet login verified");

    Ok(Json(VerifyResponse {
        token,
        user: SessionUser {
            id: user.id,
            wallet_address: user.wallet_address,
        },
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_user_serializes_camel_case() {
        let response = VerifyResponse {
            token: "jwt".into(),
            user: SessionUser {
                id: 3,
                wallet_address: "0xabc".into(),
            },
        };
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["user"]["walletAddress"], "0xabc");
        assert_eq!(value["user"]["id"], 3);
    }
}
