// SPDX-License-Identifier: AGPL-3.0-or-later

//! # Data Models
//!
//! Row types for the three persisted entities plus the request/response
//! structures used by the REST API. Row types derive `sqlx::FromRow`; API
//! types derive `Serialize`/`Deserialize` and `ToSchema` for the OpenAPI
//! document.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

// =============================================================================
// Users
// =============================================================================

/// A user row, keyed by lower-cased wallet address.
///
/// Created lazily on the first nonce request for an unseen address. The
/// `nonce` is single-use: it is rotated on every nonce request and on every
/// successful signature verification.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub wallet_address: String,
    pub nonce: String,
    pub display_name: Option<String>,
    pub username: Option<String>,
    pub bio: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Public profile projection of a user. Never exposes the nonce.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct UserProfile {
    pub id: i64,
    pub wallet_address: String,
    pub display_name: Option<String>,
    pub username: Option<String>,
    pub bio: Option<String>,
}

/// Partial profile update. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateProfileRequest {
    pub display_name: Option<String>,
    pub username: Option<String>,
    pub bio: Option<String>,
}

impl UpdateProfileRequest {
    pub fn is_empty(&self) -> bool {
        self.display_name.is_none() && self.username.is_none() && self.bio.is_none()
    }
}

// =============================================================================
// Assets
// =============================================================================

/// An asset (NFT) row.
///
/// Minted assets carry a UUIDv4 id and an `owner_id` foreign key; imported
/// assets use the natural external id `<collection>:<token_id>` and record
/// the on-chain owner address instead.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Asset {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub asset_type: Option<String>,
    pub rarity: Option<String>,
    pub image: Option<String>,
    pub description: Option<String>,
    pub collection_id: Option<String>,
    pub owner_id: Option<i64>,
    pub owner_address: Option<String>,
    pub listed: bool,
    pub price: Option<f64>,
    pub created_at: DateTime<Utc>,
}

/// Payload for `POST /api/assets`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateAssetRequest {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub asset_type: Option<String>,
    pub rarity: Option<String>,
    pub image: Option<String>,
    pub description: Option<String>,
    pub collection_id: Option<String>,
    pub price: Option<f64>,
}

/// Payload for `PATCH /api/assets/{id}/list`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ListAssetRequest {
    pub price: Option<f64>,
}

// =============================================================================
// Collections
// =============================================================================

/// A collection row, keyed by its external aggregator id.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Collection {
    pub id: String,
    pub name: Option<String>,
    pub image: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn asset_type_serializes_as_type() {
        let asset = Asset {
            id: "a-1".into(),
            name: "Void Walker".into(),
            asset_type: Some("Weapon".into()),
            rarity: Some("Epic".into()),
            image: None,
            description: None,
            collection_id: None,
            owner_id: Some(7),
            owner_address: None,
            listed: false,
            price: None,
            created_at: Utc::now(),
        };

        let value = serde_json::to_value(&asset).unwrap();
        assert_eq!(value["type"], "Weapon");
        assert!(value.get("asset_type").is_none());
    }

    #[test]
    fn empty_profile_update_is_detected() {
        assert!(UpdateProfileRequest::default().is_empty());
        let update = UpdateProfileRequest {
            username: Some("voidwalker".into()),
            ..Default::default()
        };
        assert!(!update.is_empty());
    }
}
