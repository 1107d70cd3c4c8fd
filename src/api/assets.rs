// SPDX-License-Identifier: AGPL-3.0-or-later

//! Asset endpoints: gallery, portfolio, minting, listing.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::{
    auth::{Auth, AuthUser, MaybeAuth},
    db::{self, assets::GalleryFilter},
    error::ApiError,
    models::{Asset, CreateAssetRequest, ListAssetRequest},
    state::AppState,
};

/// Query parameters for the public gallery.
#[derive(Debug, Deserialize, IntoParams)]
pub struct GalleryQuery {
    /// Exact asset type; `All` disables the filter
    #[serde(rename = "type")]
    pub asset_type: Option<String>,
    /// Comma-separated rarity set, e.g. `Rare,Epic`
    pub rarity: Option<String>,
    /// Case-insensitive substring over name or id
    pub search: Option<String>,
    /// Result cap (default 50, max 200)
    pub limit: Option<i64>,
    pub collection_id: Option<String>,
}

impl From<GalleryQuery> for GalleryFilter {
    fn from(query: GalleryQuery) -> Self {
        let rarities = query
            .rarity
            .as_deref()
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|r| !r.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        GalleryFilter {
            asset_type: query.asset_type,
            rarities,
            search: query.search,
            collection_id: query.collection_id,
            limit: query.limit,
        }
    }
}

/// Response for a successful listing mutation.
#[derive(Debug, Serialize, ToSchema)]
pub struct ListedResponse {
    pub message: String,
    pub id: String,
    pub price: f64,
}

fn validate_price(price: f64) -> Result<(), ApiError> {
    if !price.is_finite() || price < 0.0 {
        return Err(ApiError::validation("Price must be a non-negative number"));
    }
    Ok(())
}

/// Owner attribution for a freshly minted asset: the session user's id, or
/// NULL when minting anonymously.
fn minted_owner(user: Option<&AuthUser>) -> Option<i64> {
    user.map(|u| u.id)
}

/// Map the row count of an owner-gated UPDATE: zero rows means the caller
/// does not own the asset (or it does not exist).
fn require_owned_row(rows: u64) -> Result<(), ApiError> {
    if rows == 0 {
        return Err(ApiError::forbidden("Not allowed or asset not found"));
    }
    Ok(())
}

/// All assets, newest first.
#[utoipa::path(
    get,
    path = "/api/assets",
    tag = "Assets",
    responses((status = 200, description = "All assets", body = [Asset]))
)]
pub async fn list_assets(State(state): State<AppState>) -> Result<Json<Vec<Asset>>, ApiError> {
    Ok(Json(db::assets::list_all(&state.db).await?))
}

/// Filtered gallery listing.
#[utoipa::path(
    get,
    path = "/api/assets/gallery",
    tag = "Assets",
    params(GalleryQuery),
    responses((status = 200, description = "Matching assets", body = [Asset]))
)]
pub async fn gallery(
    State(state): State<AppState>,
    Query(query): Query<GalleryQuery>,
) -> Result<Json<Vec<Asset>>, ApiError> {
    let filter = GalleryFilter::from(query);
    Ok(Json(db::assets::gallery(&state.db, &filter).await?))
}

/// Assets owned by the authenticated user (portfolio).
#[utoipa::path(
    get,
    path = "/api/assets/mine",
    tag = "Assets",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Owned assets", body = [Asset]),
        (status = 401, description = "Missing or invalid token"),
    )
)]
pub async fn my_assets(
    Auth(user): Auth,
    State(state): State<AppState>,
) -> Result<Json<Vec<Asset>>, ApiError> {
    Ok(Json(db::assets::list_by_owner(&state.db, user.id).await?))
}

/// Create an asset.
///
/// A valid bearer token attributes ownership to the caller; without one the
/// asset is created unowned. Anonymous creation is deliberate: minting does
/// not require a session.
#[utoipa::path(
    post,
    path = "/api/assets",
    tag = "Assets",
    request_body = CreateAssetRequest,
    responses(
        (status = 201, description = "Asset created", body = Asset),
        (status = 400, description = "Missing name or invalid price"),
    )
)]
pub async fn create_asset(
    MaybeAuth(user): MaybeAuth,
    State(state): State<AppState>,
    Json(request): Json<CreateAssetRequest>,
) -> Result<(StatusCode, Json<Asset>), ApiError> {
    if request.name.trim().is_empty() {
        return Err(ApiError::validation("Asset name required"));
    }
    if let Some(price) = request.price {
        validate_price(price)?;
    }

    let id = Uuid::new_v4().to_string();
    let owner_id = minted_owner(user.as_ref());
    let asset = db::assets::insert(&state.db, &id, &request, owner_id).await?;

    tracing::info!(asset_id = %asset.id, owner_id = ?owner_id, "asset created");

    Ok((StatusCode::CREATED, Json(asset)))
}

/// List an owned asset for sale at a price.
///
/// The ownership check lives in the UPDATE's WHERE clause; zero rows touched
/// means the caller does not own the asset (or it does not exist) and maps
/// to 403 with the row unchanged.
#[utoipa::path(
    patch,
    path = "/api/assets/{id}/list",
    tag = "Assets",
    security(("bearer" = [])),
    params(("id" = String, Path, description = "Asset id")),
    request_body = ListAssetRequest,
    responses(
        (status = 200, description = "Asset listed", body = ListedResponse),
        (status = 400, description = "Invalid price"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Not the owner, or no such asset"),
    )
)]
pub async fn list_for_sale(
    Auth(user): Auth,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<ListAssetRequest>,
) -> Result<Json<ListedResponse>, ApiError> {
    let price = request
        .price
        .ok_or_else(|| ApiError::validation("Price required"))?;
    validate_price(price)?;

    let rows = db::assets::mark_listed(&state.db, &id, user.id, price).await?;
    require_owned_row(rows)?;

    Ok(Json(ListedResponse {
        message: "Asset listed".to_string(),
        id,
        price,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rarity_param_splits_into_set() {
        let query = GalleryQuery {
            asset_type: None,
            rarity: Some("Rare, Epic,,Legendary ".into()),
            search: None,
            limit: None,
            collection_id: None,
        };
        let filter = GalleryFilter::from(query);
        assert_eq!(filter.rarities, vec!["Rare", "Epic", "Legendary"]);
    }

    #[test]
    fn absent_rarity_means_no_set() {
        let query = GalleryQuery {
            asset_type: Some("All".into()),
            rarity: None,
            search: Some("void".into()),
            limit: Some(10),
            collection_id: None,
        };
        let filter = GalleryFilter::from(query);
        assert!(filter.rarities.is_empty());
        assert_eq!(filter.search.as_deref(), Some("void"));
        assert_eq!(filter.limit, Some(10));
    }

    #[test]
    fn price_validation_rejects_bad_values() {
        assert!(validate_price(0.0).is_ok());
        assert!(validate_price(19.95).is_ok());
        assert!(validate_price(-1.0).is_err());
        assert!(validate_price(f64::NAN).is_err());
        assert!(validate_price(f64::INFINITY).is_err());
    }

    #[test]
    fn anonymous_mint_has_no_owner() {
        assert_eq!(minted_owner(None), None);

        let user = AuthUser {
            id: 42,
            wallet_address: "0xfeed".into(),
        };
        assert_eq!(minted_owner(Some(&user)), Some(42));
    }

    #[test]
    fn untouched_listing_update_is_forbidden() {
        let err = require_owned_row(0).unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::FORBIDDEN);
        assert_eq!(err.message, "Not allowed or asset not found");

        assert!(require_owned_row(1).is_ok());
    }
}
