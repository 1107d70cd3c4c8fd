// SPDX-License-Identifier: AGPL-3.0-or-later

//! Asset repository.
//!
//! The gallery filter is a typed struct lowered onto a `QueryBuilder`; every
//! optional predicate binds a parameter, never interpolates into the SQL
//! text.

use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::models::{Asset, CreateAssetRequest};

const ASSET_COLUMNS: &str = "id, name, asset_type, rarity, image, description, collection_id, \
                             owner_id, owner_address, listed, price, created_at";

const DEFAULT_GALLERY_LIMIT: i64 = 50;
const MAX_GALLERY_LIMIT: i64 = 200;

/// Optional predicates for the public gallery listing.
#[derive(Debug, Clone, Default)]
pub struct GalleryFilter {
    /// Exact asset type; `All` (the frontend's sentinel) disables the filter.
    pub asset_type: Option<String>,
    /// Rarity set membership; empty means no rarity filter.
    pub rarities: Vec<String>,
    /// Case-insensitive substring over name or id.
    pub search: Option<String>,
    pub collection_id: Option<String>,
    /// Result cap, clamped to `1..=200`; defaults to 50.
    pub limit: Option<i64>,
}

impl GalleryFilter {
    fn effective_limit(&self) -> i64 {
        self.limit
            .unwrap_or(DEFAULT_GALLERY_LIMIT)
            .clamp(1, MAX_GALLERY_LIMIT)
    }

    fn effective_type(&self) -> Option<&str> {
        match self.asset_type.as_deref() {
            None | Some("All") => None,
            Some(t) => Some(t),
        }
    }
}

/// All assets, newest first.
pub async fn list_all(pool: &PgPool) -> Result<Vec<Asset>, sqlx::Error> {
    sqlx::query_as::<_, Asset>(&format!(
        "SELECT {ASSET_COLUMNS} FROM assets ORDER BY created_at DESC"
    ))
    .fetch_all(pool)
    .await
}

/// Assets owned by a user, newest first.
pub async fn list_by_owner(pool: &PgPool, owner_id: i64) -> Result<Vec<Asset>, sqlx::Error> {
    sqlx::query_as::<_, Asset>(&format!(
        "SELECT {ASSET_COLUMNS} FROM assets WHERE owner_id = $1 ORDER BY created_at DESC"
    ))
    .bind(owner_id)
    .fetch_all(pool)
    .await
}

/// Gallery listing under the given filter, newest first.
pub async fn gallery(pool: &PgPool, filter: &GalleryFilter) -> Result<Vec<Asset>, sqlx::Error> {
    let mut query = build_gallery_query(filter);
    query.build_query_as::<Asset>().fetch_all(pool).await
}

fn build_gallery_query<'a>(filter: &'a GalleryFilter) -> QueryBuilder<'a, Postgres> {
    let mut builder = QueryBuilder::new(format!(
        "SELECT {ASSET_COLUMNS} FROM assets WHERE 1=1"
    ));

    if let Some(asset_type) = filter.effective_type() {
        builder.push(" AND asset_type = ");
        builder.push_bind(asset_type);
    }

    if !filter.rarities.is_empty() {
        builder.push(" AND rarity = ANY(");
        builder.push_bind(&filter.rarities);
        builder.push(")");
    }

    if let Some(collection_id) = &filter.collection_id {
        builder.push(" AND collection_id = ");
        builder.push_bind(collection_id);
    }

    if let Some(search) = &filter.search {
        let pattern = format!("%{search}%");
        builder.push(" AND (name ILIKE ");
        builder.push_bind(pattern.clone());
        builder.push(" OR id ILIKE ");
        builder.push_bind(pattern);
        builder.push(")");
    }

    builder.push(" ORDER BY created_at DESC LIMIT ");
    builder.push_bind(filter.effective_limit());
    builder
}

/// Insert a minted asset and return the stored row.
pub async fn insert(
    pool: &PgPool,
    id: &str,
    request: &CreateAssetRequest,
    owner_id: Option<i64>,
) -> Result<Asset, sqlx::Error> {
    sqlx::query_as::<_, Asset>(&format!(
        "INSERT INTO assets (id, name, asset_type, rarity, image, description, collection_id, owner_id, price)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
         RETURNING {ASSET_COLUMNS}"
    ))
    .bind(id)
    .bind(&request.name)
    .bind(&request.asset_type)
    .bind(&request.rarity)
    .bind(&request.image)
    .bind(&request.description)
    .bind(&request.collection_id)
    .bind(owner_id)
    .bind(request.price)
    .fetch_one(pool)
    .await
}

/// Mark an asset listed at `price`, owner-gated in the statement itself.
///
/// Returns the number of rows touched: zero means "not the owner or no such
/// asset" and the row is untouched either way.
pub async fn mark_listed(
    pool: &PgPool,
    asset_id: &str,
    owner_id: i64,
    price: f64,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE assets SET listed = TRUE, price = $1 WHERE id = $2 AND owner_id = $3",
    )
    .bind(price)
    .bind(asset_id)
    .bind(owner_id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}

/// Upsert an imported asset under its natural external id, overwriting all
/// mapped columns on conflict.
#[allow(clippy::too_many_arguments)]
pub async fn upsert_imported(
    pool: &PgPool,
    id: &str,
    name: &str,
    image: Option<&str>,
    description: Option<&str>,
    collection_id: &str,
    owner_address: Option<&str>,
    price: Option<f64>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO assets (id, name, image, description, collection_id, owner_address, price)
         VALUES ($1, $2, $3, $4, $5, $6, $7)
         ON CONFLICT (id) DO UPDATE SET
             name = EXCLUDED.name,
             image = EXCLUDED.image,
             description = EXCLUDED.description,
             collection_id = EXCLUDED.collection_id,
             owner_address = EXCLUDED.owner_address,
             price = EXCLUDED.price",
    )
    .bind(id)
    .bind(name)
    .bind(image)
    .bind(description)
    .bind(collection_id)
    .bind(owner_address)
    .bind(price)
    .execute(pool)
    .await?;
    Ok(())
}
