// SPDX-License-Identifier: AGPL-3.0-or-later

//! # Reservoir Importer
//!
//! One-shot ETL job: fetch collection and token listings from the Reservoir
//! aggregation API and upsert them into the local store under their natural
//! external ids. Re-running overwrites all mapped columns, so the job is
//! idempotent. This module is driven by the `import-nfts` binary and is not
//! part of the request-serving path.

use reqwest::Client;
use serde::Deserialize;
use sqlx::PgPool;
use thiserror::Error;
use tracing::{info, warn};

use crate::db;

pub const DEFAULT_API_BASE_URL: &str = "https://api.reservoir.tools";

/// Collections fetched per run.
const COLLECTIONS_LIMIT: u32 = 10;
/// Tokens fetched per collection.
const TOKENS_LIMIT: u32 = 20;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Reservoir request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("database write failed: {0}")]
    Database(#[from] sqlx::Error),
}

// =============================================================================
// Reservoir response shapes (the subset of fields we map)
// =============================================================================

#[derive(Debug, Deserialize)]
struct CollectionsResponse {
    #[serde(default)]
    collections: Vec<ReservoirCollection>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservoirCollection {
    pub id: String,
    pub name: Option<String>,
    pub image: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokensResponse {
    #[serde(default)]
    tokens: Vec<TokenEntry>,
}

#[derive(Debug, Deserialize)]
struct TokenEntry {
    token: ReservoirToken,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservoirToken {
    pub token_id: Option<String>,
    pub name: Option<String>,
    pub image: Option<String>,
    pub description: Option<String>,
    pub owner: Option<String>,
    pub last_sale: Option<LastSale>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LastSale {
    pub price: Option<f64>,
}

/// The natural primary key for an imported token.
fn external_asset_id(collection_id: &str, token_id: &str) -> String {
    format!("{collection_id}:{token_id}")
}

// =============================================================================
// Client
// =============================================================================

pub struct ReservoirClient {
    http: Client,
    base_url: String,
    api_key: Option<String>,
}

impl ReservoirClient {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into(),
            api_key,
        }
    }

    /// Build a client from `RESERVOIR_API_URL` / `RESERVOIR_API_KEY`.
    pub fn from_env() -> Self {
        let base_url = std::env::var("RESERVOIR_API_URL")
            .unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string());
        let api_key = std::env::var("RESERVOIR_API_KEY").ok();
        Self::new(base_url, api_key)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, ImportError> {
        let mut request = self.http.get(url);
        if let Some(key) = &self.api_key {
            request = request.header("x-api-key", key);
        }
        let response = request.send().await?.error_for_status()?;
        Ok(response.json().await?)
    }

    async fn fetch_collections(&self) -> Result<Vec<ReservoirCollection>, ImportError> {
        let url = format!(
            "{}/collections/v6?limit={COLLECTIONS_LIMIT}",
            self.base_url
        );
        let body: CollectionsResponse = self.get_json(&url).await?;
        Ok(body.collections)
    }

    async fn fetch_tokens(&self, collection_id: &str) -> Result<Vec<ReservoirToken>, ImportError> {
        let url = format!(
            "{}/tokens/v6?collection={collection_id}&limit={TOKENS_LIMIT}",
            self.base_url
        );
        let body: TokensResponse = self.get_json(&url).await?;
        Ok(body.tokens.into_iter().map(|entry| entry.token).collect())
    }
}

// =============================================================================
// Job
// =============================================================================

#[derive(Debug, Default)]
pub struct ImportSummary {
    pub collections: usize,
    pub assets: usize,
}

/// Fetch and upsert one sweep of collections and their tokens.
pub async fn run(pool: &PgPool, client: &ReservoirClient) -> Result<ImportSummary, ImportError> {
    let mut summary = ImportSummary::default();

    let collections = client.fetch_collections().await?;
    info!(count = collections.len(), "fetched collections");

    for collection in &collections {
        db::collections::upsert(
            pool,
            &collection.id,
            collection.name.as_deref(),
            collection.image.as_deref(),
            collection.description.as_deref(),
        )
        .await?;
        summary.collections += 1;

        let tokens = client.fetch_tokens(&collection.id).await?;
        for token in tokens {
            let Some(token_id) = token.token_id.as_deref() else {
                warn!(collection = %collection.id, "skipping token without id");
                continue;
            };

            let id = external_asset_id(&collection.id, token_id);
            let name = token
                .name
                .clone()
                .unwrap_or_else(|| format!("#{token_id}"));
            let price = token.last_sale.as_ref().and_then(|sale| sale.price);

            db::assets::upsert_imported(
                pool,
                &id,
                &name,
                token.image.as_deref(),
                token.description.as_deref(),
                &collection.id,
                token.owner.as_deref(),
                price,
            )
            .await?;
            summary.assets += 1;
        }

        info!(collection = %collection.id, "collection imported");
    }

    Ok(summary)
}
