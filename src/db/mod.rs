// SPDX-License-Identifier: AGPL-3.0-or-later

//! # Database Layer
//!
//! Pool construction, schema bootstrap, and per-entity repository functions.
//! Every query is parameterized; dynamic predicates (gallery filter, profile
//! update) go through `sqlx::QueryBuilder` so no user input is ever spliced
//! into SQL text.
//!
//! There is no migrations system. The schema is small and bootstrapped with
//! idempotent `CREATE TABLE IF NOT EXISTS` statements at startup.

pub mod assets;
pub mod collections;
pub mod users;

use std::time::Duration;

use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::config::Config;

const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// Schema bootstrap statements, executed in order.
const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS users (
        id BIGSERIAL PRIMARY KEY,
        wallet_address TEXT UNIQUE NOT NULL,
        nonce TEXT NOT NULL,
        display_name TEXT,
        username TEXT UNIQUE,
        bio TEXT,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )",
    "CREATE TABLE IF NOT EXISTS collections (
        id TEXT PRIMARY KEY,
        name TEXT,
        image TEXT,
        description TEXT,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )",
    "CREATE TABLE IF NOT EXISTS assets (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        asset_type TEXT,
        rarity TEXT,
        image TEXT,
        description TEXT,
        collection_id TEXT,
        owner_id BIGINT REFERENCES users(id),
        owner_address TEXT,
        listed BOOLEAN NOT NULL DEFAULT FALSE,
        price DOUBLE PRECISION,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )",
    "CREATE INDEX IF NOT EXISTS assets_owner_id_idx ON assets (owner_id)",
    "CREATE INDEX IF NOT EXISTS assets_collection_id_idx ON assets (collection_id)",
];

/// Connect a pool with the configured size.
pub async fn connect(config: &Config) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect(&config.database_url)
        .await
}

/// Create the tables if they do not exist yet.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}
