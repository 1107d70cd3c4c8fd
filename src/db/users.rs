// SPDX-License-Identifier: AGPL-3.0-or-later

//! User repository.
//!
//! Addresses are stored lower-cased; callers normalize before reaching this
//! module. Nonce writes are single-statement upserts so the create-on-first-
//! contact path does not race a concurrent request for the same address.

use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::models::{UpdateProfileRequest, User, UserProfile};

/// Look up a user by (lower-cased) wallet address.
pub async fn find_by_address(pool: &PgPool, address: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE wallet_address = $1")
        .bind(address)
        .fetch_optional(pool)
        .await
}

/// Issue a nonce: create the user row on first contact, otherwise overwrite
/// the stored nonce.
pub async fn upsert_nonce(pool: &PgPool, address: &str, nonce: &str) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO users (wallet_address, nonce) VALUES ($1, $2)
         ON CONFLICT (wallet_address) DO UPDATE SET nonce = EXCLUDED.nonce",
    )
    .bind(address)
    .bind(nonce)
    .execute(pool)
    .await?;
    Ok(())
}

/// Rotate the nonce after a successful verification, invalidating the signed
/// message for replay.
pub async fn rotate_nonce(pool: &PgPool, address: &str, nonce: &str) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE users SET nonce = $1 WHERE wallet_address = $2")
        .bind(nonce)
        .bind(address)
        .execute(pool)
        .await?;
    Ok(())
}

/// Fetch the public profile projection for a user id.
pub async fn profile(pool: &PgPool, user_id: i64) -> Result<Option<UserProfile>, sqlx::Error> {
    sqlx::query_as::<_, UserProfile>(
        "SELECT id, wallet_address, display_name, username, bio FROM users WHERE id = $1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

/// Whether `username` is already claimed by a different user.
pub async fn username_taken(
    pool: &PgPool,
    username: &str,
    user_id: i64,
) -> Result<bool, sqlx::Error> {
    let row: Option<(i64,)> =
        sqlx::query_as("SELECT id FROM users WHERE username = $1 AND id != $2")
            .bind(username)
            .bind(user_id)
            .fetch_optional(pool)
            .await?;
    Ok(row.is_some())
}

/// Apply a partial profile update and return the new projection.
///
/// The caller rejects empty updates; fields present in the request become a
/// dynamically assembled but fully parameterized SET list.
pub async fn update_profile(
    pool: &PgPool,
    user_id: i64,
    update: &UpdateProfileRequest,
) -> Result<UserProfile, sqlx::Error> {
    let mut query = build_profile_update(user_id, update);
    query.build_query_as::<UserProfile>().fetch_one(pool).await
}

fn build_profile_update<'a>(
    user_id: i64,
    update: &'a UpdateProfileRequest,
) -> QueryBuilder<'a, Postgres> {
    let mut builder = QueryBuilder::new("UPDATE users SET ");

    {
        let mut assignments = builder.separated(", ");
        if let Some(display_name) = &update.display_name {
            assignments.push("display_name = ");
            assignments.push_bind_unseparated(display_name);
        }
        if let Some(username) = &update.username {
            assignments.push("username = ");
            assignments.push_bind_unseparated(username);
        }
        if let Some(bio) = &update.bio {
            assignments.push("bio = ");
            assignments.push_bind_unseparated(bio);
        }
    }

    builder.push(" WHERE id = ");
    builder.push_bind(user_id);
    builder.push(" RETURNING id, wallet_address, display_name, username, bio");
    builder
}
