// SPDX-License-Identifier: AGPL-3.0-or-later

//! Collection repository.

use sqlx::PgPool;

use crate::models::Collection;

/// All collections, alphabetical.
pub async fn list_all(pool: &PgPool) -> Result<Vec<Collection>, sqlx::Error> {
    sqlx::query_as::<_, Collection>(
        "SELECT id, name, image, description, created_at FROM collections ORDER BY name ASC",
    )
    .fetch_all(pool)
    .await
}

/// Upsert a collection under its external aggregator id, overwriting all
/// mapped columns on conflict.
pub async fn upsert(
    pool: &PgPool,
    id: &str,
    name: Option<&str>,
    image: Option<&str>,
    description: Option<&str>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO collections (id, name, image, description)
         VALUES ($1, $2, $3, $4)
         ON CONFLICT (id) DO UPDATE SET
             name = EXCLUDED.name,
             image = EXCLUDED.image,
             description = EXCLUDED.description",
    )
    .bind(id)
    .bind(name)
    .bind(image)
    .bind(description)
    .execute(pool)
    .await?;
    Ok(())
}
