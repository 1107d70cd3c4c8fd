// SPDX-License-Identifier: AGPL-3.0-or-later

//! Collection endpoints.

use axum::{extract::State, Json};

use crate::{db, error::ApiError, models::Collection, state::AppState};

/// All collections, alphabetical.
#[utoipa::path(
    get,
    path = "/api/collections",
    tag = "Collections",
    responses((status = 200, description = "All collections", body = [Collection]))
)]
pub async fn list_collections(
    State(state): State<AppState>,
) -> Result<Json<Vec<Collection>>, ApiError> {
    Ok(Json(db::collections::list_all(&state.db).await?))
}
