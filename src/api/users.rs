// SPDX-License-Identifier: AGPL-3.0-or-later

//! User profile endpoints.

use axum::{extract::State, Json};

use crate::{
    auth::Auth,
    db,
    error::ApiError,
    models::{UpdateProfileRequest, UserProfile},
    state::AppState,
};

/// Get the authenticated user's profile.
#[utoipa::path(
    get,
    path = "/api/users/me",
    tag = "Users",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Profile", body = UserProfile),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "User row no longer exists"),
    )
)]
pub async fn get_me(
    Auth(user): Auth,
    State(state): State<AppState>,
) -> Result<Json<UserProfile>, ApiError> {
    let profile = db::users::profile(&state.db, user.id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;
    Ok(Json(profile))
}

/// Partially update the authenticated user's profile.
///
/// Username uniqueness is pre-checked for a friendly 409; the column's
/// unique constraint still backstops the race, which the error mapping also
/// reports as 409.
#[utoipa::path(
    patch,
    path = "/api/users/me",
    tag = "Users",
    security(("bearer" = [])),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Updated profile", body = UserProfile),
        (status = 400, description = "No fields to update"),
        (status = 401, description = "Missing or invalid token"),
        (status = 409, description = "Username already taken"),
    )
)]
pub async fn update_me(
    Auth(user): Auth,
    State(state): State<AppState>,
    Json(update): Json<UpdateProfileRequest>,
) -> Result<Json<UserProfile>, ApiError> {
    if update.is_empty() {
        return Err(ApiError::validation("No fields to update"));
    }

    if let Some(username) = &update.username {
        if db::users::username_taken(&state.db, username, user.id).await? {
            return Err(ApiError::conflict("Username already taken"));
        }
    }

    let profile = db::users::update_profile(&state.db, user.id, &update).await?;
    Ok(Json(profile))
}
