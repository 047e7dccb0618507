//! Handlers for the caller's public identity (`/profile`).

use axum::extract::State;
use axum::Json;
use cragmap_core::settings::{clean_text, MAX_NAME_LEN};
use cragmap_core::username::{suggest_usernames, validate_username};
use cragmap_db::models::profile::{Profile, UpdateProfile};
use cragmap_db::repositories::ProfileRepo;

use crate::error::{unique_violation, AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/profile
///
/// The profile row is created on first access.
pub async fn get(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<Profile>>> {
    let profile = ProfileRepo::find_or_create(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse { data: profile }))
}

/// PUT /api/v1/profile
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<UpdateProfile>,
) -> AppResult<Json<DataResponse<Profile>>> {
    let username = input.username.as_deref().map(validate_username).transpose()?;
    let first_name = clean_text(input.first_name.as_deref(), MAX_NAME_LEN);
    let last_name = clean_text(input.last_name.as_deref(), MAX_NAME_LEN);

    let current = ProfileRepo::find_or_create(&state.pool, user.user_id).await?;

    if let Some(name) = &username {
        if ProfileRepo::username_taken(&state.pool, name, user.user_id).await? {
            let first = first_name.as_deref().or(current.first_name.as_deref());
            let last = last_name.as_deref().or(current.last_name.as_deref());
            return Err(username_conflict(&state, name, first, last).await?);
        }
    }

    let update = UpdateProfile {
        username: username.clone(),
        first_name,
        last_name,
    };
    let profile = match ProfileRepo::update_profile(&state.pool, user.user_id, &update).await {
        Ok(profile) => profile,
        Err(err) if unique_violation(&err) == Some("uq_profiles_username") => {
            let name = username.as_deref().unwrap_or_default();
            return Err(username_conflict(
                &state,
                name,
                update.first_name.as_deref(),
                update.last_name.as_deref(),
            )
            .await?);
        }
        Err(err) => return Err(err.into()),
    };

    tracing::info!(user_id = %user.user_id, "Profile updated");
    Ok(Json(DataResponse { data: profile }))
}

/// Build the 409 body, keeping only suggestions nobody holds yet.
async fn username_conflict(
    state: &AppState,
    username: &str,
    first_name: Option<&str>,
    last_name: Option<&str>,
) -> AppResult<AppError> {
    let candidates = {
        let mut rng = rand::rng();
        suggest_usernames(username, first_name, last_name, &mut rng)
    };
    let suggestions = ProfileRepo::filter_available(&state.pool, &candidates).await?;
    Ok(AppError::UsernameTaken { suggestions })
}
