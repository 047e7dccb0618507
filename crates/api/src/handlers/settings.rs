//! Handlers for the caller's preferences and account (`/settings`).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use cragmap_core::crags::normalize_country_code;
use cragmap_core::settings::{clean_text, parse_gender, validate_default_location, MAX_BIO_LEN};
use cragmap_db::models::profile::{UpdateSettings, UserSettings};
use cragmap_db::repositories::ProfileRepo;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/settings
pub async fn get(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<UserSettings>>> {
    let profile = ProfileRepo::find_or_create(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse {
        data: UserSettings::from(&profile),
    }))
}

/// PUT /api/v1/settings
///
/// Absent fields are left unchanged; empty strings clear text fields.
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<UpdateSettings>,
) -> AppResult<Json<DataResponse<UserSettings>>> {
    let update = normalize(input)?;

    ProfileRepo::find_or_create(&state.pool, user.user_id).await?;
    let profile = ProfileRepo::update_settings(&state.pool, user.user_id, &update).await?;

    tracing::info!(user_id = %user.user_id, "Settings updated");
    Ok(Json(DataResponse {
        data: UserSettings::from(&profile),
    }))
}

/// Validate and trim a settings patch. Cleared values become empty strings.
fn normalize(input: UpdateSettings) -> AppResult<UpdateSettings> {
    let gender = match input.gender.as_deref() {
        Some(raw) => Some(parse_gender(raw)?.unwrap_or_default()),
        None => None,
    };
    let country = input
        .country
        .as_deref()
        .map(|c| normalize_country_code(Some(c)).unwrap_or_default());
    let default_location = input
        .default_location
        .as_deref()
        .map(validate_default_location)
        .transpose()?;

    Ok(UpdateSettings {
        gender,
        country,
        bio: clean_text(input.bio.as_deref(), MAX_BIO_LEN),
        avatar_url: input.avatar_url.map(|u| u.trim().to_string()),
        default_location,
        ..input
    })
}

/// DELETE /api/v1/settings/account
///
/// Removes the caller's logs and profile; their submitted climbs stay but
/// lose the link to the account.
pub async fn delete_account(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<StatusCode> {
    ProfileRepo::delete_account(&state.pool, user.user_id).await?;
    tracing::info!(user_id = %user.user_id, "Account deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use cragmap_core::settings::Units;

    use super::*;

    #[test]
    fn patch_is_trimmed_and_cleared_values_are_empty() {
        let patch = normalize(UpdateSettings {
            gender: Some("".into()),
            country: Some("fra".into()),
            bio: Some("  hello  ".into()),
            units: Some(Units::Imperial),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(patch.gender.as_deref(), Some(""));
        assert_eq!(patch.country.as_deref(), Some("FR"));
        assert_eq!(patch.bio.as_deref(), Some("hello"));
        assert_eq!(patch.units, Some(Units::Imperial));
        assert_eq!(patch.default_location, None);
    }

    #[test]
    fn invalid_gender_is_rejected() {
        let result = normalize(UpdateSettings {
            gender: Some("robot".into()),
            ..Default::default()
        });
        assert!(result.is_err());
    }
}
