//! Handlers for the user's logbook.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use cragmap_core::error::CoreError;
use cragmap_core::stats::{compute_stats, LogStatus, LogbookStats};
use cragmap_core::types::DbId;
use cragmap_db::models::log::{CreateLogs, LogWithClimb};
use cragmap_db::repositories::{LogRepo, ProfileRepo};
use serde::Serialize;

use crate::error::{is_foreign_key_violation, AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct LogRoutesResponse {
    pub success: bool,
    pub logged: usize,
    pub status: LogStatus,
}

/// POST /api/v1/log-routes
///
/// Logging a climb that is already in the logbook replaces its status.
pub async fn log_routes(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreateLogs>,
) -> AppResult<Json<DataResponse<LogRoutesResponse>>> {
    if input.climb_ids.is_empty() {
        return Err(AppError::BadRequest("climbIds array is required".into()));
    }
    let status = match input.status.as_deref() {
        None => LogStatus::default(),
        Some(raw) => LogStatus::from_str_db(raw)
            .map_err(|_| AppError::BadRequest("Invalid status".into()))?,
    };

    ProfileRepo::find_or_create(&state.pool, user.user_id).await?;

    let logs = LogRepo::upsert_many(&state.pool, user.user_id, &input.climb_ids, status)
        .await
        .map_err(|err| {
            if is_foreign_key_violation(&err) {
                AppError::BadRequest("One or more climbs do not exist".into())
            } else {
                err.into()
            }
        })?;

    tracing::info!(
        user_id = %user.user_id,
        count = logs.len(),
        status = status.as_str(),
        "Climbs logged",
    );

    Ok(Json(DataResponse {
        data: LogRoutesResponse {
            success: true,
            logged: logs.len(),
            status,
        },
    }))
}

/// GET /api/v1/logs
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<Vec<LogWithClimb>>>> {
    let logs = LogRepo::list_for_user(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse { data: logs }))
}

/// GET /api/v1/logs/stats
pub async fn stats(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<LogbookStats>>> {
    let logs = LogRepo::list_for_user(&state.pool, user.user_id).await?;
    let ascents: Vec<_> = logs.iter().filter_map(LogWithClimb::to_ascent).collect();
    Ok(Json(DataResponse {
        data: compute_stats(&ascents, Utc::now()),
    }))
}

/// DELETE /api/v1/logs/{id}
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if LogRepo::delete(&state.pool, user.user_id, id).await? {
        tracing::info!(user_id = %user.user_id, log_id = %id, "Log deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound { entity: "Log", id }))
    }
}
