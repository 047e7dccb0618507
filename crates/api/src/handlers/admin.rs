//! Moderation handlers for submitted climbs (`/admin/climbs`).

use axum::extract::{Path, State};
use axum::Json;
use cragmap_core::error::CoreError;
use cragmap_core::moderation::{ensure_transition, ClimbStatus};
use cragmap_core::types::DbId;
use cragmap_db::models::climb::{Climb, PendingClimb, RejectClimb};
use cragmap_db::repositories::ClimbRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/admin/climbs/pending
pub async fn list_pending(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<PendingClimb>>>> {
    let climbs = ClimbRepo::list_pending(&state.pool).await?;
    Ok(Json(DataResponse { data: climbs }))
}

/// POST /api/v1/admin/climbs/{id}/approve
pub async fn approve(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Climb>>> {
    let climb = match ClimbRepo::approve(&state.pool, id).await? {
        Some(climb) => climb,
        None => return Err(transition_error(&state, id, ClimbStatus::Approved).await),
    };

    tracing::info!(climb_id = %id, admin_id = %admin.user_id, "Climb approved");
    Ok(Json(DataResponse { data: climb }))
}

/// POST /api/v1/admin/climbs/{id}/reject
pub async fn reject(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    body: Option<Json<RejectClimb>>,
) -> AppResult<Json<DataResponse<Climb>>> {
    let reason = body
        .and_then(|Json(b)| b.reason)
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty());

    let climb = match ClimbRepo::reject(&state.pool, id, reason.as_deref()).await? {
        Some(climb) => climb,
        None => return Err(transition_error(&state, id, ClimbStatus::Rejected).await),
    };

    tracing::info!(
        climb_id = %id,
        admin_id = %admin.user_id,
        reason = reason.as_deref().unwrap_or(""),
        "Climb rejected",
    );
    Ok(Json(DataResponse { data: climb }))
}

/// Explain why a guarded update touched no row: the climb is missing or
/// already decided.
async fn transition_error(state: &AppState, id: DbId, next: ClimbStatus) -> AppError {
    let climb = match ClimbRepo::find_by_id(&state.pool, id).await {
        Ok(Some(climb)) => climb,
        Ok(None) => return CoreError::NotFound { entity: "Climb", id }.into(),
        Err(e) => return e.into(),
    };
    let current = match ClimbStatus::from_str_db(&climb.status) {
        Ok(status) => status,
        Err(e) => return e.into(),
    };
    match ensure_transition(current, next) {
        Err(e) => e.into(),
        // The row changed between the update and this read.
        Ok(()) => AppError::Core(CoreError::Conflict(
            "Climb was modified concurrently".into(),
        )),
    }
}
