//! Handlers for the `/climbs` resource.

use axum::extract::{Path, State};
use axum::Json;
use cragmap_core::error::CoreError;
use cragmap_core::moderation::ClimbStatus;
use cragmap_core::types::DbId;
use cragmap_db::models::climb::{Climb, ClimbDetail};
use cragmap_db::repositories::ClimbRepo;

use crate::error::AppResult;
use crate::middleware::auth::{AuthUser, MaybeAuthUser};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/climbs/{id}
///
/// Unapproved climbs are only visible to their submitter and to admins;
/// everyone else gets a 404.
pub async fn get_by_id(
    State(state): State<AppState>,
    MaybeAuthUser(user): MaybeAuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ClimbDetail>>> {
    let climb = ClimbRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound { entity: "Climb", id })?;
    if !is_visible(&climb, user.as_ref()) {
        return Err(CoreError::NotFound { entity: "Climb", id }.into());
    }

    let route_lines = ClimbRepo::route_lines(&state.pool, id).await?;
    let (crag_name, image_url) = ClimbRepo::context(&state.pool, &climb).await?;

    Ok(Json(DataResponse {
        data: ClimbDetail {
            climb,
            crag_name,
            image_url,
            route_lines,
        },
    }))
}

fn is_visible(climb: &Climb, viewer: Option<&AuthUser>) -> bool {
    if ClimbStatus::from_str_db(&climb.status).ok() == Some(ClimbStatus::Approved) {
        return true;
    }
    viewer.is_some_and(|v| v.is_admin() || climb.user_id == Some(v.user_id))
}
