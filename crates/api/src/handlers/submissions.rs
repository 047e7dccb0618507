//! Handler for route submissions.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::{NaiveTime, Utc};
use cragmap_core::error::CoreError;
use cragmap_core::submission::{check_daily_limit, ImageTarget, SubmissionRequest};
use cragmap_core::types::{DbId, Timestamp};
use cragmap_db::models::climb::SubmissionOutcome;
use cragmap_db::repositories::{ClimbRepo, CragRepo, ImageRepo, ProfileRepo, RegionRepo};
use serde::Serialize;

use crate::clients::moderation::SubmittedRoute;
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SubmissionResponse {
    pub success: bool,
    pub climbs_created: usize,
    pub route_lines_created: usize,
    pub image_id: DbId,
    pub climb_ids: Vec<DbId>,
}

/// Start of the current UTC day; the daily limit counts from here.
fn start_of_day(now: Timestamp) -> Timestamp {
    now.date_naive().and_time(NaiveTime::MIN).and_utc()
}

/// POST /api/v1/submissions
///
/// Validates the payload, enforces the daily route limit, then creates the
/// image (for new photos), climbs and route lines in one transaction. The
/// moderation worker is notified after the commit.
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<SubmissionRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<SubmissionResponse>>)> {
    let submission = input.validate()?;

    ProfileRepo::find_or_create(&state.pool, user.user_id).await?;

    let already =
        ClimbRepo::count_created_since(&state.pool, user.user_id, start_of_day(Utc::now()))
            .await?;
    check_daily_limit(already, submission.routes.len(), state.config.max_routes_per_day)?;

    if let ImageTarget::New(image) = &submission.image {
        CragRepo::find_by_id(&state.pool, image.crag_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Crag",
                id: image.crag_id,
            })?;
    }

    let outcome = ClimbRepo::create_submission(&state.pool, user.user_id, &submission).await?;

    tracing::info!(
        user_id = %user.user_id,
        image_id = %outcome.image_id,
        climbs = outcome.climbs.len(),
        "Submission created",
    );

    if state.notifier.is_enabled() {
        match announcement(&state, &user, &outcome).await {
            Ok(routes) => state.notifier.notify_in_background(routes),
            Err(e) => tracing::warn!(error = %e, "Failed to build moderation notification"),
        }
    }

    let count = outcome.climbs.len();
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: SubmissionResponse {
                success: true,
                climbs_created: count,
                route_lines_created: count,
                image_id: outcome.image_id,
                climb_ids: outcome.climbs.iter().map(|c| c.id).collect(),
            },
        }),
    ))
}

/// Gather the image and region context moderators see with each route.
async fn announcement(
    state: &AppState,
    user: &AuthUser,
    outcome: &SubmissionOutcome,
) -> Result<Vec<SubmittedRoute>, sqlx::Error> {
    let image = ImageRepo::find_by_id(&state.pool, outcome.image_id).await?;

    let mut region = None;
    if let Some(crag_id) = image.as_ref().and_then(|i| i.crag_id) {
        if let Some(crag) = CragRepo::find_by_id(&state.pool, crag_id).await? {
            region = match crag.region_id {
                Some(region_id) => RegionRepo::find_by_id(&state.pool, region_id)
                    .await?
                    .map(|r| r.name),
                None => Some(crag.name),
            };
        }
    }

    Ok(outcome
        .climbs
        .iter()
        .map(|climb| SubmittedRoute {
            route_id: climb.id.to_string(),
            name: climb.name.clone(),
            grade: climb.grade.clone(),
            image_url: image.as_ref().map(|i| i.url.clone()),
            latitude: image.as_ref().and_then(|i| i.latitude),
            longitude: image.as_ref().and_then(|i| i.longitude),
            region: region.clone(),
            submitted_by: user.user_id.to_string(),
            submitted_by_email: user.email.clone(),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn day_starts_at_utc_midnight() {
        let now = Utc.with_ymd_and_hms(2026, 3, 15, 23, 59, 59).unwrap();
        assert_eq!(
            start_of_day(now),
            Utc.with_ymd_and_hms(2026, 3, 15, 0, 0, 0).unwrap()
        );
    }
}
