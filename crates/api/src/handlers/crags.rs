//! Handlers for the `/crags` resource: search, proximity lookups, duplicate
//! checks, creation and user reports.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use cragmap_core::crags::{normalize_country_code, require_name, search_term, CRAG_SEARCH_LIMIT};
use cragmap_core::error::CoreError;
use cragmap_core::geo::{
    approx_distance_meters, parse_coordinates, validate_coordinates,
    DEFAULT_SEARCH_RADIUS_KM, DUPLICATE_CRAG_RADIUS_METERS,
};
use cragmap_core::moderation::validate_report_reason;
use cragmap_core::types::DbId;
use cragmap_db::models::crag::{
    CheckTagParams, CreateCrag, Crag, CragSummary, NearbyCrag, NewCrag,
};
use cragmap_db::models::crag_report::{CragReport, CreateCragReport};
use cragmap_db::repositories::{CragReportRepo, CragRepo, ProfileRepo, RegionRepo};
use serde::{Deserialize, Serialize};

use crate::error::{unique_violation, AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::SearchParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Largest accepted `radius_km` for proximity lookups.
const MAX_SEARCH_RADIUS_KM: f64 = 500.0;

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

/// GET /api/v1/crags/search?q=
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<DataResponse<Vec<CragSummary>>>> {
    let Some(term) = search_term(params.q.as_deref()) else {
        return Ok(Json(DataResponse { data: Vec::new() }));
    };
    let crags = CragRepo::search(&state.pool, &term, CRAG_SEARCH_LIMIT).await?;
    Ok(Json(DataResponse { data: crags }))
}

#[derive(Debug, Deserialize)]
pub struct NearbyParams {
    pub lat: Option<String>,
    pub lng: Option<String>,
    pub radius_km: Option<String>,
}

/// GET /api/v1/crags/by-location?lat=&lng=&radius_km=10
pub async fn by_location(
    State(state): State<AppState>,
    Query(params): Query<NearbyParams>,
) -> AppResult<Json<DataResponse<Vec<NearbyCrag>>>> {
    let (lat, lng) = parse_coordinates(params.lat.as_deref(), params.lng.as_deref())?;
    let radius_km = parse_radius(params.radius_km.as_deref())?;
    let crags = CragRepo::find_near(&state.pool, lat, lng, radius_km).await?;
    Ok(Json(DataResponse { data: crags }))
}

fn parse_radius(raw: Option<&str>) -> Result<f64, CoreError> {
    let Some(raw) = raw.map(str::trim).filter(|r| !r.is_empty()) else {
        return Ok(DEFAULT_SEARCH_RADIUS_KM);
    };
    match raw.parse::<f64>() {
        Ok(r) if r.is_finite() && r > 0.0 && r <= MAX_SEARCH_RADIUS_KM => Ok(r),
        _ => Err(CoreError::Validation(format!(
            "radius_km must be a number between 0 and {MAX_SEARCH_RADIUS_KM}"
        ))),
    }
}

// ---------------------------------------------------------------------------
// Duplicate check
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct MatchedCrag {
    pub id: DbId,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub rock_type: Option<String>,
    pub crag_type: String,
    pub distance_meters: i64,
}

/// Result of a duplicate check. `crag` and `message` are only present on a match.
#[derive(Debug, Serialize)]
pub struct CheckTagResult {
    pub exists: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crag: Option<MatchedCrag>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// GET /api/v1/crags/check-tag?name=&region_id=&lat=&lng=
pub async fn check_tag_query(
    State(state): State<AppState>,
    Query(params): Query<CheckTagParams>,
) -> AppResult<Json<DataResponse<CheckTagResult>>> {
    check_tag(&state, params).await
}

/// POST /api/v1/crags/check-tag
pub async fn check_tag_body(
    State(state): State<AppState>,
    Json(params): Json<CheckTagParams>,
) -> AppResult<Json<DataResponse<CheckTagResult>>> {
    check_tag(&state, params).await
}

async fn check_tag(
    state: &AppState,
    params: CheckTagParams,
) -> AppResult<Json<DataResponse<CheckTagResult>>> {
    let name = params.name.as_deref().map(str::trim).filter(|n| !n.is_empty());
    let (Some(name), Some(region_id), Some(lat), Some(lng)) =
        (name, params.region_id, params.lat, params.lng)
    else {
        return Err(AppError::BadRequest(
            "name, region_id, lat, and lng parameters are required".into(),
        ));
    };
    validate_coordinates(lat, lng)?;

    let candidates = CragRepo::find_by_name_in_region(&state.pool, name, region_id).await?;
    Ok(Json(DataResponse {
        data: nearest_match(&candidates, lat, lng),
    }))
}

/// First candidate strictly closer than the duplicate radius, measured from the query point.
fn nearest_match(candidates: &[Crag], lat: f64, lng: f64) -> CheckTagResult {
    let hit = candidates.iter().find_map(|crag| {
        let distance = approx_distance_meters(lat, lng, crag.latitude, crag.longitude);
        (distance < DUPLICATE_CRAG_RADIUS_METERS).then_some((crag, distance))
    });

    match hit {
        Some((crag, distance)) => {
            let meters = distance.round() as i64;
            CheckTagResult {
                exists: true,
                message: Some(format!("Crag \"{}\" exists {meters}m away", crag.name)),
                crag: Some(MatchedCrag {
                    id: crag.id,
                    name: crag.name.clone(),
                    latitude: crag.latitude,
                    longitude: crag.longitude,
                    rock_type: crag.rock_type.clone(),
                    crag_type: crag.crag_type.clone(),
                    distance_meters: meters,
                }),
            }
        }
        None => CheckTagResult {
            exists: false,
            crag: None,
            message: None,
        },
    }
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

/// POST /api/v1/crags
///
/// The region is taken from `region_id` when given; otherwise `region_name`
/// is looked up case-insensitively and created when missing.
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreateCrag>,
) -> AppResult<(StatusCode, Json<DataResponse<Crag>>)> {
    let name = require_name(input.name.as_deref(), "Name")?;
    let (Some(latitude), Some(longitude)) = (input.latitude, input.longitude) else {
        return Err(AppError::BadRequest(
            "Name, latitude, and longitude are required".into(),
        ));
    };
    validate_coordinates(latitude, longitude)?;

    ProfileRepo::find_or_create(&state.pool, user.user_id).await?;

    let region_id = match input.region_id {
        Some(id) => {
            RegionRepo::find_by_id(&state.pool, id)
                .await?
                .ok_or(CoreError::NotFound { entity: "Region", id })?;
            Some(id)
        }
        None => match input.region_name.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
            Some(region_name) => Some(
                resolve_region(&state, region_name, input.country_code.as_deref()).await?,
            ),
            None => None,
        },
    };

    if let Some(existing) = CragRepo::find_at_coordinates(&state.pool, latitude, longitude).await? {
        return Err(AppError::Duplicate {
            message: format!(
                "A crag already exists at these coordinates: \"{}\"",
                existing.name
            ),
            existing_id: existing.id,
            existing_name: existing.name,
        });
    }

    let new_crag = NewCrag {
        name,
        latitude,
        longitude,
        region_id,
        description: non_empty(input.description),
        rock_type: non_empty(input.rock_type),
        crag_type: input.crag_type,
    };
    let crag = CragRepo::create(&state.pool, user.user_id, &new_crag).await?;

    tracing::info!(
        crag_id = %crag.id,
        name = %crag.name,
        crag_type = new_crag.crag_type.as_str(),
        user_id = %user.user_id,
        "Crag created",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: crag })))
}

/// Find a region by name, creating it when it does not exist yet.
async fn resolve_region(
    state: &AppState,
    name: &str,
    country_code: Option<&str>,
) -> AppResult<DbId> {
    if let Some(region) = RegionRepo::find_by_name(&state.pool, name).await? {
        return Ok(region.id);
    }

    let country_code = normalize_country_code(country_code);
    match RegionRepo::create(&state.pool, name, country_code.as_deref(), None, None).await {
        Ok(region) => {
            tracing::info!(region_id = %region.id, name = %region.name, "Region created for crag");
            Ok(region.id)
        }
        Err(err) if unique_violation(&err) == Some("uq_regions_name_lower") => {
            RegionRepo::find_by_name(&state.pool, name)
                .await?
                .map(|r| r.id)
                .ok_or_else(|| err.into())
        }
        Err(err) => Err(err.into()),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

/// POST /api/v1/crags/report
pub async fn report(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreateCragReport>,
) -> AppResult<(StatusCode, Json<DataResponse<CragReport>>)> {
    let Some(crag_id) = input.crag_id else {
        return Err(AppError::BadRequest("Crag ID and reason are required".into()));
    };
    let reason = validate_report_reason(input.reason.as_deref().unwrap_or_default())?;

    ProfileRepo::find_or_create(&state.pool, user.user_id).await?;

    let report = CragReportRepo::create(&state.pool, user.user_id, crag_id, &reason)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Crag",
            id: crag_id,
        })?;

    tracing::info!(
        report_id = %report.id,
        crag_id = %crag_id,
        user_id = %user.user_id,
        "Crag reported",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: report })))
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn crag(name: &str, latitude: f64, longitude: f64) -> Crag {
        Crag {
            id: DbId::new_v4(),
            name: name.into(),
            region_id: None,
            latitude,
            longitude,
            description: None,
            rock_type: Some("granite".into()),
            crag_type: "boulder".into(),
            report_count: 0,
            is_flagged: false,
            created_by: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn match_within_radius_reports_rounded_distance() {
        // 0.001 degrees of latitude is roughly 111 m.
        let candidates = [crag("Bas Cuvier", 48.001, 2.0)];
        let result = nearest_match(&candidates, 48.0, 2.0);
        assert!(result.exists);
        let matched = result.crag.unwrap();
        assert_eq!(matched.distance_meters, 111);
        assert_eq!(result.message.unwrap(), "Crag \"Bas Cuvier\" exists 111m away");
    }

    #[test]
    fn far_candidates_do_not_match() {
        let candidates = [crag("Bas Cuvier", 48.01, 2.0)];
        let result = nearest_match(&candidates, 48.0, 2.0);
        assert!(!result.exists);
        assert!(result.crag.is_none());
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json, serde_json::json!({ "exists": false }));
    }

    #[test]
    fn radius_defaults_and_bounds() {
        assert_eq!(parse_radius(None).unwrap(), DEFAULT_SEARCH_RADIUS_KM);
        assert_eq!(parse_radius(Some("25")).unwrap(), 25.0);
        assert!(parse_radius(Some("0")).is_err());
        assert!(parse_radius(Some("far")).is_err());
        assert!(parse_radius(Some("10000")).is_err());
    }
}
