//! Handlers for the `/regions` resource.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use cragmap_core::crags::{normalize_country_code, require_name, search_term};
use cragmap_core::geo::{parse_coordinates, validate_coordinates};
use cragmap_db::models::region::{CreateRegion, NearestRegion, Region};
use cragmap_db::repositories::{ProfileRepo, RegionRepo};

use crate::error::{unique_violation, AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::{CoordinateParams, SearchParams};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/regions?q=
///
/// Terms shorter than two characters are ignored and every region is listed.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<DataResponse<Vec<Region>>>> {
    let term = search_term(params.q.as_deref());
    let regions = RegionRepo::list(&state.pool, term.as_deref()).await?;
    Ok(Json(DataResponse { data: regions }))
}

/// POST /api/v1/regions
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreateRegion>,
) -> AppResult<(StatusCode, Json<DataResponse<Region>>)> {
    let name = require_name(input.name.as_deref(), "Region name")?;
    let country_code = normalize_country_code(input.country_code.as_deref());
    if let (Some(lat), Some(lng)) = (input.center_lat, input.center_lon) {
        validate_coordinates(lat, lng)?;
    }

    if let Some(existing) = RegionRepo::find_by_name(&state.pool, &name).await? {
        return Err(duplicate_region(&name, existing));
    }

    ProfileRepo::find_or_create(&state.pool, user.user_id).await?;

    let region = match RegionRepo::create(
        &state.pool,
        &name,
        country_code.as_deref(),
        input.center_lat,
        input.center_lon,
    )
    .await
    {
        Ok(region) => region,
        // Lost a race with a concurrent insert of the same name.
        Err(err) if unique_violation(&err) == Some("uq_regions_name_lower") => {
            match RegionRepo::find_by_name(&state.pool, &name).await? {
                Some(existing) => return Err(duplicate_region(&name, existing)),
                None => return Err(err.into()),
            }
        }
        Err(err) => return Err(err.into()),
    };

    tracing::info!(
        region_id = %region.id,
        name = %region.name,
        user_id = %user.user_id,
        "Region created",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: region })))
}

fn duplicate_region(name: &str, existing: Region) -> AppError {
    AppError::Duplicate {
        message: format!("Region \"{name}\" already exists"),
        existing_id: existing.id,
        existing_name: existing.name,
    }
}

/// GET /api/v1/regions/by-location?lat=&lng=
pub async fn by_location(
    State(state): State<AppState>,
    Query(params): Query<CoordinateParams>,
) -> AppResult<Json<DataResponse<NearestRegion>>> {
    let (lat, lng) = parse_coordinates(params.lat.as_deref(), params.lng.as_deref())?;
    let region = RegionRepo::find_by_location(&state.pool, lat, lng)
        .await?
        .ok_or_else(|| AppError::NotFound("No region found for this location".into()))?;
    Ok(Json(DataResponse { data: region }))
}
