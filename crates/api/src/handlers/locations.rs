//! Geocoding proxy handlers (`/locations`).

use axum::extract::{Query, State};
use axum::Json;
use cragmap_core::crags::MIN_SEARCH_QUERY_LEN;
use cragmap_core::geo::{parse_coordinates, validate_coordinates};
use serde::{Deserialize, Serialize};

use crate::clients::geocoding::{DetectedLocation, GeocodeResult, ReverseGeocode};
use crate::error::{AppError, AppResult};
use crate::query::{CoordinateParams, SearchParams};
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SearchResults {
    pub results: Vec<GeocodeResult>,
}

/// GET /api/v1/locations/search?q=
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<DataResponse<SearchResults>>> {
    let query = params.q.as_deref().map(str::trim).unwrap_or_default();
    if query.chars().count() < MIN_SEARCH_QUERY_LEN {
        return Err(AppError::BadRequest(
            "Query must be at least 2 characters".into(),
        ));
    }

    let results = state.geocoder.search(query).await?;
    Ok(Json(DataResponse {
        data: SearchResults { results },
    }))
}

/// GET /api/v1/locations/reverse?lat=&lng=
pub async fn reverse(
    State(state): State<AppState>,
    Query(params): Query<CoordinateParams>,
) -> AppResult<Json<DataResponse<ReverseGeocode>>> {
    let (lat, lng) = parse_coordinates(params.lat.as_deref(), params.lng.as_deref())?;
    let place = state.geocoder.reverse(lat, lng).await?;
    Ok(Json(DataResponse { data: place }))
}

#[derive(Debug, Deserialize)]
pub struct DetectRequest {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// POST /api/v1/locations/detect
pub async fn detect(
    State(state): State<AppState>,
    Json(input): Json<DetectRequest>,
) -> AppResult<Json<DataResponse<DetectedLocation>>> {
    let (Some(lat), Some(lng)) = (input.latitude, input.longitude) else {
        return Err(AppError::BadRequest(
            "latitude and longitude are required".into(),
        ));
    };
    validate_coordinates(lat, lng)?;

    let detected = state.geocoder.detect(lat, lng).await?;
    Ok(Json(DataResponse { data: detected }))
}
