//! Handlers for the `/images` resource.

use axum::extract::{Query, State};
use axum::Json;
use cragmap_db::models::image::{ImageSearchParams, ImageWithRouteCount};
use cragmap_db::repositories::ImageRepo;

use crate::error::AppResult;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

const DEFAULT_LIMIT: i64 = 20;
const MAX_LIMIT: i64 = 100;

/// GET /api/v1/images/search?crag_id=&limit=20&offset=0
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<ImageSearchParams>,
) -> AppResult<Json<DataResponse<Vec<ImageWithRouteCount>>>> {
    let (limit, offset) = PaginationParams {
        limit: params.limit,
        offset: params.offset,
    }
    .clamped(DEFAULT_LIMIT, MAX_LIMIT);

    let images = ImageRepo::search(&state.pool, params.crag_id, limit, offset).await?;
    Ok(Json(DataResponse { data: images }))
}
