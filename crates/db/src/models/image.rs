//! Image entity model and DTOs.

use chrono::NaiveDate;
use cragmap_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `images` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Image {
    pub id: DbId,
    pub url: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub capture_date: Option<NaiveDate>,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub crag_id: Option<DbId>,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
}

/// Image with the number of route lines drawn on it.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ImageWithRouteCount {
    pub id: DbId,
    pub url: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub capture_date: Option<NaiveDate>,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub crag_id: Option<DbId>,
    pub created_at: Timestamp,
    pub route_count: i64,
}

/// Query parameters for image search.
#[derive(Debug, Deserialize)]
pub struct ImageSearchParams {
    pub crag_id: Option<DbId>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
