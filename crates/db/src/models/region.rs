//! Region entity model and DTOs.

use cragmap_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `regions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Region {
    pub id: DbId,
    pub name: String,
    pub country_code: Option<String>,
    pub center_lat: Option<f64>,
    pub center_lon: Option<f64>,
    pub created_at: Timestamp,
}

/// DTO for creating a region.
#[derive(Debug, Deserialize)]
pub struct CreateRegion {
    pub name: Option<String>,
    pub country_code: Option<String>,
    pub center_lat: Option<f64>,
    pub center_lon: Option<f64>,
}

/// A row returned by `find_region_by_location`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct NearestRegion {
    pub id: DbId,
    pub name: String,
    pub country_code: Option<String>,
    pub center_lat: Option<f64>,
    pub center_lon: Option<f64>,
    pub distance_km: f64,
}
