//! Crag entity model and DTOs.

use cragmap_core::crags::CragType;
use cragmap_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `crags` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Crag {
    pub id: DbId,
    pub name: String,
    pub region_id: Option<DbId>,
    pub latitude: f64,
    pub longitude: f64,
    pub description: Option<String>,
    pub rock_type: Option<String>,
    pub crag_type: String,
    pub report_count: i32,
    pub is_flagged: bool,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Crag joined with its region name, as returned by name search.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CragSummary {
    pub id: DbId,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub region_id: Option<DbId>,
    pub region_name: Option<String>,
}

/// A row returned by `find_crags_near_location`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct NearbyCrag {
    pub id: DbId,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub region_id: Option<DbId>,
    pub region_name: Option<String>,
    pub distance_km: f64,
}

/// DTO for creating a crag. The region is given either by id or by name.
#[derive(Debug, Deserialize)]
pub struct CreateCrag {
    pub name: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub region_id: Option<DbId>,
    pub region_name: Option<String>,
    pub country_code: Option<String>,
    pub description: Option<String>,
    pub rock_type: Option<String>,
    #[serde(default)]
    pub crag_type: CragType,
}

/// Validated insert values for a crag.
#[derive(Debug, Clone)]
pub struct NewCrag {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub region_id: Option<DbId>,
    pub description: Option<String>,
    pub rock_type: Option<String>,
    pub crag_type: CragType,
}

/// Parameters of a duplicate-name check.
#[derive(Debug, Deserialize)]
pub struct CheckTagParams {
    pub name: Option<String>,
    pub region_id: Option<DbId>,
    #[serde(alias = "latitude")]
    pub lat: Option<f64>,
    #[serde(alias = "longitude")]
    pub lng: Option<f64>,
}
