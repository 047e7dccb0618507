//! Route line entity model.

use cragmap_core::submission::RoutePoint;
use cragmap_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::types::Json;
use sqlx::FromRow;

/// A row from the `route_lines` table. `points` is stored as JSONB.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RouteLine {
    pub id: DbId,
    pub image_id: DbId,
    pub climb_id: DbId,
    pub points: Json<Vec<RoutePoint>>,
    pub color: String,
    pub sequence_order: i32,
    pub created_at: Timestamp,
}
