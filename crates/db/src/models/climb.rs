//! Climb entity model and DTOs.

use cragmap_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::route_line::RouteLine;

/// A row from the `climbs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Climb {
    pub id: DbId,
    pub name: String,
    pub grade: String,
    pub description: Option<String>,
    pub status: String,
    pub crag_id: Option<DbId>,
    pub image_id: Option<DbId>,
    pub user_id: Option<DbId>,
    pub rejection_reason: Option<String>,
    pub approved_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// A pending climb with the context a moderator needs.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PendingClimb {
    pub id: DbId,
    pub name: String,
    pub grade: String,
    pub description: Option<String>,
    pub crag_id: Option<DbId>,
    pub crag_name: Option<String>,
    pub image_id: Option<DbId>,
    pub image_url: Option<String>,
    pub user_id: Option<DbId>,
    pub username: Option<String>,
    pub created_at: Timestamp,
}

/// A climb with its image and route lines.
#[derive(Debug, Clone, Serialize)]
pub struct ClimbDetail {
    #[serde(flatten)]
    pub climb: Climb,
    pub crag_name: Option<String>,
    pub image_url: Option<String>,
    pub route_lines: Vec<RouteLine>,
}

/// Rows created by a route submission.
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionOutcome {
    pub image_id: DbId,
    pub climbs: Vec<Climb>,
}

/// DTO for rejecting a pending climb.
#[derive(Debug, Default, Deserialize)]
pub struct RejectClimb {
    pub reason: Option<String>,
}
