//! Crag report entity model and DTOs.

use cragmap_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `crag_reports` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CragReport {
    pub id: DbId,
    pub crag_id: DbId,
    pub reporter_id: Option<DbId>,
    pub reason: String,
    pub status: String,
    pub created_at: Timestamp,
}

/// DTO for reporting a crag.
#[derive(Debug, Deserialize)]
pub struct CreateCragReport {
    pub crag_id: Option<DbId>,
    pub reason: Option<String>,
}
