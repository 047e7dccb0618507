//! Logbook entity model and DTOs.

use cragmap_core::stats::{LogStatus, LoggedAscent};
use cragmap_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `logs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Log {
    pub id: DbId,
    pub user_id: DbId,
    pub climb_id: DbId,
    pub status: String,
    pub created_at: Timestamp,
}

/// A log joined with its climb and crag.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LogWithClimb {
    pub id: DbId,
    pub climb_id: DbId,
    pub status: String,
    pub created_at: Timestamp,
    pub climb_name: Option<String>,
    pub grade: Option<String>,
    pub crag_name: Option<String>,
}

impl LogWithClimb {
    /// Convert to the statistics input. Rows with an unknown status are skipped.
    pub fn to_ascent(&self) -> Option<LoggedAscent> {
        let status = LogStatus::from_str_db(&self.status).ok()?;
        Some(LoggedAscent {
            log_id: self.id,
            climb_id: self.climb_id,
            climb_name: self.climb_name.clone(),
            grade: self.grade.clone(),
            status,
            created_at: self.created_at,
        })
    }
}

/// DTO for logging one or more climbs.
#[derive(Debug, Deserialize)]
pub struct CreateLogs {
    #[serde(default, alias = "climbIds")]
    pub climb_ids: Vec<DbId>,
    /// `flash`, `top` or `try`; defaults to `top`.
    pub status: Option<String>,
}
