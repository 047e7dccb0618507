//! Repository for the `crag_reports` table.

use cragmap_core::types::DbId;
use sqlx::PgPool;

use crate::models::crag_report::CragReport;

/// Column list for `crag_reports` queries.
const COLUMNS: &str = "id, crag_id, reporter_id, reason, status, created_at";

/// Provides report creation for crags.
pub struct CragReportRepo;

impl CragReportRepo {
    /// Record a report and bump the crag's `report_count` in one transaction.
    ///
    /// Returns `None` when the crag does not exist.
    pub async fn create(
        pool: &PgPool,
        reporter_id: DbId,
        crag_id: DbId,
        reason: &str,
    ) -> Result<Option<CragReport>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let bumped: Option<(DbId,)> = sqlx::query_as(
            "UPDATE crags SET report_count = report_count + 1, updated_at = now() \
             WHERE id = $1 \
             RETURNING id",
        )
        .bind(crag_id)
        .fetch_optional(&mut *tx)
        .await?;

        if bumped.is_none() {
            return Ok(None);
        }

        let query = format!(
            "INSERT INTO crag_reports (crag_id, reporter_id, reason) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        let report = sqlx::query_as::<_, CragReport>(&query)
            .bind(crag_id)
            .bind(reporter_id)
            .bind(reason)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(report))
    }
}
