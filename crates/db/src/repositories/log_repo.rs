//! Repository for the `logs` table.

use cragmap_core::stats::LogStatus;
use cragmap_core::types::DbId;
use sqlx::PgPool;

use crate::models::log::{Log, LogWithClimb};

/// Column list for `logs` queries.
const COLUMNS: &str = "id, user_id, climb_id, status, created_at";

/// Provides logbook operations.
pub struct LogRepo;

impl LogRepo {
    /// Log several climbs at once. Re-logging a climb replaces its status
    /// and timestamp; repeated ids in `climb_ids` are logged once.
    pub async fn upsert_many(
        pool: &PgPool,
        user_id: DbId,
        climb_ids: &[DbId],
        status: LogStatus,
    ) -> Result<Vec<Log>, sqlx::Error> {
        let query = format!(
            "INSERT INTO logs (user_id, climb_id, status) \
             SELECT $1, climb_id, $3 \
             FROM (SELECT DISTINCT climb_id FROM UNNEST($2::uuid[]) AS t(climb_id)) AS ids \
             ON CONFLICT ON CONSTRAINT uq_logs_user_climb \
             DO UPDATE SET status = EXCLUDED.status, created_at = now() \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Log>(&query)
            .bind(user_id)
            .bind(climb_ids)
            .bind(status.as_str())
            .fetch_all(pool)
            .await
    }

    /// A user's logbook, newest first, joined with climb and crag names.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<LogWithClimb>, sqlx::Error> {
        sqlx::query_as::<_, LogWithClimb>(
            "SELECT l.id, l.climb_id, l.status, l.created_at, \
                    c.name AS climb_name, c.grade, cr.name AS crag_name \
             FROM logs l \
             LEFT JOIN climbs c ON c.id = l.climb_id \
             LEFT JOIN crags cr ON cr.id = c.crag_id \
             WHERE l.user_id = $1 \
             ORDER BY l.created_at DESC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// Delete one of the user's own logs. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, user_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM logs WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
