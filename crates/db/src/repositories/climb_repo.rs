//! Repository for the `climbs` and `route_lines` tables.

use cragmap_core::moderation::ClimbStatus;
use cragmap_core::submission::{ImageTarget, ValidatedSubmission, DEFAULT_ROUTE_COLOR};
use cragmap_core::types::{DbId, Timestamp};
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::climb::{Climb, PendingClimb, SubmissionOutcome};
use crate::models::route_line::RouteLine;

/// Column list for `climbs` queries.
const COLUMNS: &str = "\
    id, name, grade, description, status, crag_id, image_id, user_id, \
    rejection_reason, approved_at, created_at";

/// Column list for `route_lines` queries.
const ROUTE_LINE_COLUMNS: &str = "\
    id, image_id, climb_id, points, color, sequence_order, created_at";

/// Provides submission, lookup and moderation operations for climbs.
pub struct ClimbRepo;

impl ClimbRepo {
    /// Number of climbs a user has submitted since `since`.
    pub async fn count_created_since(
        pool: &PgPool,
        user_id: DbId,
        since: Timestamp,
    ) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT count(*) FROM climbs WHERE user_id = $1 AND created_at >= $2")
                .bind(user_id)
                .bind(since)
                .fetch_one(pool)
                .await?;
        Ok(count)
    }

    /// Store a validated submission: the image (when new), one pending climb
    /// per route and its route line, all in one transaction.
    ///
    /// An existing image that cannot be found yields `RowNotFound`.
    pub async fn create_submission(
        pool: &PgPool,
        user_id: DbId,
        submission: &ValidatedSubmission,
    ) -> Result<SubmissionOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let (image_id, crag_id): (DbId, Option<DbId>) = match &submission.image {
            ImageTarget::New(image) => {
                sqlx::query_as(
                    "INSERT INTO images \
                        (url, latitude, longitude, capture_date, width, height, crag_id, created_by) \
                     VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
                     RETURNING id, crag_id",
                )
                .bind(&image.url)
                .bind(image.latitude)
                .bind(image.longitude)
                .bind(image.capture_date)
                .bind(image.width)
                .bind(image.height)
                .bind(image.crag_id)
                .bind(user_id)
                .fetch_one(&mut *tx)
                .await?
            }
            ImageTarget::Existing(id) => {
                sqlx::query_as("SELECT id, crag_id FROM images WHERE id = $1")
                    .bind(id)
                    .fetch_one(&mut *tx)
                    .await?
            }
        };

        let climb_query = format!(
            "INSERT INTO climbs (name, grade, description, status, crag_id, image_id, user_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {COLUMNS}"
        );

        let mut climbs = Vec::with_capacity(submission.routes.len());
        for route in &submission.routes {
            let climb = sqlx::query_as::<_, Climb>(&climb_query)
                .bind(&route.name)
                .bind(&route.grade)
                .bind(&route.description)
                .bind(ClimbStatus::Pending.as_str())
                .bind(crag_id)
                .bind(image_id)
                .bind(user_id)
                .fetch_one(&mut *tx)
                .await?;

            sqlx::query(
                "INSERT INTO route_lines (image_id, climb_id, points, color, sequence_order) \
                 VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(image_id)
            .bind(climb.id)
            .bind(Json(&route.points))
            .bind(DEFAULT_ROUTE_COLOR)
            .bind(route.sequence_order)
            .execute(&mut *tx)
            .await?;

            climbs.push(climb);
        }

        tx.commit().await?;
        Ok(SubmissionOutcome { image_id, climbs })
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Climb>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM climbs WHERE id = $1");
        sqlx::query_as::<_, Climb>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Route lines drawn for a climb, in sequence order.
    pub async fn route_lines(pool: &PgPool, climb_id: DbId) -> Result<Vec<RouteLine>, sqlx::Error> {
        let query = format!(
            "SELECT {ROUTE_LINE_COLUMNS} FROM route_lines \
             WHERE climb_id = $1 \
             ORDER BY sequence_order, created_at"
        );
        sqlx::query_as::<_, RouteLine>(&query)
            .bind(climb_id)
            .fetch_all(pool)
            .await
    }

    /// Crag name and image URL of a climb, for detail views.
    pub async fn context(
        pool: &PgPool,
        climb: &Climb,
    ) -> Result<(Option<String>, Option<String>), sqlx::Error> {
        sqlx::query_as(
            "SELECT (SELECT name FROM crags WHERE id = $1), \
                    (SELECT url FROM images WHERE id = $2)",
        )
        .bind(climb.crag_id)
        .bind(climb.image_id)
        .fetch_one(pool)
        .await
    }

    /// Pending climbs, oldest first.
    pub async fn list_pending(pool: &PgPool) -> Result<Vec<PendingClimb>, sqlx::Error> {
        sqlx::query_as::<_, PendingClimb>(
            "SELECT c.id, c.name, c.grade, c.description, c.crag_id, cr.name AS crag_name, \
                    c.image_id, i.url AS image_url, c.user_id, p.username, c.created_at \
             FROM climbs c \
             LEFT JOIN crags cr ON cr.id = c.crag_id \
             LEFT JOIN images i ON i.id = c.image_id \
             LEFT JOIN profiles p ON p.id = c.user_id \
             WHERE c.status = 'pending' \
             ORDER BY c.created_at ASC",
        )
        .fetch_all(pool)
        .await
    }

    /// Approve a pending climb. Returns `None` if the climb is missing or
    /// no longer pending.
    pub async fn approve(pool: &PgPool, id: DbId) -> Result<Option<Climb>, sqlx::Error> {
        let query = format!(
            "UPDATE climbs SET status = 'approved', approved_at = now(), rejection_reason = NULL \
             WHERE id = $1 AND status = 'pending' \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Climb>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Reject a pending climb. Returns `None` if the climb is missing or
    /// no longer pending.
    pub async fn reject(
        pool: &PgPool,
        id: DbId,
        reason: Option<&str>,
    ) -> Result<Option<Climb>, sqlx::Error> {
        let query = format!(
            "UPDATE climbs SET status = 'rejected', rejection_reason = $2 \
             WHERE id = $1 AND status = 'pending' \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Climb>(&query)
            .bind(id)
            .bind(reason)
            .fetch_optional(pool)
            .await
    }
}
