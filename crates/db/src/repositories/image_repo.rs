//! Repository for the `images` table.

use cragmap_core::types::DbId;
use sqlx::PgPool;

use crate::models::image::{Image, ImageWithRouteCount};

/// Column list for `images` queries.
const COLUMNS: &str = "\
    id, url, latitude, longitude, capture_date, width, height, \
    crag_id, created_by, created_at";

/// Provides lookups for images.
pub struct ImageRepo;

impl ImageRepo {
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Image>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM images WHERE id = $1");
        sqlx::query_as::<_, Image>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Images newest first, optionally restricted to one crag, with the
    /// number of route lines drawn on each.
    pub async fn search(
        pool: &PgPool,
        crag_id: Option<DbId>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ImageWithRouteCount>, sqlx::Error> {
        sqlx::query_as::<_, ImageWithRouteCount>(
            "SELECT i.id, i.url, i.latitude, i.longitude, i.capture_date, i.width, i.height, \
                    i.crag_id, i.created_at, \
                    (SELECT count(*) FROM route_lines rl WHERE rl.image_id = i.id) AS route_count \
             FROM images i \
             WHERE ($1::uuid IS NULL OR i.crag_id = $1) \
             ORDER BY i.created_at DESC \
             LIMIT $2 OFFSET $3",
        )
        .bind(crag_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
    }
}
