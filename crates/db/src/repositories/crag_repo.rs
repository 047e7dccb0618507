//! Repository for the `crags` table.

use cragmap_core::crags::escape_like;
use cragmap_core::types::DbId;
use sqlx::PgPool;

use crate::models::crag::{Crag, CragSummary, NearbyCrag, NewCrag};

/// Column list for `crags` queries.
const COLUMNS: &str = "\
    id, name, region_id, latitude, longitude, description, rock_type, \
    crag_type, report_count, is_flagged, created_by, created_at, updated_at";

/// Provides search, lookup and insert operations for crags.
pub struct CragRepo;

impl CragRepo {
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Crag>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM crags WHERE id = $1");
        sqlx::query_as::<_, Crag>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Case-insensitive substring search on the crag name.
    pub async fn search(
        pool: &PgPool,
        term: &str,
        limit: i64,
    ) -> Result<Vec<CragSummary>, sqlx::Error> {
        sqlx::query_as::<_, CragSummary>(
            "SELECT c.id, c.name, c.latitude, c.longitude, c.region_id, r.name AS region_name \
             FROM crags c \
             LEFT JOIN regions r ON r.id = c.region_id \
             WHERE c.name ILIKE $1 ESCAPE '\\' \
             ORDER BY c.name \
             LIMIT $2",
        )
        .bind(format!("%{}%", escape_like(term)))
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    /// Crags within `radius_km` of a point, nearest first.
    pub async fn find_near(
        pool: &PgPool,
        lat: f64,
        lng: f64,
        radius_km: f64,
    ) -> Result<Vec<NearbyCrag>, sqlx::Error> {
        sqlx::query_as::<_, NearbyCrag>("SELECT * FROM find_crags_near_location($1, $2, $3)")
            .bind(lat)
            .bind(lng)
            .bind(radius_km)
            .fetch_all(pool)
            .await
    }

    /// Crags in a region whose name matches exactly, ignoring case.
    pub async fn find_by_name_in_region(
        pool: &PgPool,
        name: &str,
        region_id: DbId,
    ) -> Result<Vec<Crag>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM crags \
             WHERE lower(name) = lower($1) AND region_id = $2"
        );
        sqlx::query_as::<_, Crag>(&query)
            .bind(name)
            .bind(region_id)
            .fetch_all(pool)
            .await
    }

    /// A crag sitting at exactly these coordinates, if any.
    pub async fn find_at_coordinates(
        pool: &PgPool,
        lat: f64,
        lng: f64,
    ) -> Result<Option<Crag>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM crags \
             WHERE latitude = $1 AND longitude = $2 \
             LIMIT 1"
        );
        sqlx::query_as::<_, Crag>(&query)
            .bind(lat)
            .bind(lng)
            .fetch_optional(pool)
            .await
    }

    pub async fn create(
        pool: &PgPool,
        created_by: DbId,
        input: &NewCrag,
    ) -> Result<Crag, sqlx::Error> {
        let query = format!(
            "INSERT INTO crags \
                (name, latitude, longitude, region_id, description, rock_type, crag_type, created_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Crag>(&query)
            .bind(&input.name)
            .bind(input.latitude)
            .bind(input.longitude)
            .bind(input.region_id)
            .bind(&input.description)
            .bind(&input.rock_type)
            .bind(input.crag_type.as_str())
            .bind(created_by)
            .fetch_one(pool)
            .await
    }
}
