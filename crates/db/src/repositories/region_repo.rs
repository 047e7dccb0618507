//! Repository for the `regions` table.

use cragmap_core::crags::escape_like;
use cragmap_core::types::DbId;
use sqlx::PgPool;

use crate::models::region::{NearestRegion, Region};

/// Column list for `regions` queries.
const COLUMNS: &str = "id, name, country_code, center_lat, center_lon, created_at";

/// Provides lookups and inserts for regions.
pub struct RegionRepo;

impl RegionRepo {
    /// List regions ordered by name, optionally filtered by a
    /// case-insensitive substring.
    pub async fn list(pool: &PgPool, search: Option<&str>) -> Result<Vec<Region>, sqlx::Error> {
        match search {
            Some(term) => {
                let query = format!(
                    "SELECT {COLUMNS} FROM regions \
                     WHERE name ILIKE $1 ESCAPE '\\' \
                     ORDER BY name"
                );
                sqlx::query_as::<_, Region>(&query)
                    .bind(format!("%{}%", escape_like(term)))
                    .fetch_all(pool)
                    .await
            }
            None => {
                let query = format!("SELECT {COLUMNS} FROM regions ORDER BY name");
                sqlx::query_as::<_, Region>(&query).fetch_all(pool).await
            }
        }
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Region>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM regions WHERE id = $1");
        sqlx::query_as::<_, Region>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a region by exact name, ignoring case.
    pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<Region>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM regions WHERE lower(name) = lower($1)");
        sqlx::query_as::<_, Region>(&query)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// Insert a region. Fails with a `uq_regions_name_lower` violation if
    /// the name already exists in any casing.
    pub async fn create(
        pool: &PgPool,
        name: &str,
        country_code: Option<&str>,
        center_lat: Option<f64>,
        center_lon: Option<f64>,
    ) -> Result<Region, sqlx::Error> {
        let query = format!(
            "INSERT INTO regions (name, country_code, center_lat, center_lon) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Region>(&query)
            .bind(name)
            .bind(country_code)
            .bind(center_lat)
            .bind(center_lon)
            .fetch_one(pool)
            .await
    }

    /// Find the region whose centre is nearest to a point.
    pub async fn find_by_location(
        pool: &PgPool,
        lat: f64,
        lng: f64,
    ) -> Result<Option<NearestRegion>, sqlx::Error> {
        sqlx::query_as::<_, NearestRegion>("SELECT * FROM find_region_by_location($1, $2)")
            .bind(lat)
            .bind(lng)
            .fetch_optional(pool)
            .await
    }
}
