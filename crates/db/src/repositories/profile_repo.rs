//! Repository for the `profiles` table.

use cragmap_core::payments::{SUBSCRIPTION_ACTIVE, SUBSCRIPTION_CANCELED};
use cragmap_core::types::DbId;
use sqlx::PgPool;

use crate::models::profile::{Profile, UpdateProfile, UpdateSettings};

/// Column list for `profiles` queries.
const COLUMNS: &str = "\
    id, username, first_name, last_name, gender, country, bio, avatar_url, \
    default_location, grade_system, units, theme, is_public, is_pro, \
    stripe_customer_id, subscription_status, created_at, updated_at";

/// Provides profile, settings and subscription operations.
pub struct ProfileRepo;

impl ProfileRepo {
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Profile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM profiles WHERE id = $1");
        sqlx::query_as::<_, Profile>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Return the user's profile, inserting an empty one on first access.
    pub async fn find_or_create(pool: &PgPool, id: DbId) -> Result<Profile, sqlx::Error> {
        sqlx::query("INSERT INTO profiles (id) VALUES ($1) ON CONFLICT (id) DO NOTHING")
            .bind(id)
            .execute(pool)
            .await?;
        let query = format!("SELECT {COLUMNS} FROM profiles WHERE id = $1");
        sqlx::query_as::<_, Profile>(&query)
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// Whether another user already holds `username` (case-insensitive).
    pub async fn username_taken(
        pool: &PgPool,
        username: &str,
        except_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let (taken,): (bool,) = sqlx::query_as(
            "SELECT EXISTS (SELECT 1 FROM profiles WHERE lower(username) = lower($1) AND id <> $2)",
        )
        .bind(username)
        .bind(except_id)
        .fetch_one(pool)
        .await?;
        Ok(taken)
    }

    /// Keep only the candidates nobody has claimed yet, preserving order.
    pub async fn filter_available(
        pool: &PgPool,
        candidates: &[String],
    ) -> Result<Vec<String>, sqlx::Error> {
        let taken: Vec<(String,)> = sqlx::query_as(
            "SELECT lower(username) FROM profiles WHERE lower(username) = ANY($1)",
        )
        .bind(
            candidates
                .iter()
                .map(|c| c.to_lowercase())
                .collect::<Vec<_>>(),
        )
        .fetch_all(pool)
        .await?;
        Ok(candidates
            .iter()
            .filter(|c| !taken.iter().any(|(t,)| *t == c.to_lowercase()))
            .cloned()
            .collect())
    }

    /// Update identity fields. The profile must already exist.
    pub async fn update_profile(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProfile,
    ) -> Result<Profile, sqlx::Error> {
        let query = format!(
            "UPDATE profiles SET \
                username = COALESCE($2, username), \
                first_name = COALESCE($3, first_name), \
                last_name = COALESCE($4, last_name), \
                updated_at = now() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Profile>(&query)
            .bind(id)
            .bind(&input.username)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .fetch_one(pool)
            .await
    }

    /// Update preferences. Empty strings clear nullable text fields.
    pub async fn update_settings(
        pool: &PgPool,
        id: DbId,
        input: &UpdateSettings,
    ) -> Result<Profile, sqlx::Error> {
        let query = format!(
            "UPDATE profiles SET \
                gender = CASE WHEN $2::text IS NULL THEN gender ELSE NULLIF($2, '') END, \
                country = CASE WHEN $3::text IS NULL THEN country ELSE NULLIF($3, '') END, \
                bio = CASE WHEN $4::text IS NULL THEN bio ELSE NULLIF($4, '') END, \
                avatar_url = CASE WHEN $5::text IS NULL THEN avatar_url ELSE NULLIF($5, '') END, \
                default_location = CASE WHEN $6::text IS NULL THEN default_location ELSE NULLIF($6, '') END, \
                grade_system = COALESCE($7, grade_system), \
                units = COALESCE($8, units), \
                theme = COALESCE($9, theme), \
                is_public = COALESCE($10, is_public), \
                updated_at = now() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Profile>(&query)
            .bind(id)
            .bind(&input.gender)
            .bind(&input.country)
            .bind(&input.bio)
            .bind(&input.avatar_url)
            .bind(&input.default_location)
            .bind(input.grade_system.map(|g| g.as_str()))
            .bind(input.units.map(|u| u.as_str()))
            .bind(input.theme.map(|t| t.as_str()))
            .bind(input.is_public)
            .fetch_one(pool)
            .await
    }

    /// Mark a user pro after a completed checkout. Returns rows affected.
    pub async fn activate_subscription(
        pool: &PgPool,
        id: DbId,
        customer_id: Option<&str>,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE profiles SET \
                stripe_customer_id = COALESCE($2, stripe_customer_id), \
                is_pro = TRUE, \
                subscription_status = $3, \
                updated_at = now() \
             WHERE id = $1",
        )
        .bind(id)
        .bind(customer_id)
        .bind(SUBSCRIPTION_ACTIVE)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Clear pro status for every profile linked to a payment customer.
    pub async fn deactivate_by_customer(
        pool: &PgPool,
        customer_id: &str,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE profiles SET \
                is_pro = FALSE, \
                subscription_status = $2, \
                updated_at = now() \
             WHERE stripe_customer_id = $1",
        )
        .bind(customer_id)
        .bind(SUBSCRIPTION_CANCELED)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Remove a user's data: logs are deleted, submitted climbs and crags
    /// are kept but detached, then the profile row is deleted.
    pub async fn delete_account(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM logs WHERE user_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("UPDATE climbs SET user_id = NULL WHERE user_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM profiles WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }
}
