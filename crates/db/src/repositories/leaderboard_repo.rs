//! Repository wrapping the `get_leaderboard` stored procedure.

use sqlx::PgPool;

use crate::models::leaderboard::LeaderboardRow;

pub struct LeaderboardRepo;

impl LeaderboardRepo {
    /// One page of the leaderboard, best first. Every row carries the
    /// filtered population size in `total_users`.
    pub async fn fetch(
        pool: &PgPool,
        gender: Option<&str>,
        country: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<LeaderboardRow>, sqlx::Error> {
        sqlx::query_as::<_, LeaderboardRow>("SELECT * FROM get_leaderboard($1, $2, $3, $4)")
            .bind(gender)
            .bind(country)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Size of the filtered population, for pages past the end.
    pub async fn count(
        pool: &PgPool,
        gender: Option<&str>,
        country: Option<&str>,
    ) -> Result<i64, sqlx::Error> {
        let row: Option<(i64,)> =
            sqlx::query_as("SELECT total_users FROM get_leaderboard($1, $2, 1::BIGINT, 0::BIGINT)")
                .bind(gender)
                .bind(country)
                .fetch_optional(pool)
                .await?;
        Ok(row.map_or(0, |(total,)| total))
    }
}
