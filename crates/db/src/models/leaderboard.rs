//! Leaderboard rows.

use cragmap_core::types::DbId;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row returned by `get_leaderboard`.
#[derive(Debug, Clone, FromRow)]
pub struct LeaderboardRow {
    pub user_id: DbId,
    pub username: Option<String>,
    pub avatar_url: Option<String>,
    pub country: Option<String>,
    pub gender: Option<String>,
    pub avg_points: f64,
    pub climb_count: i64,
    pub total_users: i64,
}

/// A ranked leaderboard entry.
#[derive(Debug, Clone, Serialize)]
pub struct LeaderboardEntry {
    pub rank: i64,
    pub user_id: DbId,
    pub username: Option<String>,
    pub avatar_url: Option<String>,
    pub country: Option<String>,
    pub gender: Option<String>,
    pub avg_points: f64,
    pub avg_grade: &'static str,
    pub climb_count: i64,
}

/// Query parameters for the leaderboard.
#[derive(Debug, Deserialize)]
pub struct LeaderboardParams {
    pub gender: Option<String>,
    pub country: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}
