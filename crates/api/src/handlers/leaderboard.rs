//! Handler for the public leaderboard.

use axum::extract::{Query, State};
use axum::Json;
use cragmap_core::grades::grade_from_points;
use cragmap_core::leaderboard::{country_filter, GenderFilter, PageRequest, Pagination};
use cragmap_db::models::leaderboard::{LeaderboardEntry, LeaderboardParams, LeaderboardRow};
use cragmap_db::repositories::LeaderboardRepo;
use serde::Serialize;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct LeaderboardPage {
    pub leaderboard: Vec<LeaderboardEntry>,
    pub pagination: Pagination,
}

/// GET /api/v1/leaderboard?gender=&country=&page=&limit=
pub async fn get(
    State(state): State<AppState>,
    Query(params): Query<LeaderboardParams>,
) -> AppResult<Json<DataResponse<LeaderboardPage>>> {
    let gender = GenderFilter::parse(params.gender.as_deref())?;
    let country = country_filter(params.country.as_deref());
    let page = PageRequest::new(params.page, params.limit);

    let rows = LeaderboardRepo::fetch(
        &state.pool,
        gender.as_db_param(),
        country.as_deref(),
        page.limit,
        page.offset(),
    )
    .await?;

    // The window total rides along on every row; past the last page there are none.
    let total = match rows.first() {
        Some(row) => row.total_users,
        None if page.page > 1 => {
            LeaderboardRepo::count(&state.pool, gender.as_db_param(), country.as_deref()).await?
        }
        None => 0,
    };

    Ok(Json(DataResponse {
        data: LeaderboardPage {
            leaderboard: rank_rows(rows, &page),
            pagination: page.summary(total),
        },
    }))
}

fn rank_rows(rows: Vec<LeaderboardRow>, page: &PageRequest) -> Vec<LeaderboardEntry> {
    rows.into_iter()
        .enumerate()
        .map(|(i, row)| LeaderboardEntry {
            rank: page.rank(i),
            user_id: row.user_id,
            username: row.username,
            avatar_url: row.avatar_url,
            country: row.country,
            gender: row.gender,
            avg_points: row.avg_points,
            avg_grade: grade_from_points(row.avg_points),
            climb_count: row.climb_count,
        })
        .collect()
}
