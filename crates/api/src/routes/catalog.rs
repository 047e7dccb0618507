//! Route definitions for the shared climbing catalogue: regions, crags,
//! images, climbs, submissions and the leaderboard.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{climbs, crags, images, leaderboard, regions, submissions};
use crate::state::AppState;

/// Catalogue routes, merged at the `/api/v1` root.
///
/// ```text
/// GET    /regions                  -> regions::list
/// POST   /regions                  -> regions::create
/// GET    /regions/by-location      -> regions::by_location
///
/// POST   /crags                    -> crags::create
/// GET    /crags/search             -> crags::search
/// GET    /crags/by-location        -> crags::by_location
/// GET    /crags/check-tag          -> crags::check_tag_query
/// POST   /crags/check-tag          -> crags::check_tag_body
/// POST   /crags/report             -> crags::report
///
/// GET    /images/search            -> images::search
/// GET    /climbs/{id}              -> climbs::get_by_id
/// POST   /submissions              -> submissions::create
/// GET    /leaderboard              -> leaderboard::get
/// ```
pub fn router() -> Router<AppState> {
    let region_routes = Router::new()
        .route("/", get(regions::list).post(regions::create))
        .route("/by-location", get(regions::by_location));

    let crag_routes = Router::new()
        .route("/", post(crags::create))
        .route("/search", get(crags::search))
        .route("/by-location", get(crags::by_location))
        .route(
            "/check-tag",
            get(crags::check_tag_query).post(crags::check_tag_body),
        )
        .route("/report", post(crags::report));

    Router::new()
        .nest("/regions", region_routes)
        .nest("/crags", crag_routes)
        .route("/images/search", get(images::search))
        .route("/climbs/{id}", get(climbs::get_by_id))
        .route("/submissions", post(submissions::create))
        .route("/leaderboard", get(leaderboard::get))
}
