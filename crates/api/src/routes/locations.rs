use axum::routing::{get, post};
use axum::Router;

use crate::handlers::locations;
use crate::state::AppState;

/// Routes mounted at `/locations`.
///
/// ```text
/// GET    /search     -> search
/// GET    /reverse    -> reverse
/// POST   /detect     -> detect
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/search", get(locations::search))
        .route("/reverse", get(locations::reverse))
        .route("/detect", post(locations::detect))
}
