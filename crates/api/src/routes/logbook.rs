use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::logs;
use crate::state::AppState;

/// Routes mounted at `/logs`. `POST /log-routes` is attached in [`super::api_routes`].
///
/// ```text
/// GET    /          -> list
/// GET    /stats     -> stats
/// DELETE /{id}      -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(logs::list))
        .route("/stats", get(logs::stats))
        .route("/{id}", delete(logs::delete))
}
