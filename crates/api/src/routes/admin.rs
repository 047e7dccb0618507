use axum::routing::{get, post};
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted at `/admin`. Every handler requires the admin role.
///
/// ```text
/// GET    /climbs/pending          -> list_pending
/// POST   /climbs/{id}/approve     -> approve
/// POST   /climbs/{id}/reject      -> reject
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/climbs/pending", get(admin::list_pending))
        .route("/climbs/{id}/approve", post(admin::approve))
        .route("/climbs/{id}/reject", post(admin::reject))
}
