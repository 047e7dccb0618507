use axum::routing::post;
use axum::Router;

use crate::handlers::stripe;
use crate::state::AppState;

/// Routes mounted at `/stripe`.
///
/// ```text
/// POST   /checkout    -> checkout (auth)
/// POST   /webhook     -> webhook (signature)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/checkout", post(stripe::checkout))
        .route("/webhook", post(stripe::webhook))
}
