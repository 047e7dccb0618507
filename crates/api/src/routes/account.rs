//! Route definitions for the caller's profile and settings.

use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::{profile, settings};
use crate::state::AppState;

/// Account routes, merged at the `/api/v1` root. All require auth.
///
/// ```text
/// GET    /profile             -> profile::get
/// PUT    /profile             -> profile::update
/// GET    /settings            -> settings::get
/// PUT    /settings            -> settings::update
/// DELETE /settings/account    -> settings::delete_account
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/profile", get(profile::get).put(profile::update))
        .route("/settings", get(settings::get).put(settings::update))
        .route("/settings/account", delete(settings::delete_account))
}
