pub mod account;
pub mod admin;
pub mod catalog;
pub mod health;
pub mod locations;
pub mod logbook;
pub mod stripe;

use axum::routing::post;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /regions                                    list (public), create (auth)
/// /regions/by-location                        nearest region (public)
///
/// /crags                                      create (auth)
/// /crags/search                               name search (public)
/// /crags/by-location                          nearby crags (public)
/// /crags/check-tag                            duplicate check, GET or POST (public)
/// /crags/report                               report a crag (auth)
///
/// /images/search                              images with route counts (public)
/// /climbs/{id}                                climb with route lines
/// /submissions                                submit routes (auth)
///
/// /log-routes                                 log climbs (auth)
/// /logs                                       own logbook (auth)
/// /logs/stats                                 logbook statistics (auth)
/// /logs/{id}                                  delete a log (auth)
///
/// /profile                                    get, update (auth)
/// /settings                                   get, update (auth)
/// /settings/account                           delete account (auth)
///
/// /leaderboard                                ranked climbers (public)
///
/// /locations/search                           forward geocode (public)
/// /locations/reverse                          reverse geocode (public)
/// /locations/detect                           country/region/town (public)
///
/// /stripe/checkout                            start subscription (auth)
/// /stripe/webhook                             payment events (signed)
///
/// /admin/climbs/pending                       moderation queue (admin)
/// /admin/climbs/{id}/approve                  approve (admin)
/// /admin/climbs/{id}/reject                   reject (admin)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(catalog::router())
        .merge(account::router())
        .route("/log-routes", post(handlers::logs::log_routes))
        .nest("/logs", logbook::router())
        .nest("/locations", locations::router())
        .nest("/stripe", stripe::router())
        .nest("/admin", admin::router())
}
