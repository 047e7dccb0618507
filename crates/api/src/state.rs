use std::sync::Arc;

use crate::clients::geocoding::GeocodingClient;
use crate::clients::moderation::ModerationNotifier;
use crate::clients::stripe::StripeClient;
use crate::config::ServerConfig;

/// Shared application state available to all handlers via Axum's `State` extractor.
///
/// Must be `Clone` because Axum clones the state for each request.
/// Inner fields use `Arc` so cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: cragmap_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    pub geocoder: Arc<GeocodingClient>,
    pub stripe: Arc<StripeClient>,
    /// Moderation worker notifications (no-op when unconfigured).
    pub notifier: ModerationNotifier,
}

impl AppState {
    /// Build the state, sharing one outbound HTTP connection pool between clients.
    pub fn new(pool: cragmap_db::DbPool, config: ServerConfig) -> Self {
        let http = reqwest::Client::new();
        Self {
            pool,
            geocoder: Arc::new(GeocodingClient::new(http.clone(), config.geocoder.clone())),
            stripe: Arc::new(StripeClient::new(http.clone(), config.stripe.clone())),
            notifier: ModerationNotifier::new(http, config.moderation.clone()),
            config: Arc::new(config),
        }
    }
}
