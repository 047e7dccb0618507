use cragmap_core::submission::DEFAULT_MAX_ROUTES_PER_DAY;

use crate::auth::jwt::JwtConfig;
use crate::clients::geocoding::GeocoderConfig;
use crate::clients::moderation::ModerationConfig;
use crate::clients::stripe::StripeConfig;

/// Server configuration loaded from environment variables.
///
/// All fields except the database URL and JWT secret have defaults suitable
/// for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Public URL of the web app, used for checkout redirects.
    pub public_site_url: String,
    /// Maximum routes one user may submit per UTC day (default: `5`).
    pub max_routes_per_day: i64,
    /// Settings for validating access tokens from the auth provider.
    pub jwt: JwtConfig,
    /// Nominatim endpoint and user agent.
    pub geocoder: GeocoderConfig,
    /// Payment provider keys. Individual keys may be absent.
    pub stripe: StripeConfig,
    /// Moderation worker; `None` disables notifications.
    pub moderation: Option<ModerationConfig>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:3000`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `PUBLIC_SITE_URL`      | `http://localhost:3000`    |
    /// | `MAX_ROUTES_PER_DAY`   | `5`                        |
    ///
    /// Sub-configurations document their own variables.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let public_site_url = std::env::var("PUBLIC_SITE_URL")
            .unwrap_or_else(|_| "http://localhost:3000".into())
            .trim_end_matches('/')
            .to_string();

        let max_routes_per_day: i64 = std::env::var("MAX_ROUTES_PER_DAY")
            .unwrap_or_else(|_| DEFAULT_MAX_ROUTES_PER_DAY.to_string())
            .parse()
            .expect("MAX_ROUTES_PER_DAY must be a valid i64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            public_site_url,
            max_routes_per_day,
            jwt: JwtConfig::from_env(),
            geocoder: GeocoderConfig::from_env(),
            stripe: StripeConfig::from_env(),
            moderation: ModerationConfig::from_env(),
        }
    }
}

/// Read an optional variable, treating empty values as unset.
pub(crate) fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
