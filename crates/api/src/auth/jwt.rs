//! Validation of HS256 access tokens issued by the external auth provider.
//!
//! This service never issues tokens; it only checks the signature, expiry
//! and audience of the bearer token the client already holds.

use cragmap_core::roles::{ROLE_ADMIN, ROLE_AUTHENTICATED};
use cragmap_core::types::DbId;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

/// Claims carried by the auth provider's access tokens.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject -- the user's id.
    pub sub: DbId,
    /// Audience, normally `"authenticated"`.
    pub aud: String,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    #[serde(default)]
    pub iat: Option<i64>,
    #[serde(default)]
    pub email: Option<String>,
    /// Provider-level role (`authenticated`, `anon`, ...).
    #[serde(default)]
    pub role: Option<String>,
    /// Server-controlled metadata; `role: "admin"` grants moderation rights.
    #[serde(default)]
    pub app_metadata: AppMetadata,
}

#[derive(Debug, Default, Serialize, Deserialize, Clone)]
pub struct AppMetadata {
    #[serde(default)]
    pub role: Option<String>,
}

impl Claims {
    /// Application role: `admin` when granted in `app_metadata`, else `authenticated`.
    pub fn app_role(&self) -> &str {
        match self.app_metadata.role.as_deref() {
            Some(ROLE_ADMIN) => ROLE_ADMIN,
            _ => ROLE_AUTHENTICATED,
        }
    }
}

/// Configuration for access-token validation.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 secret shared with the auth provider.
    pub secret: String,
    /// Expected `aud` claim.
    pub audience: String,
}

impl JwtConfig {
    /// Load JWT configuration from environment variables.
    ///
    /// | Env Var        | Required | Default         |
    /// |----------------|----------|-----------------|
    /// | `JWT_SECRET`   | **yes**  | --              |
    /// | `JWT_AUDIENCE` | no       | `authenticated` |
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is not set or is empty.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");

        let audience =
            std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| ROLE_AUTHENTICATED.to_string());

        Self { secret, audience }
    }
}

/// Validate and decode an access token, returning the embedded [`Claims`].
///
/// Checks the HS256 signature, expiry and audience.
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_audience(&[config.audience.as_str()]);
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )?;
    Ok(token_data.claims)
}
