//! Payment provider client: subscription checkout sessions.
//!
//! Webhook verification is pure and lives in `cragmap_core::payments`.

use serde::Deserialize;

use crate::config::optional_env;

/// Payment provider configuration. Each key may be missing in development;
/// the endpoints that need a key report a configuration error when it is.
#[derive(Debug, Clone)]
pub struct StripeConfig {
    pub secret_key: Option<String>,
    pub price_id: Option<String>,
    pub webhook_secret: Option<String>,
    pub api_url: String,
}

impl StripeConfig {
    /// | Env Var                 | Default                  |
    /// |-------------------------|--------------------------|
    /// | `STRIPE_SECRET_KEY`     | --                       |
    /// | `STRIPE_PRICE_ID`       | --                       |
    /// | `STRIPE_WEBHOOK_SECRET` | --                       |
    /// | `STRIPE_API_URL`        | `https://api.stripe.com` |
    pub fn from_env() -> Self {
        Self {
            secret_key: optional_env("STRIPE_SECRET_KEY"),
            price_id: optional_env("STRIPE_PRICE_ID"),
            webhook_secret: optional_env("STRIPE_WEBHOOK_SECRET"),
            api_url: optional_env("STRIPE_API_URL")
                .unwrap_or_else(|| "https://api.stripe.com".into())
                .trim_end_matches('/')
                .to_string(),
        }
    }
}

/// Errors from the payment provider layer.
#[derive(Debug, thiserror::Error)]
pub enum StripeError {
    /// A required key is not configured.
    #[error("Stripe is not configured: missing {0}")]
    NotConfigured(&'static str),

    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider returned a non-2xx status code.
    #[error("Stripe API error ({status}): {body}")]
    ApiError { status: u16, body: String },

    /// The session was created without a redirect URL.
    #[error("Checkout session has no URL")]
    MissingUrl,
}

/// The fields of a created checkout session this service reads.
#[derive(Debug, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    pub url: Option<String>,
}

/// Form fields for a one-seat subscription checkout.
pub fn checkout_form(
    price_id: &str,
    site_url: &str,
    user_id: &str,
    email: Option<&str>,
) -> Vec<(&'static str, String)> {
    let mut form = vec![
        ("mode", "subscription".to_string()),
        ("line_items[0][price]", price_id.to_string()),
        ("line_items[0][quantity]", "1".to_string()),
        ("success_url", format!("{site_url}/profile?success=true")),
        ("cancel_url", format!("{site_url}/upgrade?canceled=true")),
        ("metadata[user_id]", user_id.to_string()),
    ];
    if let Some(email) = email {
        form.push(("customer_email", email.to_string()));
    }
    form
}

/// HTTP client for the payment provider's REST API.
pub struct StripeClient {
    client: reqwest::Client,
    config: StripeConfig,
}

impl StripeClient {
    pub fn new(client: reqwest::Client, config: StripeConfig) -> Self {
        Self { client, config }
    }

    /// Signing secret for incoming webhooks.
    pub fn webhook_secret(&self) -> Result<&str, StripeError> {
        self.config
            .webhook_secret
            .as_deref()
            .ok_or(StripeError::NotConfigured("STRIPE_WEBHOOK_SECRET"))
    }

    /// Create a subscription checkout session and return its redirect URL.
    pub async fn create_checkout_session(
        &self,
        site_url: &str,
        user_id: &str,
        email: Option<&str>,
    ) -> Result<String, StripeError> {
        let secret_key = self
            .config
            .secret_key
            .as_deref()
            .ok_or(StripeError::NotConfigured("STRIPE_SECRET_KEY"))?;
        let price_id = self
            .config
            .price_id
            .as_deref()
            .ok_or(StripeError::NotConfigured("STRIPE_PRICE_ID"))?;

        let response = self
            .client
            .post(format!("{}/v1/checkout/sessions", self.config.api_url))
            .bearer_auth(secret_key)
            .form(&checkout_form(price_id, site_url, user_id, email))
            .send()
            .await?;

        let response = super::ensure_success(response, |status, body| StripeError::ApiError {
            status,
            body,
        })
        .await?;
        let session: CheckoutSession = response.json().await?;
        tracing::debug!(session_id = %session.id, "Checkout session created");
        session.url.ok_or(StripeError::MissingUrl)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checkout_form_carries_redirects_and_metadata() {
        let form = checkout_form("price_1", "https://cragmap.test", "u-1", Some("a@b.c"));
        let get = |k: &str| form.iter().find(|(key, _)| *key == k).map(|(_, v)| v.as_str());
        assert_eq!(get("mode"), Some("subscription"));
        assert_eq!(get("line_items[0][price]"), Some("price_1"));
        assert_eq!(get("line_items[0][quantity]"), Some("1"));
        assert_eq!(get("success_url"), Some("https://cragmap.test/profile?success=true"));
        assert_eq!(get("cancel_url"), Some("https://cragmap.test/upgrade?canceled=true"));
        assert_eq!(get("metadata[user_id]"), Some("u-1"));
        assert_eq!(get("customer_email"), Some("a@b.c"));
    }

    #[test]
    fn checkout_form_omits_missing_email() {
        let form = checkout_form("price_1", "https://x", "u", None);
        assert!(form.iter().all(|(k, _)| *k != "customer_email"));
    }

    #[tokio::test]
    async fn missing_keys_are_reported() {
        let client = StripeClient::new(
            reqwest::Client::new(),
            StripeConfig {
                secret_key: None,
                price_id: None,
                webhook_secret: None,
                api_url: "http://127.0.0.1:9".into(),
            },
        );
        assert!(matches!(
            client.create_checkout_session("https://x", "u", None).await,
            Err(StripeError::NotConfigured("STRIPE_SECRET_KEY"))
        ));
        assert!(matches!(
            client.webhook_secret(),
            Err(StripeError::NotConfigured("STRIPE_WEBHOOK_SECRET"))
        ));
    }
}
