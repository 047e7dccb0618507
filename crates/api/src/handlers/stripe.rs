//! Subscription checkout and payment webhook handlers (`/stripe`).

use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use chrono::Utc;
use cragmap_core::payments::{
    verify_webhook_signature, SubscriptionChange, WebhookEvent,
    DEFAULT_SIGNATURE_TOLERANCE_SECS,
};
use cragmap_db::repositories::ProfileRepo;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Header carrying the webhook signature.
pub const SIGNATURE_HEADER: &str = "stripe-signature";

#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub url: String,
}

/// POST /api/v1/stripe/checkout
pub async fn checkout(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<CheckoutResponse>>> {
    ProfileRepo::find_or_create(&state.pool, user.user_id).await?;

    let url = state
        .stripe
        .create_checkout_session(
            &state.config.public_site_url,
            &user.user_id.to_string(),
            user.email.as_deref(),
        )
        .await?;

    tracing::info!(user_id = %user.user_id, "Checkout session started");
    Ok(Json(DataResponse {
        data: CheckoutResponse { url },
    }))
}

#[derive(Debug, Serialize)]
pub struct WebhookAck {
    pub received: bool,
}

/// POST /api/v1/stripe/webhook
///
/// Authenticated by signature rather than bearer token. The raw body is
/// verified before it is parsed.
pub async fn webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<Json<WebhookAck>> {
    let secret = state.stripe.webhook_secret()?;

    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if let Err(e) = verify_webhook_signature(
        &body,
        signature,
        secret,
        Utc::now().timestamp(),
        DEFAULT_SIGNATURE_TOLERANCE_SECS,
    ) {
        tracing::warn!(error = %e, "Rejected webhook");
        return Err(AppError::BadRequest("Webhook error".into()));
    }

    let event = WebhookEvent::parse(&body)?;
    match SubscriptionChange::from_event(&event) {
        SubscriptionChange::Activate {
            user_id,
            customer_id,
        } => {
            let updated =
                ProfileRepo::activate_subscription(&state.pool, user_id, customer_id.as_deref())
                    .await?;
            tracing::info!(user_id = %user_id, updated, "Subscription activated");
        }
        SubscriptionChange::Deactivate { customer_id } => {
            let updated = ProfileRepo::deactivate_by_customer(&state.pool, &customer_id).await?;
            tracing::info!(customer_id = %customer_id, updated, "Subscription canceled");
        }
        SubscriptionChange::Ignored => {
            tracing::debug!(event_type = %event.event_type, "Ignoring webhook event");
        }
    }

    Ok(Json(WebhookAck { received: true }))
}
