//! Payment-provider webhook verification and subscription event mapping.
//!
//! Signatures follow the Stripe scheme: the `Stripe-Signature` header carries
//! a unix timestamp `t` and one or more `v1` HMAC-SHA256 signatures over
//! `"{t}.{payload}"`, keyed by the endpoint's signing secret.

use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;

use crate::error::CoreError;
use crate::types::DbId;

/// Maximum accepted age (and clock skew) of a signed webhook, in seconds.
pub const DEFAULT_SIGNATURE_TOLERANCE_SECS: i64 = 300;

pub const EVENT_CHECKOUT_COMPLETED: &str = "checkout.session.completed";
pub const EVENT_SUBSCRIPTION_DELETED: &str = "customer.subscription.deleted";

pub const SUBSCRIPTION_ACTIVE: &str = "active";
pub const SUBSCRIPTION_CANCELED: &str = "canceled";

type HmacSha256 = Hmac<Sha256>;

// ---------------------------------------------------------------------------
// Signature verification
// ---------------------------------------------------------------------------

/// Why a webhook signature was rejected.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SignatureError {
    #[error("Missing or malformed signature header")]
    MalformedHeader,

    #[error("Signature timestamp outside tolerance")]
    Expired,

    #[error("No matching signature")]
    Mismatch,
}

impl From<SignatureError> for CoreError {
    fn from(err: SignatureError) -> Self {
        CoreError::Validation(err.to_string())
    }
}

/// Verify a `t=<unix>,v1=<hex>[,v1=<hex>...]` signature header against `payload`.
///
/// `now` is the current unix time in seconds. Any one matching `v1` entry is
/// sufficient; comparison is constant-time.
pub fn verify_webhook_signature(
    payload: &[u8],
    header: &str,
    secret: &str,
    now: i64,
    tolerance_secs: i64,
) -> Result<(), SignatureError> {
    let mut timestamp: Option<&str> = None;
    let mut signatures = Vec::new();

    for part in header.split(',') {
        let Some((key, value)) = part.trim().split_once('=') else {
            continue;
        };
        match key {
            "t" => timestamp = Some(value),
            "v1" => signatures.push(value),
            _ => {}
        }
    }

    let timestamp_str = timestamp.ok_or(SignatureError::MalformedHeader)?;
    let ts: i64 = timestamp_str
        .parse()
        .map_err(|_| SignatureError::MalformedHeader)?;
    if signatures.is_empty() {
        return Err(SignatureError::MalformedHeader);
    }
    if now.abs_diff(ts) > tolerance_secs.unsigned_abs() {
        return Err(SignatureError::Expired);
    }

    for candidate in signatures {
        let Some(expected) = hex::decode(candidate) else {
            continue;
        };
        // `verify_slice` compares in constant time.
        if signed_payload_mac(secret, timestamp_str, payload)
            .verify_slice(&expected)
            .is_ok()
        {
            return Ok(());
        }
    }
    Err(SignatureError::Mismatch)
}

/// Build a header value for `payload`, as the provider would send it.
pub fn sign_webhook_payload(payload: &[u8], secret: &str, timestamp: i64) -> String {
    let ts = timestamp.to_string();
    let mac = signed_payload_mac(secret, &ts, payload);
    format!("t={ts},v1={}", hex::encode(mac.finalize().into_bytes()))
}

fn signed_payload_mac(secret: &str, timestamp: &str, payload: &[u8]) -> HmacSha256 {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(timestamp.as_bytes());
    mac.update(b".");
    mac.update(payload);
    mac
}

// ---------------------------------------------------------------------------
// Event mapping
// ---------------------------------------------------------------------------

/// The subset of a webhook event body this service reads.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: WebhookEventData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEventData {
    pub object: serde_json::Value,
}

impl WebhookEvent {
    pub fn parse(payload: &[u8]) -> Result<Self, CoreError> {
        serde_json::from_slice(payload)
            .map_err(|e| CoreError::Validation(format!("Invalid webhook payload: {e}")))
    }
}

/// Profile update implied by a webhook event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubscriptionChange {
    /// Checkout finished: mark the user pro and remember their customer id.
    Activate {
        user_id: DbId,
        customer_id: Option<String>,
    },
    /// Subscription ended: clear pro status for the customer.
    Deactivate { customer_id: String },
    /// Anything else (including events missing the ids we need).
    Ignored,
}

impl SubscriptionChange {
    pub fn from_event(event: &WebhookEvent) -> Self {
        let object = &event.data.object;
        match event.event_type.as_str() {
            EVENT_CHECKOUT_COMPLETED => {
                let user_id = object
                    .pointer("/metadata/user_id")
                    .and_then(|v| v.as_str())
                    .and_then(|s| s.parse::<DbId>().ok());
                match user_id {
                    Some(user_id) => Self::Activate {
                        user_id,
                        customer_id: customer_of(object),
                    },
                    None => Self::Ignored,
                }
            }
            EVENT_SUBSCRIPTION_DELETED => match customer_of(object) {
                Some(customer_id) => Self::Deactivate { customer_id },
                None => Self::Ignored,
            },
            _ => Self::Ignored,
        }
    }
}

/// `customer` may be a bare id or an expanded object with an `id`.
fn customer_of(object: &serde_json::Value) -> Option<String> {
    let customer = object.get("customer")?;
    customer
        .as_str()
        .or_else(|| customer.get("id").and_then(|v| v.as_str()))
        .map(str::to_string)
}

mod hex {
    pub fn encode(bytes: impl AsRef<[u8]>) -> String {
        bytes.as_ref().iter().map(|b| format!("{b:02x}")).collect()
    }

    pub fn decode(s: &str) -> Option<Vec<u8>> {
        if s.len() % 2 != 0 || !s.is_ascii() {
            return None;
        }
        (0..s.len())
            .step_by(2)
            .map(|i| u8::from_str_radix(&s[i..i + 2], 16).ok())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    const SECRET: &str = "whsec_test";
    const NOW: i64 = 1_760_000_000;

    #[test]
    fn valid_signature_is_accepted() {
        let body = br#"{"type":"checkout.session.completed"}"#;
        let header = sign_webhook_payload(body, SECRET, NOW);
        assert_eq!(
            verify_webhook_signature(body, &header, SECRET, NOW + 10, 300),
            Ok(())
        );
    }

    #[test]
    fn any_matching_v1_entry_is_enough() {
        let body = b"{}";
        let good = sign_webhook_payload(body, SECRET, NOW);
        let good_sig = good.split_once(",v1=").unwrap().1;
        let header = format!("t={NOW},v1=deadbeef,v1={good_sig},v0=ignored");
        assert!(verify_webhook_signature(body, &header, SECRET, NOW, 300).is_ok());
    }

    #[test]
    fn tampered_payload_or_wrong_secret_is_rejected() {
        let header = sign_webhook_payload(b"{\"a\":1}", SECRET, NOW);
        assert_eq!(
            verify_webhook_signature(b"{\"a\":2}", &header, SECRET, NOW, 300),
            Err(SignatureError::Mismatch)
        );
        assert_eq!(
            verify_webhook_signature(b"{\"a\":1}", &header, "whsec_other", NOW, 300),
            Err(SignatureError::Mismatch)
        );
    }

    #[test]
    fn stale_timestamp_is_rejected() {
        let header = sign_webhook_payload(b"{}", SECRET, NOW);
        assert_eq!(
            verify_webhook_signature(b"{}", &header, SECRET, NOW + 301, 300),
            Err(SignatureError::Expired)
        );
        assert!(verify_webhook_signature(b"{}", &header, SECRET, NOW + 300, 300).is_ok());
    }

    #[test]
    fn extreme_timestamps_are_expired_not_overflowing() {
        for ts in [i64::MIN, i64::MAX] {
            let header = format!("t={ts},v1=00");
            assert_eq!(
                verify_webhook_signature(b"{}", &header, SECRET, NOW, 300),
                Err(SignatureError::Expired),
                "timestamp {ts}"
            );
        }
    }

    #[test]
    fn malformed_headers_are_rejected() {
        for header in ["", "v1=abc", "t=notanumber,v1=abc", "t=1760000000"] {
            assert_eq!(
                verify_webhook_signature(b"{}", header, SECRET, NOW, 300),
                Err(SignatureError::MalformedHeader),
                "header {header:?}"
            );
        }
    }

    #[test]
    fn checkout_completed_activates_user() {
        let user_id = DbId::new_v4();
        let body = format!(
            r#"{{"type":"checkout.session.completed","data":{{"object":{{"customer":"cus_123","metadata":{{"user_id":"{user_id}"}}}}}}}}"#
        );
        let event = WebhookEvent::parse(body.as_bytes()).unwrap();
        assert_eq!(
            SubscriptionChange::from_event(&event),
            SubscriptionChange::Activate {
                user_id,
                customer_id: Some("cus_123".into())
            }
        );
    }

    #[test]
    fn checkout_without_user_is_ignored() {
        let body = br#"{"type":"checkout.session.completed","data":{"object":{"customer":"cus_1"}}}"#;
        let event = WebhookEvent::parse(body).unwrap();
        assert_eq!(SubscriptionChange::from_event(&event), SubscriptionChange::Ignored);
    }

    #[test]
    fn subscription_deleted_deactivates_customer() {
        let body = br#"{"type":"customer.subscription.deleted","data":{"object":{"customer":{"id":"cus_9"}}}}"#;
        let event = WebhookEvent::parse(body).unwrap();
        assert_matches!(
            SubscriptionChange::from_event(&event),
            SubscriptionChange::Deactivate { customer_id } if customer_id == "cus_9"
        );
    }

    #[test]
    fn other_events_are_ignored() {
        let body = br#"{"type":"invoice.paid","data":{"object":{}}}"#;
        let event = WebhookEvent::parse(body).unwrap();
        assert_eq!(SubscriptionChange::from_event(&event), SubscriptionChange::Ignored);
        assert!(WebhookEvent::parse(b"not json").is_err());
    }
}
