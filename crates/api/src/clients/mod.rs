//! Outbound HTTP clients.
//!
//! - [`geocoding`] -- Nominatim forward/reverse geocoding.
//! - [`stripe`] -- Subscription checkout sessions.
//! - [`moderation`] -- Fire-and-forget notifications to the moderation worker.

pub mod geocoding;
pub mod moderation;
pub mod stripe;

/// Read a non-2xx response body into an error via `make`.
pub(crate) async fn ensure_success<E>(
    response: reqwest::Response,
    make: impl FnOnce(u16, String) -> E,
) -> Result<reqwest::Response, E>
where
    E: From<reqwest::Error>,
{
    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|e| format!("<failed to read body: {e}>"));
        return Err(make(status.as_u16(), body));
    }
    Ok(response)
}
