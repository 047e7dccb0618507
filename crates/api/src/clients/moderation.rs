//! Notifications to the moderation worker about new submissions.
//!
//! Delivery is best effort: the submission has already been committed when
//! the notification goes out, so failures are logged and dropped.

use serde::Serialize;

use crate::config::optional_env;

/// Moderation worker endpoint. Absent when `MODERATION_WORKER_URL` is unset.
#[derive(Debug, Clone)]
pub struct ModerationConfig {
    pub url: String,
    pub api_key: Option<String>,
}

impl ModerationConfig {
    /// | Env Var                     | Required |
    /// |-----------------------------|----------|
    /// | `MODERATION_WORKER_URL`     | no       |
    /// | `MODERATION_WORKER_API_KEY` | no       |
    pub fn from_env() -> Option<Self> {
        let url = optional_env("MODERATION_WORKER_URL")?;
        Some(Self {
            url: url.trim_end_matches('/').to_string(),
            api_key: optional_env("MODERATION_WORKER_API_KEY"),
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Moderation worker error ({status}): {body}")]
    ApiError { status: u16, body: String },
}

/// One submitted route, as announced to moderators.
#[derive(Debug, Clone, Serialize)]
pub struct SubmittedRoute {
    pub route_id: String,
    pub name: String,
    pub grade: String,
    pub image_url: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub region: Option<String>,
    pub submitted_by: String,
    pub submitted_by_email: Option<String>,
}

/// Sends [`SubmittedRoute`] announcements; a no-op when unconfigured.
#[derive(Clone)]
pub struct ModerationNotifier {
    client: reqwest::Client,
    config: Option<ModerationConfig>,
}

impl ModerationNotifier {
    pub fn new(client: reqwest::Client, config: Option<ModerationConfig>) -> Self {
        Self { client, config }
    }

    pub fn is_enabled(&self) -> bool {
        self.config.is_some()
    }

    /// Announce routes in the background. Returns immediately.
    pub fn notify_in_background(&self, routes: Vec<SubmittedRoute>) {
        if !self.is_enabled() || routes.is_empty() {
            return;
        }
        let notifier = self.clone();
        tokio::spawn(async move {
            for route in &routes {
                if let Err(e) = notifier.notify(route).await {
                    tracing::warn!(
                        error = %e,
                        route_id = %route.route_id,
                        "Failed to notify moderation worker",
                    );
                }
            }
        });
    }

    /// Announce a single route.
    pub async fn notify(&self, route: &SubmittedRoute) -> Result<(), NotifyError> {
        let Some(config) = &self.config else {
            return Ok(());
        };

        let mut request = self
            .client
            .post(format!("{}/routes/discord-submit", config.url))
            .json(route);
        if let Some(key) = &config.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        super::ensure_success(response, |status, body| NotifyError::ApiError { status, body })
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route() -> SubmittedRoute {
        SubmittedRoute {
            route_id: "r-1".into(),
            name: "Arête".into(),
            grade: "6C".into(),
            image_url: Some("https://img.test/1.jpg".into()),
            latitude: Some(48.4),
            longitude: Some(2.7),
            region: Some("Fontainebleau".into()),
            submitted_by: "user-1".into(),
            submitted_by_email: None,
        }
    }

    #[tokio::test]
    async fn disabled_notifier_does_nothing() {
        let notifier = ModerationNotifier::new(reqwest::Client::new(), None);
        assert!(!notifier.is_enabled());
        assert!(notifier.notify(&route()).await.is_ok());
        notifier.notify_in_background(vec![route()]);
    }

    #[test]
    fn payload_uses_worker_field_names() {
        let json = serde_json::to_value(route()).unwrap();
        assert_eq!(json["route_id"], "r-1");
        assert_eq!(json["submitted_by"], "user-1");
        assert!(json["submitted_by_email"].is_null());
    }
}
