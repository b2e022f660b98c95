use serde::Serialize;
use tracing::{instrument, warn};

/// A device registration created by the client portal.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PushSubscription {
    pub endpoint: String,
    pub p256dh: String,
    pub auth: String,
}

/// Payload posted to each subscription endpoint.
#[derive(Debug, Serialize)]
pub struct PushPayload {
    pub title: String,
    pub body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct PushSender {
    http: reqwest::Client,
}

impl PushSender {
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }

    /// Posts the payload to one subscription endpoint. Best-effort: a
    /// gone or unreachable endpoint is logged and reported as `false`.
    #[instrument(skip(self, payload), fields(endpoint = %subscription.endpoint))]
    pub async fn send(&self, subscription: &PushSubscription, payload: &PushPayload) -> bool {
        match self
            .http
            .post(&subscription.endpoint)
            .header("TTL", "86400")
            .json(payload)
            .send()
            .await
        {
            Ok(resp) if resp.status().is_success() => true,
            Ok(resp) => {
                warn!(status = %resp.status(), "Push endpoint rejected payload");
                false
            }
            Err(e) => {
                warn!(error = %e, "Push send failed");
                false
            }
        }
    }
}
