use tracing::{debug, instrument, warn};

use crate::config::messaging::MessagingConfig;

#[derive(Debug, Clone)]
pub struct SmsSender {
    http: reqwest::Client,
    config: MessagingConfig,
}

impl SmsSender {
    pub fn new(http: reqwest::Client, config: MessagingConfig) -> Self {
        Self { http, config }
    }

    /// Sends one SMS. `to` must already be in E.164 form. Returns whether
    /// the provider accepted the message; failures are logged, not raised.
    #[instrument(skip(self, body))]
    pub async fn send(&self, to: &str, body: &str) -> bool {
        if !self.config.enabled {
            debug!("Messaging disabled, skipping SMS");
            return false;
        }

        let url = messages_url(&self.config.api_base, &self.config.account_sid);
        let params = [
            ("To", to),
            ("From", self.config.sms_from.as_str()),
            ("Body", body),
        ];

        match self
            .http
            .post(&url)
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .form(&params)
            .send()
            .await
        {
            Ok(resp) if resp.status().is_success() => true,
            Ok(resp) => {
                warn!(status = %resp.status(), "SMS provider rejected message");
                false
            }
            Err(e) => {
                warn!(error = %e, "SMS send failed");
                false
            }
        }
    }
}

pub(crate) fn messages_url(api_base: &str, account_sid: &str) -> String {
    format!(
        "{}/2010-04-01/Accounts/{}/Messages.json",
        api_base.trim_end_matches('/'),
        account_sid
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_url() {
        assert_eq!(
            messages_url("https://api.twilio.com", "AC123"),
            "https://api.twilio.com/2010-04-01/Accounts/AC123/Messages.json"
        );
        // Trailing slash must not produce a double slash.
        assert_eq!(
            messages_url("https://api.twilio.com/", "AC123"),
            "https://api.twilio.com/2010-04-01/Accounts/AC123/Messages.json"
        );
    }
}
