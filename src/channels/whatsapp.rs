use tracing::{debug, instrument, warn};

use crate::channels::sms::messages_url;
use crate::config::messaging::MessagingConfig;

#[derive(Debug, Clone)]
pub struct WhatsAppSender {
    http: reqwest::Client,
    config: MessagingConfig,
}

impl WhatsAppSender {
    pub fn new(http: reqwest::Client, config: MessagingConfig) -> Self {
        Self { http, config }
    }

    /// Sends one WhatsApp message. `to` must already be in E.164 form.
    /// Returns whether the provider accepted it; failures are logged.
    #[instrument(skip(self, body))]
    pub async fn send(&self, to: &str, body: &str) -> bool {
        if !self.config.enabled {
            debug!("Messaging disabled, skipping WhatsApp message");
            return false;
        }

        let url = messages_url(&self.config.api_base, &self.config.account_sid);
        let to_address = whatsapp_address(to);
        let from_address = whatsapp_address(&self.config.whatsapp_from);
        let params = [
            ("To", to_address.as_str()),
            ("From", from_address.as_str()),
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
                warn!(status = %resp.status(), "WhatsApp provider rejected message");
                false
            }
            Err(e) => {
                warn!(error = %e, "WhatsApp send failed");
                false
            }
        }
    }
}

/// The provider addresses WhatsApp endpoints as `whatsapp:+E164`.
fn whatsapp_address(number: &str) -> String {
    if number.starts_with("whatsapp:") {
        number.to_string()
    } else {
        format!("whatsapp:{}", number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whatsapp_address_prefixing() {
        assert_eq!(whatsapp_address("+923001234567"), "whatsapp:+923001234567");
        assert_eq!(
            whatsapp_address("whatsapp:+923001234567"),
            "whatsapp:+923001234567"
        );
    }
}
