use std::env;

/// Credentials for the SMS/WhatsApp provider (Twilio-compatible API).
///
/// With `enabled = false` (the default) every send is skipped and counted
/// as a failure, which keeps development environments quiet without
/// special-casing the fan-out path.
#[derive(Clone, Debug)]
pub struct MessagingConfig {
    pub enabled: bool,
    pub api_base: String,
    pub account_sid: String,
    pub auth_token: String,
    pub sms_from: String,
    pub whatsapp_from: String,
    pub country_code: String,
}

impl MessagingConfig {
    pub fn from_env() -> Self {
        Self {
            enabled: env::var("MESSAGING_ENABLED")
                .map(|v| v.to_lowercase() == "true" || v == "1")
                .unwrap_or(false),
            api_base: env::var("MESSAGING_API_BASE")
                .unwrap_or_else(|_| "https://api.twilio.com".to_string()),
            account_sid: env::var("MESSAGING_ACCOUNT_SID").unwrap_or_else(|_| "".to_string()),
            auth_token: env::var("MESSAGING_AUTH_TOKEN").unwrap_or_else(|_| "".to_string()),
            sms_from: env::var("MESSAGING_SMS_FROM").unwrap_or_else(|_| "".to_string()),
            whatsapp_from: env::var("MESSAGING_WHATSAPP_FROM").unwrap_or_else(|_| "".to_string()),
            country_code: env::var("DEFAULT_COUNTRY_CODE").unwrap_or_else(|_| "+92".to_string()),
        }
    }
}
