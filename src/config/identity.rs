use std::env;

/// Settings for synthesized login identifiers.
///
/// Students and parents have no real mailbox; their login is an
/// email-shaped string under `login_domain`.
#[derive(Clone, Debug)]
pub struct IdentityConfig {
    pub login_domain: String,
}

impl IdentityConfig {
    pub fn from_env() -> Self {
        Self {
            login_domain: env::var("LOGIN_DOMAIN")
                .unwrap_or_else(|_| "accounts.maktab.local".to_string()),
        }
    }
}
