use std::env;

/// SMTP transport settings. With `enabled = false` (the default) the
/// broadcast path is a no-op, which keeps development environments from
/// needing a mail server.
#[derive(Clone, Debug)]
pub struct EmailConfig {
    pub enabled: bool,
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_username: String,
    pub smtp_password: String,
    pub from_email: String,
    pub from_name: String,
}

impl EmailConfig {
    pub fn from_env() -> Self {
        let enabled = env::var("SMTP_ENABLED")
            .map(|v| matches!(v.to_lowercase().as_str(), "true" | "1"))
            .unwrap_or(false);

        Self {
            enabled,
            smtp_host: env_or("SMTP_HOST", "localhost"),
            smtp_port: env::var("SMTP_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1025),
            smtp_username: env_or("SMTP_USERNAME", ""),
            smtp_password: env_or("SMTP_PASSWORD", ""),
            from_email: env_or("FROM_EMAIL", "noreply@maktab.edu.pk"),
            from_name: env_or("FROM_NAME", "Maktab"),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}
