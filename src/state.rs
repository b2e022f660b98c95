use std::time::Duration;

use sqlx::PgPool;

use crate::config::cors::CorsConfig;
use crate::config::database::init_db_pool;
use crate::config::email::EmailConfig;
use crate::config::identity::IdentityConfig;
use crate::config::jwt::JwtConfig;
use crate::config::messaging::MessagingConfig;

#[derive(Clone, Debug)]
pub struct AppState {
    pub db: PgPool,
    pub jwt_config: JwtConfig,
    pub cors_config: CorsConfig,
    pub email_config: EmailConfig,
    pub messaging_config: MessagingConfig,
    pub identity_config: IdentityConfig,
    /// Shared HTTP client for the messaging providers, with a bounded
    /// request timeout so a stalled provider cannot hang a fan-out.
    pub http: reqwest::Client,
}

pub async fn init_app_state() -> AppState {
    init_app_state_with_pool(init_db_pool().await)
}

/// Builds the state around an existing pool. Used by tests with a lazily
/// connected pool so the router can be exercised without a live database.
pub fn init_app_state_with_pool(db: PgPool) -> AppState {
    AppState {
        db,
        jwt_config: JwtConfig::from_env(),
        cors_config: CorsConfig::from_env(),
        email_config: EmailConfig::from_env(),
        messaging_config: MessagingConfig::from_env(),
        identity_config: IdentityConfig::from_env(),
        http: reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to build HTTP client"),
    }
}
