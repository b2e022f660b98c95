use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::config::jwt::JwtConfig;
use crate::modules::accounts::model::Role;
use crate::utils::errors::AppError;
use crate::utils::jwt::create_access_token;
use crate::utils::password::verify_password;

use super::model::{AuthenticatedAccount, LoginRequest, LoginResponse};

pub struct AuthService;

impl AuthService {
    /// Verifies credentials and issues an access token.
    ///
    /// The join against `role_grants` enforces the invariant that an
    /// account cannot authenticate before it holds a role.
    #[instrument(skip(db, req, jwt_config), fields(email = %req.email))]
    pub async fn login(
        db: &PgPool,
        req: LoginRequest,
        jwt_config: &JwtConfig,
    ) -> Result<LoginResponse, AppError> {
        #[derive(sqlx::FromRow)]
        struct AccountCredentials {
            id: Uuid,
            email: String,
            password: String,
            banned_until: Option<DateTime<Utc>>,
            role: String,
        }

        let account = sqlx::query_as::<_, AccountCredentials>(
            "SELECT a.id, a.email, a.password, a.banned_until, r.role
             FROM accounts a
             JOIN role_grants r ON r.account_id = a.id
             WHERE a.email = $1",
        )
        .bind(req.email.trim().to_lowercase())
        .fetch_optional(db)
        .await
        .map_err(|e| AppError::database(anyhow::anyhow!("Failed to look up account: {}", e)))?
        .ok_or_else(|| AppError::unauthorized("Invalid email or password".to_string()))?;

        if let Some(banned_until) = account.banned_until {
            if banned_until > Utc::now() {
                return Err(AppError::forbidden("Account is suspended".to_string()));
            }
        }

        if !verify_password(&req.password, &account.password)? {
            return Err(AppError::unauthorized(
                "Invalid email or password".to_string(),
            ));
        }

        let role: Role = account
            .role
            .parse()
            .map_err(|e: String| AppError::internal(anyhow::anyhow!(e)))?;

        let access_token = create_access_token(account.id, &account.email, &role, jwt_config)?;

        Ok(LoginResponse {
            access_token,
            account: AuthenticatedAccount {
                id: account.id,
                email: account.email,
                role: role.as_str().to_string(),
            },
        })
    }
}
