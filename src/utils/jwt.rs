use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use crate::config::jwt::JwtConfig;
use crate::modules::accounts::model::Role;
use crate::modules::auth::model::Claims;
use crate::utils::errors::AppError;

/// Mints an access token. The claims carry the account's role grant so the
/// authorization gates can decide without a database round trip.
pub fn create_access_token(
    account_id: Uuid,
    email: &str,
    role: &Role,
    jwt_config: &JwtConfig,
) -> Result<String, AppError> {
    let issued_at = Utc::now();
    let expires_at = issued_at + Duration::seconds(jwt_config.access_token_expiry);

    let claims = Claims {
        sub: account_id.to_string(),
        email: email.to_string(),
        role: role.as_str().to_string(),
        exp: expires_at.timestamp() as usize,
        iat: issued_at.timestamp() as usize,
    };

    let key = EncodingKey::from_secret(jwt_config.secret.as_bytes());
    encode(&Header::default(), &claims, &key)
        .map_err(|e| AppError::internal(anyhow::anyhow!("Failed to create token: {}", e)))
}

pub fn verify_token(token: &str, jwt_config: &JwtConfig) -> Result<Claims, AppError> {
    let key = DecodingKey::from_secret(jwt_config.secret.as_bytes());
    let data = decode::<Claims>(token, &key, &Validation::default())
        .map_err(|_| AppError::unauthorized("Invalid or expired token".to_string()))?;

    Ok(data.claims)
}
