use axum::{Json, extract::State};
use serde::Serialize;
use tracing::instrument;
use utoipa::ToSchema;

use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

use super::model::{LoginRequest, LoginResponse};
use super::service::AuthService;

#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Serialize, ToSchema)]
pub struct ProfileResponse {
    pub account_id: String,
    pub email: String,
    pub role: String,
}

/// Login and receive a JWT access token
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 403, description = "Account suspended", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, req))]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let response = AuthService::login(&state.db, req, &state.jwt_config).await?;
    Ok(Json(response))
}

/// Get the authenticated caller's claims
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Caller profile", body = ProfileResponse),
        (status = 401, description = "Unauthorized - missing or invalid token", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Authentication"
)]
#[instrument]
pub async fn me(auth_user: AuthUser) -> Result<Json<ProfileResponse>, AppError> {
    Ok(Json(ProfileResponse {
        account_id: auth_user.0.sub,
        email: auth_user.0.email,
        role: auth_user.0.role,
    }))
}
