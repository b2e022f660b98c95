use axum::{Json, extract::Path, extract::State};
use tracing::instrument;
use uuid::Uuid;

use crate::modules::accounts::model::{
    AccountStatusRequest, AccountStatusResponse, AccountSummary, CreateAccountRequest,
    CreateAccountResponse,
};
use crate::modules::accounts::service::AccountService;
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

/// Provision a new account (admin only)
#[utoipa::path(
    post,
    path = "/api/accounts",
    request_body = CreateAccountRequest,
    responses(
        (status = 200, description = "Account provisioned", body = CreateAccountResponse),
        (status = 400, description = "Validation error or identifier conflict", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - admin only", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Accounts"
)]
#[instrument(skip(state, req))]
pub async fn create_account(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateAccountRequest>,
) -> Result<Json<CreateAccountResponse>, AppError> {
    let provisioned = AccountService::provision(&state.db, &state.identity_config, req).await?;

    Ok(Json(CreateAccountResponse {
        success: true,
        account: AccountSummary {
            id: provisioned.id,
            email: provisioned.login,
        },
        student_code: provisioned.student_code,
    }))
}

/// Ban, unban, or delete an account (admin only)
#[utoipa::path(
    post,
    path = "/api/accounts/{id}/status",
    request_body = AccountStatusRequest,
    params(
        ("id" = Uuid, Path, description = "Account id")
    ),
    responses(
        (status = 200, description = "Status updated", body = AccountStatusResponse),
        (status = 400, description = "Invalid action", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - admin only", body = ErrorResponse),
        (status = 404, description = "Account not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Accounts"
)]
#[instrument(skip(state))]
pub async fn set_account_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<AccountStatusRequest>,
) -> Result<Json<AccountStatusResponse>, AppError> {
    AccountService::set_status(&state.db, id, req.action).await?;

    Ok(Json(AccountStatusResponse {
        success: true,
        action: req.action,
    }))
}
