//! Role-based authorization gates.
//!
//! Provisioning and status changes are admin-only; notification dispatch is
//! open to admins and teachers. The gates run after [`AuthUser`] extraction,
//! so an unauthenticated caller always sees 401 and an authenticated caller
//! with the wrong role always sees 403.

use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::middleware::auth::AuthUser;
use crate::modules::accounts::model::Role;
use crate::state::AppState;
use crate::utils::errors::AppError;

async fn require_roles(
    State(state): State<AppState>,
    req: Request,
    next: Next,
    allowed_roles: &[Role],
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let auth_user = AuthUser::from_request_parts(&mut parts, &state).await?;
    check_any_role(&auth_user, allowed_roles)?;

    Ok(next.run(Request::from_parts(parts, body)).await)
}

/// Middleware for admin-only routes.
///
/// # Usage with axum::middleware::from_fn_with_state
///
/// ```rust,ignore
/// let admin_routes = init_accounts_router()
///     .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));
/// ```
pub async fn require_admin(State(state): State<AppState>, req: Request, next: Next) -> Response {
    match require_roles(State(state), req, next, &[Role::Admin]).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}

/// Middleware for routes open to admins and teachers (notification dispatch).
pub async fn require_staff(State(state): State<AppState>, req: Request, next: Next) -> Response {
    match require_roles(State(state), req, next, &[Role::Admin, Role::Teacher]).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}

/// Check a caller's role grant against an allowed set, for use in handler
/// logic where a route-level gate is too coarse.
pub fn check_any_role(auth_user: &AuthUser, allowed_roles: &[Role]) -> Result<(), AppError> {
    let user_role = parse_role(&auth_user.0.role)?;

    if !allowed_roles.contains(&user_role) {
        return Err(AppError::forbidden(format!(
            "Access denied. Required roles: {:?}, but user has role: {:?}",
            allowed_roles, user_role
        )));
    }

    Ok(())
}

fn parse_role(role_str: &str) -> Result<Role, AppError> {
    role_str
        .parse()
        .map_err(|e: String| AppError::internal(anyhow::anyhow!(e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::auth::model::Claims;
    use uuid::Uuid;

    fn auth_user_with_role(role: &str) -> AuthUser {
        AuthUser(Claims {
            sub: Uuid::new_v4().to_string(),
            email: "test@example.com".to_string(),
            role: role.to_string(),
            exp: 9999999999,
            iat: 1234567890,
        })
    }

    #[test]
    fn test_admin_passes_admin_gate() {
        let user = auth_user_with_role("admin");
        assert!(check_any_role(&user, &[Role::Admin]).is_ok());
    }

    #[test]
    fn test_teacher_fails_admin_gate() {
        let user = auth_user_with_role("teacher");
        let err = check_any_role(&user, &[Role::Admin]).unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_teacher_passes_staff_gate() {
        let user = auth_user_with_role("teacher");
        assert!(check_any_role(&user, &[Role::Admin, Role::Teacher]).is_ok());
    }

    #[test]
    fn test_student_and_parent_fail_staff_gate() {
        for role in ["student", "parent"] {
            let user = auth_user_with_role(role);
            let err = check_any_role(&user, &[Role::Admin, Role::Teacher]).unwrap_err();
            assert_eq!(err.status, axum::http::StatusCode::FORBIDDEN);
        }
    }

    #[test]
    fn test_unknown_role_is_not_forbidden() {
        // A malformed grant in a token is a server-side inconsistency, not
        // a policy rejection.
        let user = auth_user_with_role("headmaster");
        let err = check_any_role(&user, &[Role::Admin]).unwrap_err();
        assert_eq!(
            err.status,
            axum::http::StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
