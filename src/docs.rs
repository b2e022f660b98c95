use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::modules::accounts::model::{
    AccountStatusRequest, AccountStatusResponse, AccountSummary, CreateAccountRequest,
    CreateAccountResponse, Role, RoleDetails, StatusAction,
};
use crate::modules::auth::controller::{ErrorResponse, ProfileResponse};
use crate::modules::auth::model::{AuthenticatedAccount, LoginRequest, LoginResponse};
use crate::modules::notifications::model::{
    Channel, ClassNotificationRequest, ClassNotificationResponse, DeliveryOutcome,
    DirectNotificationRequest, DirectNotificationResponse, Notification, RecipientOutcome,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::login,
        crate::modules::auth::controller::me,
        crate::modules::accounts::controller::create_account,
        crate::modules::accounts::controller::set_account_status,
        crate::modules::notifications::controller::notify_class,
        crate::modules::notifications::controller::notify_direct,
    ),
    components(
        schemas(
            LoginRequest,
            LoginResponse,
            AuthenticatedAccount,
            ProfileResponse,
            ErrorResponse,
            Role,
            RoleDetails,
            CreateAccountRequest,
            CreateAccountResponse,
            AccountSummary,
            StatusAction,
            AccountStatusRequest,
            AccountStatusResponse,
            Notification,
            Channel,
            DeliveryOutcome,
            RecipientOutcome,
            ClassNotificationRequest,
            ClassNotificationResponse,
            DirectNotificationRequest,
            DirectNotificationResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Login and caller identity"),
        (name = "Accounts", description = "Account provisioning and status management"),
        (name = "Notifications", description = "Multi-channel notification dispatch")
    ),
    info(
        title = "Maktab API",
        version = "0.1.0",
        description = "School management backend: account provisioning and multi-channel notification dispatch.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
