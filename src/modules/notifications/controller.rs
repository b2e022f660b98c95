use axum::{Json, extract::State};
use tracing::instrument;

use crate::channels::email::Mailer;
use crate::channels::push::PushSender;
use crate::channels::sms::SmsSender;
use crate::channels::whatsapp::WhatsAppSender;
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::notifications::model::{
    ClassNotificationRequest, ClassNotificationResponse, DirectNotificationRequest,
    DirectNotificationResponse,
};
use crate::modules::notifications::service::NotificationService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

/// Send a class-scoped announcement (admin or teacher)
#[utoipa::path(
    post,
    path = "/api/notifications/class",
    request_body = ClassNotificationRequest,
    responses(
        (status = 200, description = "Announcement dispatched", body = ClassNotificationResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - admin or teacher only", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Notifications"
)]
#[instrument(skip(state, req))]
pub async fn notify_class(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<ClassNotificationRequest>,
) -> Result<Json<ClassNotificationResponse>, AppError> {
    let mailer = Mailer::new(state.email_config.clone());
    let response = NotificationService::notify_class(&state.db, &mailer, req).await?;
    Ok(Json(response))
}

/// Send a notification to explicit recipients over SMS/WhatsApp/push (admin or teacher)
#[utoipa::path(
    post,
    path = "/api/notifications/direct",
    request_body = DirectNotificationRequest,
    responses(
        (status = 200, description = "Notification dispatched", body = DirectNotificationResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - admin or teacher only", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Notifications"
)]
#[instrument(skip(state, req))]
pub async fn notify_direct(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<DirectNotificationRequest>,
) -> Result<Json<DirectNotificationResponse>, AppError> {
    let sms_sender = SmsSender::new(state.http.clone(), state.messaging_config.clone());
    let whatsapp_sender = WhatsAppSender::new(state.http.clone(), state.messaging_config.clone());
    let push_sender = PushSender::new(state.http.clone());

    let response = NotificationService::notify_direct(
        &state.db,
        &sms_sender,
        &whatsapp_sender,
        &push_sender,
        &state.messaging_config.country_code,
        req,
    )
    .await?;

    Ok(Json(response))
}
