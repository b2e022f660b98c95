use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// One in-app notification row. Append-only; dispatch inserts exactly one
/// per recipient.
#[derive(Debug, Serialize, sqlx::FromRow, ToSchema)]
pub struct Notification {
    pub id: Uuid,
    pub account_id: Uuid,
    pub title: String,
    pub body: String,
    pub kind: String,
    pub link: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Contact fields and channel toggles loaded per recipient.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RecipientProfile {
    pub account_id: Uuid,
    pub full_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub email_notifications: bool,
    pub sms_notifications: bool,
    pub whatsapp_notifications: bool,
    pub push_notifications: bool,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ClassNotificationRequest {
    #[validate(length(min = 1, message = "kind must not be empty"))]
    pub kind: String,
    pub class_id: Uuid,
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: String,
    pub details: String,
    /// Also deliver to parent accounts linked to the class's students.
    #[serde(default)]
    pub notify_parents: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ClassNotificationResponse {
    pub success: bool,
    pub emails_sent: usize,
    pub in_app_created: usize,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct DirectNotificationRequest {
    /// An empty list is a valid no-op dispatch.
    pub account_ids: Vec<Uuid>,
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: String,
    pub body: String,
    #[validate(length(min = 1, message = "kind must not be empty"))]
    pub kind: String,
    pub icon: Option<String>,
    pub url: Option<String>,
    #[serde(default)]
    pub send_sms: bool,
    #[serde(default)]
    pub send_whatsapp: bool,
    #[serde(default = "default_true")]
    pub send_push: bool,
}

fn default_true() -> bool {
    true
}

/// Channels that report per-recipient outcomes. The class email broadcast
/// is batched and reports an aggregate count instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    Sms,
    Whatsapp,
    Push,
    InApp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryOutcome {
    Sent,
    Failed,
    Skipped,
}

/// Per-recipient, per-channel result, so callers can see which deliveries
/// failed instead of a bare aggregate.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecipientOutcome {
    pub account_id: Uuid,
    pub channel: Channel,
    pub outcome: DeliveryOutcome,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DirectNotificationResponse {
    pub success: bool,
    pub sms_sent: usize,
    pub whatsapp_sent: usize,
    pub push_sent: usize,
    pub in_app_created: usize,
    pub results: Vec<RecipientOutcome>,
}
