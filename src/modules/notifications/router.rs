use axum::{Router, routing::post};

use crate::modules::notifications::controller::{notify_class, notify_direct};
use crate::state::AppState;

pub fn init_notifications_router() -> Router<AppState> {
    Router::new()
        .route("/class", post(notify_class))
        .route("/direct", post(notify_direct))
}
