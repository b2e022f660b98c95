use axum::{Router, routing::post};

use crate::modules::accounts::controller::{create_account, set_account_status};
use crate::state::AppState;

pub fn init_accounts_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_account))
        .route("/{id}/status", post(set_account_status))
}
