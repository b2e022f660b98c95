//! Request logging middleware.
//!
//! Every request gets a generated id, logged together with the matched
//! route (so `/api/accounts/{id}/status` aggregates across account ids)
//! and the latency. Client errors log at `warn`, server errors at `error`.

use std::time::Instant;

use axum::extract::{MatchedPath, Request};
use axum::middleware::Next;
use axum::response::Response;
use tracing::{error, info, warn};
use uuid::Uuid;

pub async fn logging_middleware(req: Request, next: Next) -> Response {
    let request_id = Uuid::new_v4();
    let method = req.method().clone();
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| req.uri().path().to_owned());

    info!(%request_id, %method, %route, "Incoming request");

    let started = Instant::now();
    let response = next.run(req).await;

    let status = response.status();
    let latency_ms = started.elapsed().as_millis() as u64;

    if status.is_server_error() {
        error!(%request_id, %method, %route, status = status.as_u16(), latency_ms, "Server error");
    } else if status.is_client_error() {
        warn!(%request_id, %method, %route, status = status.as_u16(), latency_ms, "Client error");
    } else {
        info!(%request_id, %method, %route, status = status.as_u16(), latency_ms, "Request completed");
    }

    response
}
