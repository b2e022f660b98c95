use axum::http::{HeaderValue, Method, header};
use axum::{Router, middleware};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};
use utoipa_swagger_ui::SwaggerUi;

use crate::config::cors::CorsConfig;
use crate::docs::ApiDoc;
use crate::logging::logging_middleware;
use crate::middleware::role::{require_admin, require_staff};
use crate::modules::accounts::router::init_accounts_router;
use crate::modules::auth::router::init_auth_router;
use crate::modules::notifications::router::init_notifications_router;
use crate::state::AppState;

pub fn init_router(state: AppState) -> Router {
    let cors = cors_layer(&state.cors_config);

    let api = Router::new()
        .nest("/auth", init_auth_router())
        .nest(
            "/accounts",
            init_accounts_router()
                .route_layer(middleware::from_fn_with_state(state.clone(), require_admin)),
        )
        .nest(
            "/notifications",
            init_notifications_router()
                .route_layer(middleware::from_fn_with_state(state.clone(), require_staff)),
        );

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .nest("/api", api)
        .with_state(state)
        .layer(cors)
        .layer(middleware::from_fn(logging_middleware))
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true)
}
