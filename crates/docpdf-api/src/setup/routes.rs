//! Route configuration and setup

use crate::error::panic_response;
use crate::handlers;
use crate::middleware::{
    request_id_middleware,
    security_headers::{security_headers_middleware, SecurityHeadersConfig},
};
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Json, Router,
};
use docpdf_core::Config;
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Router {
    let security_headers_config = Arc::new(SecurityHeadersConfig::new(config.is_production()));

    tracing::info!(
        max_upload_bytes = config.max_upload_size_bytes(),
        "Upload size limit applied to /convert"
    );

    Router::new()
        .route("/", get(handlers::info::index))
        .route("/health", get(handlers::info::health_check))
        .route(
            "/convert",
            post(handlers::convert::convert_document)
                .layer(DefaultBodyLimit::max(config.max_upload_size_bytes())),
        )
        .route(
            "/api/openapi.json",
            get(|| async { Json(crate::api_doc::ApiDoc::openapi()) }),
        )
        .with_state(state)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(axum::middleware::from_fn_with_state(
            security_headers_config,
            security_headers_middleware,
        ))
}
