//! Service description and liveness

use axum::{extract::State, Json};
use docpdf_core::constants::{ALLOWED_EXTENSIONS, FILE_FIELD, SERVICE_TITLE, SERVICE_VERSION};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EndpointsInfo {
    pub convert: String,
    pub health: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ServiceInfo {
    pub service: String,
    pub version: String,
    pub endpoints: EndpointsInfo,
    pub supported_formats: Vec<String>,
    pub usage: String,
}

/// Liveness probe. Always healthy while the process serves requests.
#[utoipa::path(
    get,
    path = "/health",
    tag = "service",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    )
)]
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: state.config.service_name().to_string(),
    })
}

#[utoipa::path(
    get,
    path = "/",
    tag = "service",
    responses(
        (status = 200, description = "Service description", body = ServiceInfo)
    )
)]
pub async fn index() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        service: SERVICE_TITLE.to_string(),
        version: SERVICE_VERSION.to_string(),
        endpoints: EndpointsInfo {
            convert: "/convert (POST) - Converts DOCX files to PDF".to_string(),
            health: "/health (GET) - Health check".to_string(),
        },
        supported_formats: ALLOWED_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        usage: format!(
            "Send a file via POST to /convert with the field '{}'",
            FILE_FIELD
        ),
    })
}
