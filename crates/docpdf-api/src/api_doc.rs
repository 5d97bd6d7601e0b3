//! OpenAPI documentation, served as JSON at `/api/openapi.json`.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "DOCX to PDF Converter",
        description = "Converts uploaded Word documents (.docx, .doc) to PDF using a headless office suite."
    ),
    paths(
        handlers::info::index,
        handlers::info::health_check,
        handlers::convert::convert_document,
    ),
    components(
        schemas(
            error::ErrorResponse,
            handlers::info::HealthResponse,
            handlers::info::ServiceInfo,
            handlers::info::EndpointsInfo,
        )
    ),
    tags(
        (name = "conversion", description = "Document conversion"),
        (name = "service", description = "Service description and health")
    )
)]
pub struct ApiDoc;
