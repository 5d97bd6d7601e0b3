mod helpers;

use helpers::setup_test_app;
use serde_json::json;

#[tokio::test]
async fn test_health_check() {
    let app = setup_test_app().await;

    let response = app.client().get("/health").await;

    assert_eq!(response.status_code(), 200);
    response.assert_json(&json!({
        "status": "healthy",
        "service": "docx-to-pdf-converter"
    }));
}

#[tokio::test]
async fn test_index_describes_service() {
    let app = setup_test_app().await;

    let response = app.client().get("/").await;

    assert_eq!(response.status_code(), 200);
    response.assert_json(&json!({
        "service": "DOCX to PDF Converter",
        "version": "1.0.0",
        "endpoints": {
            "convert": "/convert (POST) - Converts DOCX files to PDF",
            "health": "/health (GET) - Health check"
        },
        "supported_formats": ["docx", "doc"],
        "usage": "Send a file via POST to /convert with the field 'file'"
    }));
}

#[tokio::test]
async fn test_openapi_document_lists_endpoints() {
    let app = setup_test_app().await;

    let response = app.client().get("/api/openapi.json").await;

    assert_eq!(response.status_code(), 200);
    let openapi: serde_json::Value = response.json();
    let paths = openapi["paths"].as_object().expect("paths object");
    assert!(paths.contains_key("/convert"));
    assert!(paths.contains_key("/health"));
    assert!(paths.contains_key("/"));
}

#[tokio::test]
async fn test_request_id_is_generated() {
    let app = setup_test_app().await;

    let response = app.client().get("/health").await;

    let request_id = response.header("x-request-id");
    assert!(uuid::Uuid::parse_str(request_id.to_str().unwrap()).is_ok());
}

#[tokio::test]
async fn test_request_id_is_propagated() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .get("/health")
        .add_header("X-Request-ID", "trace-abc-123")
        .await;

    assert_eq!(response.header("x-request-id"), "trace-abc-123");
}

#[tokio::test]
async fn test_security_headers_present() {
    let app = setup_test_app().await;

    let response = app.client().get("/").await;

    assert_eq!(response.header("x-content-type-options"), "nosniff");
    assert_eq!(response.header("x-frame-options"), "DENY");
    assert_eq!(response.header("cache-control"), "no-store, private");
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let app = setup_test_app().await;

    let response = app.client().get("/convert/status").await;

    assert_eq!(response.status_code(), 404);
}

#[tokio::test]
async fn test_convert_rejects_get() {
    let app = setup_test_app().await;

    let response = app.client().get("/convert").await;

    assert_eq!(response.status_code(), 405);
}
