//! Service-wide constants

/// Input extensions accepted by `/convert` (compared lowercase).
pub const ALLOWED_EXTENSIONS: [&str; 2] = ["docx", "doc"];

/// Format handed to the converter and extension of every produced file.
pub const TARGET_FORMAT: &str = "pdf";

/// Content type of converted documents.
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Multipart field carrying the uploaded document.
pub const FILE_FIELD: &str = "file";

/// Human-readable service name reported by `GET /`.
pub const SERVICE_TITLE: &str = "DOCX to PDF Converter";

/// Version reported by `GET /` and the OpenAPI document.
pub const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");
