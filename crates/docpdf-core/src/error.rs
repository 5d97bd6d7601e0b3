//! Error types module
//!
//! All failures that can reach the HTTP boundary are unified under `AppError`.
//! Each variant describes its own response through `ErrorMetadata`; diagnostic
//! detail stays in the `Display` output (logged) and never reaches the client.

use std::io;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues like resource limits
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "CONVERSION_FAILED")
    fn error_code(&self) -> &'static str;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("No file found")]
    MissingFile,

    #[error("No file selected")]
    EmptyFilename,

    #[error("File type not allowed: {0}")]
    UnsupportedFileType(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("File too large: {0}")]
    PayloadTooLarge(String),

    #[error("Conversion failed: {0}")]
    ConversionFailed(String),

    #[error("Conversion timed out after {secs}s")]
    ConversionTimeout { secs: u64 },

    #[error("Converter reported success but produced no output at {0}")]
    OutputMissing(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error with source")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Internal(format!("IO error: {}", err))
    }
}

const CONVERSION_ERROR_MESSAGE: &str = "Error converting file";
const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";
const UNSUPPORTED_TYPE_MESSAGE: &str =
    "File type not allowed. Only .docx and .doc files are accepted.";

/// Static metadata for each variant: (http_status, error_code, log_level).
fn app_error_static_metadata(err: &AppError) -> (u16, &'static str, LogLevel) {
    match err {
        AppError::MissingFile => (400, "MISSING_FILE", LogLevel::Debug),
        AppError::EmptyFilename => (400, "EMPTY_FILENAME", LogLevel::Debug),
        AppError::UnsupportedFileType(_) => (400, "UNSUPPORTED_FILE_TYPE", LogLevel::Debug),
        AppError::InvalidInput(_) => (400, "INVALID_INPUT", LogLevel::Debug),
        AppError::PayloadTooLarge(_) => (413, "PAYLOAD_TOO_LARGE", LogLevel::Debug),
        AppError::ConversionFailed(_) => (500, "CONVERSION_FAILED", LogLevel::Error),
        AppError::ConversionTimeout { .. } => (500, "CONVERSION_TIMEOUT", LogLevel::Error),
        AppError::OutputMissing(_) => (500, "OUTPUT_MISSING", LogLevel::Error),
        AppError::Internal(_) => (500, "INTERNAL_ERROR", LogLevel::Error),
        AppError::InternalWithSource { .. } => (500, "INTERNAL_ERROR", LogLevel::Error),
    }
}

impl AppError {
    /// Get the error type name for structured logs
    pub fn error_type(&self) -> &str {
        match self {
            AppError::MissingFile => "MissingFile",
            AppError::EmptyFilename => "EmptyFilename",
            AppError::UnsupportedFileType(_) => "UnsupportedFileType",
            AppError::InvalidInput(_) => "InvalidInput",
            AppError::PayloadTooLarge(_) => "PayloadTooLarge",
            AppError::ConversionFailed(_) => "ConversionFailed",
            AppError::ConversionTimeout { .. } => "ConversionTimeout",
            AppError::OutputMissing(_) => "OutputMissing",
            AppError::Internal(_) => "Internal",
            AppError::InternalWithSource { .. } => "Internal",
        }
    }

    /// Get detailed error information including error chain
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = self.to_string();

        let mut source = self.source();
        let mut depth = 0;
        while let Some(err) = source {
            depth += 1;
            if depth > 5 {
                details.push_str("\n  ... (truncated)");
                break;
            }
            details.push_str(&format!("\n  Caused by: {}", err));
            source = err.source();
        }

        details
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).2
    }

    fn client_message(&self) -> String {
        match self {
            AppError::MissingFile => "No file found".to_string(),
            AppError::EmptyFilename => "No file selected".to_string(),
            AppError::UnsupportedFileType(_) => UNSUPPORTED_TYPE_MESSAGE.to_string(),
            AppError::InvalidInput(ref msg) => msg.clone(),
            AppError::PayloadTooLarge(ref msg) => msg.clone(),
            AppError::ConversionFailed(_)
            | AppError::ConversionTimeout { .. }
            | AppError::OutputMissing(_) => CONVERSION_ERROR_MESSAGE.to_string(),
            AppError::Internal(_) | AppError::InternalWithSource { .. } => {
                INTERNAL_ERROR_MESSAGE.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_metadata_validation_errors() {
        let err = AppError::MissingFile;
        assert_eq!(err.http_status_code(), 400);
        assert_eq!(err.client_message(), "No file found");
        assert_eq!(err.log_level(), LogLevel::Debug);

        let err = AppError::EmptyFilename;
        assert_eq!(err.http_status_code(), 400);
        assert_eq!(err.client_message(), "No file selected");

        let err = AppError::UnsupportedFileType("txt".to_string());
        assert_eq!(err.http_status_code(), 400);
        assert_eq!(err.error_code(), "UNSUPPORTED_FILE_TYPE");
        assert_eq!(
            err.client_message(),
            "File type not allowed. Only .docx and .doc files are accepted."
        );
    }

    #[test]
    fn test_conversion_errors_share_client_message() {
        let errors = [
            AppError::ConversionFailed("exit status 1: boom".to_string()),
            AppError::ConversionTimeout { secs: 60 },
            AppError::OutputMissing("/tmp/converted/x/report.pdf".to_string()),
        ];
        for err in errors {
            assert_eq!(err.http_status_code(), 500);
            assert_eq!(err.client_message(), "Error converting file");
            assert_eq!(err.log_level(), LogLevel::Error);
        }
    }

    #[test]
    fn test_internal_errors_hide_details() {
        let err = AppError::Internal("disk on fire at /var/lib".to_string());
        assert_eq!(err.http_status_code(), 500);
        assert_eq!(err.client_message(), "Internal server error");
        assert!(err.detailed_message().contains("disk on fire"));

        let err = AppError::from(anyhow::anyhow!("root cause"));
        assert_eq!(err.error_type(), "Internal");
        assert_eq!(err.client_message(), "Internal server error");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        match AppError::from(io_err) {
            AppError::Internal(msg) => assert!(msg.contains("denied")),
            other => panic!("Expected Internal variant, got {:?}", other),
        }
    }

    #[test]
    fn test_payload_too_large_status() {
        let err = AppError::PayloadTooLarge("60 MB exceeds 50 MB".to_string());
        assert_eq!(err.http_status_code(), 413);
        assert_eq!(err.client_message(), "60 MB exceeds 50 MB");
    }
}
