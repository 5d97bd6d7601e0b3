//! Multipart upload extraction

use axum::extract::multipart::{Multipart, MultipartError, MultipartRejection};
use axum::http::StatusCode;
use bytes::Bytes;
use docpdf_core::constants::FILE_FIELD;
use docpdf_core::AppError;

/// A file part pulled out of a multipart body.
#[derive(Debug)]
pub struct UploadedFile {
    /// Filename exactly as the client sent it (may be empty).
    pub filename: String,
    pub content_type: Option<String>,
    pub data: Bytes,
}

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(err.body_text())
    } else {
        AppError::InvalidInput(format!("Failed to read multipart: {}", err.body_text()))
    }
}

/// Extract the uploaded document from the `file` field.
///
/// A request that is not multipart at all, or has no `file` part carrying a
/// filename, yields [`AppError::MissingFile`]. The first such part wins; the
/// rest of the body is not read.
pub async fn extract_upload(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<UploadedFile, AppError> {
    let mut multipart = match multipart {
        Ok(multipart) => multipart,
        Err(rejection) => {
            tracing::debug!(error = %rejection.body_text(), "Request is not multipart");
            return Err(AppError::MissingFile);
        }
    };

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        // Parts without a filename are plain form values, not file uploads.
        let Some(filename) = field.file_name().map(|s| s.to_string()) else {
            continue;
        };
        let content_type = field.content_type().map(|s| s.to_string());

        let data = field.bytes().await.map_err(multipart_error)?;

        tracing::debug!(
            filename = %filename,
            content_type = ?content_type,
            size = data.len(),
            "Received upload"
        );
        return Ok(UploadedFile {
            filename,
            content_type,
            data,
        });
    }

    Err(AppError::MissingFile)
}

/// `Content-Disposition` value offering `file_name` as a download.
///
/// Names reaching here are already reduced to `[A-Za-z0-9._-]`, so no quoting
/// or encoding is needed.
pub fn attachment_disposition(file_name: &str) -> String {
    format!("attachment; filename={}", file_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attachment_disposition() {
        assert_eq!(
            attachment_disposition("report.pdf"),
            "attachment; filename=report.pdf"
        );
    }
}
