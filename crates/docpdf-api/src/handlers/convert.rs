//! Document conversion endpoint

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use crate::utils::upload::{attachment_disposition, extract_upload, UploadedFile};
use axum::{
    body::Body,
    extract::{
        multipart::{Multipart, MultipartRejection},
        State,
    },
    http::{header, StatusCode},
    response::Response,
};
use docpdf_core::constants::PDF_CONTENT_TYPE;
use docpdf_core::AppError;
use docpdf_processing::{ConversionOutcome, ScratchJob, ValidatedUpload};
use std::sync::Arc;
use tokio_util::io::ReaderStream;

/// Converted document opened for streaming, independent of the scratch files.
struct ConvertedDocument {
    file: tokio::fs::File,
    len: u64,
    download_name: String,
}

#[utoipa::path(
    post,
    path = "/convert",
    tag = "conversion",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Converted PDF, offered as an attachment", content_type = "application/pdf"),
        (status = 400, description = "No file, empty filename, or unsupported file type", body = ErrorResponse),
        (status = 413, description = "Upload exceeds the configured size limit", body = ErrorResponse),
        (status = 500, description = "Conversion failed or timed out", body = ErrorResponse)
    )
)]
pub async fn convert_document(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, HttpAppError> {
    let upload = extract_upload(multipart).await?;
    let validated = state.validator.validate(&upload.filename)?;

    tracing::info!(
        filename = %upload.filename,
        saved_as = %validated.file_name,
        content_type = ?upload.content_type,
        size = upload.data.len(),
        "Starting conversion"
    );

    let mut job = state.scratch.begin()?;
    let result = convert_in_job(&state, &mut job, &upload, &validated).await;

    // The open handle keeps the PDF readable after its directory is removed.
    job.cleanup().await;

    let document = result?;
    tracing::info!(
        download_name = %document.download_name,
        size = document.len,
        "Conversion complete"
    );
    build_pdf_response(document)
}

async fn convert_in_job(
    state: &AppState,
    job: &mut ScratchJob,
    upload: &UploadedFile,
    validated: &ValidatedUpload,
) -> Result<ConvertedDocument, HttpAppError> {
    let input_path = job.save(&upload.data, &validated.file_name).await?;
    let expected_output = job.output_path(&validated.base_name);

    let result = state.converter.convert(&input_path, job.output_dir()).await;

    match ConversionOutcome::resolve(result, expected_output).await {
        ConversionOutcome::Converted(path) => {
            let file = tokio::fs::File::open(&path).await?;
            let len = file.metadata().await?.len();
            Ok(ConvertedDocument {
                file,
                len,
                download_name: validated.download_name(),
            })
        }
        ConversionOutcome::OutputMissing(path) => {
            Err(AppError::OutputMissing(path.display().to_string()).into())
        }
        ConversionOutcome::Failed(err) => Err(err.into()),
    }
}

fn build_pdf_response(document: ConvertedDocument) -> Result<Response, HttpAppError> {
    let body = Body::from_stream(ReaderStream::new(document.file));

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, PDF_CONTENT_TYPE)
        .header(header::CONTENT_LENGTH, document.len)
        .header(
            header::CONTENT_DISPOSITION,
            attachment_disposition(&document.download_name),
        )
        .body(body)
        .map_err(|e| AppError::Internal(format!("Failed to build response: {}", e)).into())
}
