use axum_test::multipart::{MultipartForm, Part};

pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Bytes standing in for a document; the test converters never parse them.
pub fn sample_document(tag: &str) -> Vec<u8> {
    let mut bytes = b"PK\x03\x04".to_vec();
    bytes.extend_from_slice(format!("fake word document: {}", tag).as_bytes());
    bytes
}

pub fn file_form(file_name: &str, data: Vec<u8>) -> MultipartForm {
    MultipartForm::new().add_part(
        "file",
        Part::bytes(data).file_name(file_name).mime_type(DOCX_MIME),
    )
}
