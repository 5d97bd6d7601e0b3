//! Docpdf Processing Library
//!
//! Everything between an accepted upload and a finished PDF on disk: filename
//! validation, per-request scratch space, and the external converter process.

pub mod converter;
pub mod scratch;
pub mod validator;

pub use converter::{ConversionError, ConversionOutcome, DocumentConverter, LibreOfficeConverter};
pub use scratch::{cleanup_paths, ScratchJob, ScratchSpace};
pub use validator::{sanitize_stem, DocumentValidator, ValidatedUpload, ValidationError};
