//! Docpdf API Library
//!
//! This crate provides the HTTP handlers, middleware, and application setup for
//! the document-to-PDF conversion service.

mod api_doc;
mod handlers;
mod middleware;
mod telemetry;
mod utils;

// Public modules
pub mod error;
pub mod setup;
pub mod state;

// Re-exports
pub use api_doc::ApiDoc;
pub use error::{ErrorResponse, HttpAppError};
pub use state::AppState;
