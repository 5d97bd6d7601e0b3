//! Docpdf Core Library
//!
//! This crate provides the configuration, constants, and error types shared by
//! the processing and API crates.

pub mod config;
pub mod constants;
pub mod error;

// Re-export commonly used types
pub use config::{BaseConfig, Config, ConverterConfig, LogFormat};
pub use error::{AppError, ErrorMetadata, LogLevel};
