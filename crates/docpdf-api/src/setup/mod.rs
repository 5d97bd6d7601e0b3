//! Application setup and initialization
//!
//! Everything main.rs needs to go from a loaded `Config` to a running router.

pub mod routes;
pub mod server;
pub mod validation;

use crate::state::AppState;
use anyhow::{Context, Result};
use docpdf_core::Config;
use docpdf_processing::LibreOfficeConverter;
use std::sync::Arc;
use std::time::Duration;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Validate configuration first - fail fast on misconfiguration
    validation::validate_config(&config).context("Configuration validation failed")?;

    crate::telemetry::init_telemetry(
        config.log_format(),
        config.service_name(),
        config.environment(),
    )
    .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!("Configuration loaded and validated successfully");

    validation::warn_if_converter_missing(&config);

    let converter = LibreOfficeConverter::from_command(
        config.converter_command(),
        Duration::from_secs(config.conversion_timeout_secs()),
    )
    .context("CONVERTER_COMMAND is empty")?;

    let state = Arc::new(AppState::new(config.clone(), Arc::new(converter)));

    state
        .scratch
        .ensure_dirs()
        .await
        .context("Failed to create scratch directories")?;
    tracing::info!(
        upload_dir = %state.scratch.upload_root().display(),
        converted_dir = %state.scratch.converted_root().display(),
        "Scratch directories ready"
    );

    let router = routes::setup_routes(&config, state.clone());

    Ok((state, router))
}
