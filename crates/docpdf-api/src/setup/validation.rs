//! Configuration validation
//!
//! Validates critical configuration values at startup to catch misconfigurations early.

use anyhow::Result;
use docpdf_core::Config;
use std::path::Path;

/// Validate critical configuration values
///
/// Hard errors come from `Config::validate`; the remaining checks only warn,
/// since the service can still answer `/health` and `/` without them.
pub fn validate_config(config: &Config) -> Result<()> {
    config.validate()?;

    let env_var = std::env::var("ENVIRONMENT")
        .or_else(|_| std::env::var("APP_ENV"))
        .ok();
    if config.is_production() && env_var.is_none() {
        tracing::warn!("Production mode detected but ENVIRONMENT/APP_ENV not set");
    }

    if config.upload_dir() == config.converted_dir() {
        tracing::warn!(
            dir = %config.upload_dir().display(),
            "UPLOAD_DIR and CONVERTED_DIR are the same directory"
        );
    }

    if config.conversion_timeout_secs() > 600 {
        tracing::warn!(
            conversion_timeout_secs = config.conversion_timeout_secs(),
            "CONVERSION_TIMEOUT_SECS is very high - stuck conversions will hold requests open"
        );
    }

    Ok(())
}

/// Log a warning when the converter program cannot be found.
///
/// Startup continues: every `/convert` request will then fail with a 500.
pub fn warn_if_converter_missing(config: &Config) {
    let Some(program) = config.converter_command().first() else {
        return;
    };
    if !program_exists(program) {
        tracing::warn!(
            program = %program,
            "Converter program not found; conversions will fail until it is installed"
        );
    }
}

/// Whether `program` names an existing file, directly or via `PATH`.
fn program_exists(program: &str) -> bool {
    let path = Path::new(program);
    if path.components().count() > 1 {
        return path.is_file();
    }
    std::env::var_os("PATH")
        .map(|paths| std::env::split_paths(&paths).any(|dir| dir.join(program).is_file()))
        .unwrap_or(false)
}
