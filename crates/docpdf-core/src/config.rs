//! Configuration module
//!
//! Configuration is read once from the environment at startup and then passed
//! explicitly to whatever needs it. Scratch directories in particular are never
//! looked up globally, so tests can point each server at its own temp dirs.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

// Common constants
const SERVER_PORT: u16 = 8080;
const SERVICE_NAME: &str = "docx-to-pdf-converter";
const UPLOAD_DIR: &str = "/tmp/uploads";
const CONVERTED_DIR: &str = "/tmp/converted";
const CONVERTER_COMMAND: &str = "libreoffice";
const CONVERSION_TIMEOUT_SECS: u64 = 60;
const MAX_UPLOAD_SIZE_MB: usize = 50;

/// Console log output format
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "compact" | "text" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            other => Err(anyhow::anyhow!(
                "LOG_FORMAT must be 'compact' or 'json', got '{}'",
                other
            )),
        }
    }
}

/// Settings every deployment of the service carries
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub environment: String,
    pub service_name: String,
    pub log_format: LogFormat,
}

/// Converter service configuration
#[derive(Clone, Debug)]
pub struct ConverterConfig {
    pub base: BaseConfig,
    pub upload_dir: PathBuf,
    pub converted_dir: PathBuf,
    /// Program followed by any leading arguments, e.g. `["xvfb-run", "soffice"]`.
    pub converter_command: Vec<String>,
    pub conversion_timeout_secs: u64,
    pub max_upload_size_bytes: usize,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<ConverterConfig>);

impl Config {
    pub fn new(config: ConverterConfig) -> Self {
        Config(Box::new(config))
    }

    fn as_converter(&self) -> &ConverterConfig {
        &self.0
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let environment = self.as_converter().base.environment.to_lowercase();
        environment == "production" || environment == "prod"
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        let config = ConverterConfig::from_env()?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.as_converter().validate()
    }

    pub fn server_port(&self) -> u16 {
        self.as_converter().base.server_port
    }

    pub fn environment(&self) -> &str {
        &self.as_converter().base.environment
    }

    pub fn service_name(&self) -> &str {
        &self.as_converter().base.service_name
    }

    pub fn log_format(&self) -> LogFormat {
        self.as_converter().base.log_format
    }

    pub fn upload_dir(&self) -> &PathBuf {
        &self.as_converter().upload_dir
    }

    pub fn converted_dir(&self) -> &PathBuf {
        &self.as_converter().converted_dir
    }

    pub fn converter_command(&self) -> &[String] {
        &self.as_converter().converter_command
    }

    pub fn conversion_timeout_secs(&self) -> u64 {
        self.as_converter().conversion_timeout_secs
    }

    pub fn max_upload_size_bytes(&self) -> usize {
        self.as_converter().max_upload_size_bytes
    }
}

/// Split a command line on whitespace. Quoting is not supported.
fn parse_command(raw: &str) -> Vec<String> {
    raw.split_whitespace().map(str::to_string).collect()
}

impl ConverterConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from `lookup`, which maps a variable name to its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = lookup("ENVIRONMENT")
            .or_else(|| lookup("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let log_format = match lookup("LOG_FORMAT") {
            Some(raw) => raw.parse()?,
            None => LogFormat::default(),
        };

        let base = BaseConfig {
            server_port: lookup("PORT")
                .unwrap_or_else(|| SERVER_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            environment,
            service_name: lookup("SERVICE_NAME").unwrap_or_else(|| SERVICE_NAME.to_string()),
            log_format,
        };

        let max_upload_size_mb = lookup("MAX_UPLOAD_SIZE_MB")
            .and_then(|raw| raw.parse::<usize>().ok())
            .unwrap_or(MAX_UPLOAD_SIZE_MB);
        let max_upload_size_bytes = max_upload_size_mb
            .checked_mul(1024 * 1024)
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "MAX_UPLOAD_SIZE_MB is too large: {} MB overflows a byte count",
                    max_upload_size_mb
                )
            })?;

        Ok(ConverterConfig {
            base,
            upload_dir: lookup("UPLOAD_DIR")
                .unwrap_or_else(|| UPLOAD_DIR.to_string())
                .into(),
            converted_dir: lookup("CONVERTED_DIR")
                .unwrap_or_else(|| CONVERTED_DIR.to_string())
                .into(),
            converter_command: parse_command(
                &lookup("CONVERTER_COMMAND").unwrap_or_else(|| CONVERTER_COMMAND.to_string()),
            ),
            conversion_timeout_secs: lookup("CONVERSION_TIMEOUT_SECS")
                .and_then(|raw| raw.parse().ok())
                .unwrap_or(CONVERSION_TIMEOUT_SECS),
            max_upload_size_bytes,
        })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.converter_command.is_empty() {
            return Err(anyhow::anyhow!("CONVERTER_COMMAND cannot be empty"));
        }

        if self.conversion_timeout_secs == 0 {
            return Err(anyhow::anyhow!(
                "CONVERSION_TIMEOUT_SECS must be greater than 0"
            ));
        }

        if self.max_upload_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_UPLOAD_SIZE_MB must be greater than 0"));
        }

        Ok(())
    }
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            base: BaseConfig {
                server_port: SERVER_PORT,
                environment: "development".to_string(),
                service_name: SERVICE_NAME.to_string(),
                log_format: LogFormat::default(),
            },
            upload_dir: UPLOAD_DIR.into(),
            converted_dir: CONVERTED_DIR.into(),
            converter_command: parse_command(CONVERTER_COMMAND),
            conversion_timeout_secs: CONVERSION_TIMEOUT_SECS,
            max_upload_size_bytes: MAX_UPLOAD_SIZE_MB * 1024 * 1024,
        }
    }
}
