#![allow(dead_code)]

pub mod fixtures;

use axum_test::TestServer;
use docpdf_api::setup::routes::setup_routes;
use docpdf_api::AppState;
use docpdf_core::{Config, ConverterConfig};
use docpdf_processing::{ConversionError, DocumentConverter, LibreOfficeConverter};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

/// Copies the input (`$6`) to `<outdir>/<stem>.pdf` (`$5`), like a real converter would.
pub const COPY_SCRIPT: &str = r#"name=$(basename "$6"); cp "$6" "$5/${name%.*}.pdf""#;

/// Upload limit used by every test app.
pub const TEST_MAX_UPLOAD_BYTES: usize = 1024 * 1024;

pub struct TestApp {
    pub server: TestServer,
    pub upload_root: PathBuf,
    pub converted_root: PathBuf,
    _temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    /// Entries left under both scratch roots.
    pub fn scratch_entries(&self) -> usize {
        entry_count(&self.upload_root) + entry_count(&self.converted_root)
    }
}

fn entry_count(dir: &Path) -> usize {
    std::fs::read_dir(dir).map(|d| d.count()).unwrap_or(0)
}

/// Converter command that runs `script` through `sh -c`.
///
/// Conversion arguments land in `$1..$6`:
/// `--headless --convert-to pdf --outdir <dir> <input>`.
pub fn script_converter(script: &str, timeout: Duration) -> LibreOfficeConverter {
    LibreOfficeConverter::new("sh", timeout).with_leading_args(vec![
        "-c".to_string(),
        script.to_string(),
        "fake-soffice".to_string(),
    ])
}

/// App whose converter copies the input to the expected output.
pub async fn setup_test_app() -> TestApp {
    setup_test_app_with_script(COPY_SCRIPT).await
}

pub async fn setup_test_app_with_script(script: &str) -> TestApp {
    setup_test_app_with_timeout(script, Duration::from_secs(10)).await
}

pub async fn setup_test_app_with_timeout(script: &str, timeout: Duration) -> TestApp {
    setup_test_app_with_converter(Arc::new(script_converter(script, timeout))).await
}

pub async fn setup_test_app_with_converter(converter: Arc<dyn DocumentConverter>) -> TestApp {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let upload_root = temp_dir.path().join("uploads");
    let converted_root = temp_dir.path().join("converted");

    let config = Config::new(ConverterConfig {
        upload_dir: upload_root.clone(),
        converted_dir: converted_root.clone(),
        max_upload_size_bytes: TEST_MAX_UPLOAD_BYTES,
        ..ConverterConfig::default()
    });

    let state = Arc::new(AppState::new(config.clone(), converter));
    state
        .scratch
        .ensure_dirs()
        .await
        .expect("Failed to create scratch directories");

    let app = setup_routes(&config, state);
    let server = TestServer::new(app).expect("Failed to create test server");

    TestApp {
        server,
        upload_root,
        converted_root,
        _temp_dir: temp_dir,
    }
}

/// Counts invocations and never produces output.
#[derive(Default)]
pub struct RecordingConverter {
    calls: AtomicUsize,
}

impl RecordingConverter {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl DocumentConverter for RecordingConverter {
    async fn convert(&self, _input_path: &Path, _output_dir: &Path) -> Result<(), ConversionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Panics mid-conversion, after the upload has been saved.
pub struct PanickingConverter;

#[async_trait::async_trait]
impl DocumentConverter for PanickingConverter {
    async fn convert(&self, input_path: &Path, _output_dir: &Path) -> Result<(), ConversionError> {
        assert!(input_path.exists(), "upload should be saved before conversion");
        panic!("converter crashed");
    }
}
