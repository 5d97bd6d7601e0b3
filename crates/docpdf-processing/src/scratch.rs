//! Request-scoped scratch storage
//!
//! Every request gets its own job directory under each scratch root, named by a
//! fresh UUID. Paths derived from the uploaded filename therefore never collide
//! across concurrent requests, and cleanup removes the whole job directory.
//!
//! Cleanup is best-effort: failures are logged and swallowed so they can never
//! replace the error (or response) the request is already producing.

use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use uuid::Uuid;

/// The two process-wide scratch roots.
#[derive(Clone, Debug)]
pub struct ScratchSpace {
    upload_root: PathBuf,
    converted_root: PathBuf,
}

impl ScratchSpace {
    pub fn new(upload_root: impl Into<PathBuf>, converted_root: impl Into<PathBuf>) -> Self {
        Self {
            upload_root: upload_root.into(),
            converted_root: converted_root.into(),
        }
    }

    pub fn upload_root(&self) -> &Path {
        &self.upload_root
    }

    pub fn converted_root(&self) -> &Path {
        &self.converted_root
    }

    /// Create both roots if absent. Called once at startup.
    pub async fn ensure_dirs(&self) -> io::Result<()> {
        tokio::fs::create_dir_all(&self.upload_root).await?;
        tokio::fs::create_dir_all(&self.converted_root).await?;
        Ok(())
    }

    /// Allocate an isolated working area for one request. Both roots must exist.
    pub fn begin(&self) -> io::Result<ScratchJob> {
        let id = Uuid::new_v4();
        let prefix = id.to_string();

        // If the second directory fails, the first is removed as it drops.
        let input_dir = tempfile::Builder::new()
            .prefix(&prefix)
            .tempdir_in(&self.upload_root)?;
        let output_dir = tempfile::Builder::new()
            .prefix(&prefix)
            .tempdir_in(&self.converted_root)?;

        tracing::debug!(job_id = %id, "Scratch job allocated");
        Ok(ScratchJob {
            id,
            input_dir,
            output_dir,
            input_path: None,
        })
    }
}

/// Scratch directories owned by a single request.
///
/// Both directories are removed when the job is dropped, so a panic or a
/// request future cancelled by a client disconnect still leaves nothing behind.
/// [`ScratchJob::cleanup`] does the same removal but logs failures.
#[derive(Debug)]
pub struct ScratchJob {
    id: Uuid,
    input_dir: TempDir,
    output_dir: TempDir,
    input_path: Option<PathBuf>,
}

impl ScratchJob {
    /// Directory handed to the converter as its output directory.
    pub fn output_dir(&self) -> &Path {
        self.output_dir.path()
    }

    /// Write the uploaded bytes under `file_name`, overwriting any existing file.
    pub async fn save(&mut self, bytes: &[u8], file_name: &str) -> io::Result<PathBuf> {
        let path = self.input_dir.path().join(file_name);
        tokio::fs::write(&path, bytes).await?;
        tracing::info!(job_id = %self.id, path = %path.display(), size = bytes.len(), "File saved");
        self.input_path = Some(path.clone());
        Ok(path)
    }

    /// Where the converter is expected to leave `<base_name>.<target_format>`.
    pub fn output_path(&self, base_name: &str) -> PathBuf {
        self.output_dir.path().join(format!(
            "{}.{}",
            base_name,
            docpdf_core::constants::TARGET_FORMAT
        ))
    }

    /// Remove the input and output files and both job directories.
    pub async fn cleanup(self) {
        let ScratchJob {
            id,
            input_dir,
            output_dir,
            input_path,
        } = self;

        // Nothing was saved when the request failed before `save`.
        if let Some(input_path) = input_path {
            cleanup_paths(&[input_path]).await;
        }

        for dir in [input_dir, output_dir] {
            let path = dir.path().to_path_buf();
            if let Err(e) = dir.close() {
                if e.kind() != io::ErrorKind::NotFound {
                    tracing::warn!(
                        job_id = %id,
                        path = %path.display(),
                        error = %e,
                        "Failed to remove scratch directory"
                    );
                }
            }
        }
        tracing::debug!(job_id = %id, "Scratch job cleaned up");
    }
}

/// Best-effort removal of files or directories. Never fails.
pub async fn cleanup_paths<P: AsRef<Path>>(paths: &[P]) {
    for path in paths {
        let path = path.as_ref();
        let result = match tokio::fs::symlink_metadata(path).await {
            Ok(meta) if meta.is_dir() => tokio::fs::remove_dir_all(path).await,
            Ok(_) => tokio::fs::remove_file(path).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Failed to remove scratch path"
                );
            }
        }
    }
}
