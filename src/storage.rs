//! Upload directory access
//!
//! Files are keyed by base filename only. Nothing here locks: concurrent
//! writers of the same name race, and readers may see partial content.

use crate::error::ExchangeError;
use crate::logger;
use std::fs::Metadata;
use std::io;
use std::path::{Component, Path, PathBuf};
use tokio::fs;

/// A stored file resolved for download
#[derive(Debug)]
pub struct StoredFile {
    pub path: PathBuf,
    pub metadata: Metadata,
}

#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    pub const fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the upload directory and any missing parents
    pub fn ensure_dir(&self) -> io::Result<()> {
        std::fs::create_dir_all(&self.dir)
    }

    /// Path an upload named `base` is written to
    pub fn upload_path(&self, base: &str) -> PathBuf {
        self.dir.join(base)
    }

    /// Create or truncate the file for an upload
    pub async fn create(&self, base: &str) -> io::Result<fs::File> {
        fs::File::create(self.upload_path(base)).await
    }

    /// Resolve a client-supplied name to a regular file inside the upload directory
    pub async fn resolve(&self, name: &str) -> Result<StoredFile, ExchangeError> {
        let not_found = || ExchangeError::NotFound(name.to_string());

        let relative = Path::new(name);
        if !relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)))
        {
            logger::log_warning(&format!("Rejected download path outside uploads: {name:?}"));
            return Err(not_found());
        }

        let dir_canonical = fs::canonicalize(&self.dir).await.map_err(|e| {
            logger::log_error(&format!(
                "Upload directory inaccessible '{}': {e}",
                self.dir.display()
            ));
            not_found()
        })?;

        // Missing files are the common case, no need to log
        let path = fs::canonicalize(self.dir.join(relative))
            .await
            .map_err(|_| not_found())?;
        if !path.starts_with(&dir_canonical) {
            logger::log_warning(&format!(
                "Path traversal attempt blocked: {name:?} -> {}",
                path.display()
            ));
            return Err(not_found());
        }

        let metadata = fs::metadata(&path).await.map_err(|_| not_found())?;
        if !metadata.is_file() {
            return Err(not_found());
        }

        Ok(StoredFile { path, metadata })
    }
}

/// Final segment of a client-supplied filename, with directory components discarded
///
/// Both `/` and `\` count as separators. Returns `None` when nothing usable
/// is left (empty, `.` or `..`).
pub fn base_filename(name: &str) -> Option<&str> {
    let trimmed = name.trim_end_matches(['/', '\\']);
    let base = trimmed.rsplit(['/', '\\']).next().unwrap_or(trimmed);
    match base {
        "" | "." | ".." => None,
        base => Some(base),
    }
}
