//! Request logger collaborators
//!
//! Handlers only depend on [`RequestLogger`]; the file-backed logger is the
//! production implementation, the others exist for tests and for running
//! with the access log disabled.

use super::format::AccessLogEntry;
use super::writer::open_log_file;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Record-a-request capability injected into every handler
pub trait RequestLogger: Send + Sync {
    /// Record one served request. Never fails from the caller's view.
    fn record(&self, entry: &AccessLogEntry);
}

/// Appends one line per request to a file, reopening it every time
#[derive(Debug, Clone)]
pub struct FileRequestLogger {
    path: PathBuf,
    format: String,
}

impl FileRequestLogger {
    pub fn new(path: impl Into<PathBuf>, format: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            format: format.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RequestLogger for FileRequestLogger {
    fn record(&self, entry: &AccessLogEntry) {
        let mut file = match open_log_file(&self.path) {
            Ok(f) => f,
            Err(e) => {
                super::log_error(&format!(
                    "Error opening log file '{}': {e}",
                    self.path.display()
                ));
                return;
            }
        };

        // Single write so O_APPEND keeps concurrent lines whole
        let line = format!("{}\n", entry.format(&self.format));
        if let Err(e) = file.write_all(line.as_bytes()) {
            super::log_error(&format!(
                "Error writing to log file '{}': {e}",
                self.path.display()
            ));
        }
    }
}

/// Discards every entry
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopRequestLogger;

impl RequestLogger for NoopRequestLogger {
    fn record(&self, _entry: &AccessLogEntry) {}
}

/// Keeps formatted lines in memory
#[derive(Debug)]
pub struct MemoryRequestLogger {
    format: String,
    lines: Mutex<Vec<String>>,
}

impl MemoryRequestLogger {
    pub fn new(format: impl Into<String>) -> Self {
        Self {
            format: format.into(),
            lines: Mutex::new(Vec::new()),
        }
    }

    /// Snapshot of the recorded lines
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .map(|lines| lines.clone())
            .unwrap_or_default()
    }
}

impl RequestLogger for MemoryRequestLogger {
    fn record(&self, entry: &AccessLogEntry) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push(entry.format(&self.format));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(method: &str, path: &str) -> AccessLogEntry {
        AccessLogEntry::new("127.0.0.1:4000".to_string(), method.to_string(), path.to_string())
    }

    #[test]
    fn test_file_logger_appends_one_line_per_record() {
        let dir = tempfile::tempdir().unwrap();
        let logger = FileRequestLogger::new(dir.path().join("server.log"), "plain");

        logger.record(&entry("GET", "/"));
        logger.record(&entry("POST", "/upload"));

        let content = std::fs::read_to_string(logger.path()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("127.0.0.1:4000 GET /"));
        assert!(lines[1].ends_with("127.0.0.1:4000 POST /upload"));
    }

    #[test]
    fn test_file_logger_swallows_open_failure() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be opened for appending
        let logger = FileRequestLogger::new(dir.path(), "plain");
        logger.record(&entry("GET", "/"));
    }

    #[test]
    fn test_memory_logger_collects_lines() {
        let logger = MemoryRequestLogger::new("$request_method $request_uri");
        logger.record(&entry("GET", "/download"));
        assert_eq!(logger.lines(), vec!["GET /download".to_string()]);
    }
}
