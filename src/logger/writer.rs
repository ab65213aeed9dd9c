//! Diagnostic writer module
//!
//! Process-level output for lifecycle messages and swallowed failures.
//! Info always goes to stdout; errors go to stderr or an optional file.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Mutex, OnceLock};

/// Global diagnostic writer instance
static LOG_WRITER: OnceLock<LogWriter> = OnceLock::new();

/// Error output target
enum LogTarget {
    /// Write to stderr
    Stderr,
    /// Write to file
    File(Mutex<File>),
}

/// Thread-safe diagnostic writer
pub struct LogWriter {
    error: LogTarget,
}

impl LogWriter {
    fn new(error_log_file: Option<&str>) -> io::Result<Self> {
        let error = match error_log_file {
            Some(path) => LogTarget::File(Mutex::new(open_log_file(path)?)),
            None => LogTarget::Stderr,
        };
        Ok(Self { error })
    }

    /// Write info message to stdout
    #[allow(clippy::unused_self)]
    pub fn write_info(&self, message: &str) {
        println!("{message}");
    }

    /// Write to error log
    pub fn write_error(&self, message: &str) {
        match &self.error {
            LogTarget::Stderr => eprintln!("{message}"),
            LogTarget::File(file) => {
                if let Ok(mut f) = file.lock() {
                    if writeln!(f, "{message}").is_err() {
                        eprintln!("{message}");
                    }
                }
            }
        }
    }
}

/// Open or create a log file for appending
pub(crate) fn open_log_file(path: impl AsRef<Path>) -> io::Result<File> {
    let path = path.as_ref();
    // Create parent directories if they don't exist
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    OpenOptions::new().create(true).append(true).open(path)
}

/// Initialize the global diagnostic writer
///
/// This should be called once at application startup.
/// Returns error if the error log file cannot be opened.
pub fn init(error_log_file: Option<&str>) -> io::Result<()> {
    let writer = LogWriter::new(error_log_file)?;
    LOG_WRITER.set(writer).map_err(|_| {
        io::Error::new(
            io::ErrorKind::AlreadyExists,
            "Log writer already initialized",
        )
    })
}

/// Get the global diagnostic writer, if initialized
pub fn get() -> Option<&'static LogWriter> {
    LOG_WRITER.get()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_log_file_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deeper/error.log");
        let mut file = open_log_file(&path).unwrap();
        writeln!(file, "first").unwrap();
        drop(file);

        let mut file = open_log_file(&path).unwrap();
        writeln!(file, "second").unwrap();
        drop(file);

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "first\nsecond\n");
    }

    #[test]
    fn test_file_target_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("error.log");
        let writer = LogWriter::new(path.to_str()).unwrap();
        writer.write_error("[ERROR] boom");

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "[ERROR] boom\n");
    }
}
