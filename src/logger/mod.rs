//! Logger module
//!
//! Provides logging utilities for the file exchange server:
//! - Server lifecycle logging on the diagnostic stream
//! - Per-request access logging through [`RequestLogger`]
//! - Error and warning logging

mod access;
mod format;
pub mod writer;

pub use access::{FileRequestLogger, MemoryRequestLogger, NoopRequestLogger, RequestLogger};
pub use format::AccessLogEntry;

use crate::config::Config;
use std::net::SocketAddr;

/// Initialize the diagnostic writer with configuration
///
/// Should be called once at application startup.
pub fn init(config: &Config) -> std::io::Result<()> {
    writer::init(config.logging.error_log_file.as_deref())
}

/// Write to info stream
fn write_info(message: &str) {
    match writer::get() {
        Some(w) => w.write_info(message),
        None => println!("{message}"),
    }
}

/// Write to error stream
fn write_error(message: &str) {
    match writer::get() {
        Some(w) => w.write_error(message),
        None => eprintln!("{message}"),
    }
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    write_info("======================================");
    write_info("File exchange server started");
    write_info(&format!("Listening on: http://{addr}"));
    write_info(&format!(
        "Upload directory: {}",
        config.storage.upload_dir.display()
    ));
    if config.logging.access_log {
        write_info(&format!(
            "Access log: {} ({})",
            config.logging.access_log_file.display(),
            config.logging.access_log_format
        ));
    } else {
        write_info("Access log: disabled");
    }
    if let Some(ref path) = config.logging.error_log_file {
        write_info(&format!("Error log: {path}"));
    }
    if let Some(workers) = config.server.workers {
        write_info(&format!("Worker threads: {workers}"));
    }
    if let Some(timeout) = config.performance.connection_timeout {
        write_info(&format!("Connection timeout: {timeout}s"));
    }
    if let Some(limit) = config.http.max_upload_size {
        write_info(&format!("Max upload size: {limit} bytes"));
    }
    write_info("======================================\n");
}

/// Record a received stop signal on the diagnostic stream
pub fn log_signal(signal: &str) {
    write_info(&signal_message(signal));
}

fn signal_message(signal: &str) -> String {
    format!("[SIGNAL] {signal} received, shutting down")
}

pub fn log_shutdown(active: usize) {
    write_info(&format!(
        "[Shutdown] Listener closed, {active} connection(s) still finishing"
    ));
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    write_error(&format!("[ERROR] Failed to serve connection: {err:?}"));
}

pub fn log_error(message: &str) {
    write_error(&format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write_error(&format!("[WARN] {message}"));
}
