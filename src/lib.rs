//! Minimal HTTP file exchange: multipart uploads stored on local disk,
//! downloads by filename, and one access log line per served request.

pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod routing;
pub mod server;
pub mod storage;

pub use config::{AppState, Config};
pub use error::ExchangeError;
