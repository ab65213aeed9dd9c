//! Request handler module
//!
//! Responsible for request routing dispatch and the three file exchange
//! endpoints: home page, upload, and download.

pub mod download;
pub mod home;
pub mod router;
pub mod upload;

// Re-export main entry point
pub use router::{handle_request, RequestContext};
