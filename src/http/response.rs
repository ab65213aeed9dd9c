//! HTTP response building module
//!
//! Builders for every response the file exchange sends.

use crate::error::ExchangeError;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use http_body_util::combinators::UnsyncBoxBody;
use http_body_util::{BodyExt, Full, StreamBody};
use hyper::body::{Bytes, Frame};
use hyper::header::{ALLOW, CONTENT_LENGTH, CONTENT_TYPE, LAST_MODIFIED};
use hyper::{Response, StatusCode};
use std::time::SystemTime;
use tokio_util::io::ReaderStream;

/// Body of every response: in-memory for fixed pages and messages,
/// streamed from disk for downloads
pub type ResponseBody = UnsyncBoxBody<Bytes, std::io::Error>;

/// In-memory response body
pub fn full(data: impl Into<Bytes>) -> ResponseBody {
    Full::new(data.into())
        .map_err(|never| match never {})
        .boxed_unsync()
}

/// Response body that reads `file` chunk by chunk as the client consumes it
pub fn file_stream(file: tokio::fs::File) -> ResponseBody {
    StreamBody::new(ReaderStream::new(file).map_ok(Frame::data)).boxed_unsync()
}

/// Build plaintext response
pub fn build_text_response(status: StatusCode, message: &str) -> Response<ResponseBody> {
    Response::builder()
        .status(status)
        .header(CONTENT_TYPE, "text/plain; charset=utf-8")
        .header(CONTENT_LENGTH, message.len())
        .body(full(message.to_owned()))
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            Response::new(full(message.to_owned()))
        })
}

/// Build the response for a failed request
pub fn build_error_response(err: &ExchangeError) -> Response<ResponseBody> {
    let mut response = build_text_response(err.status(), err.public_message());
    if let ExchangeError::MethodNotAllowed(_) = err {
        response
            .headers_mut()
            .insert(ALLOW, hyper::header::HeaderValue::from_static("POST"));
    }
    response
}

/// Build generic HTML response
pub fn build_html_response(content: &'static str, is_head: bool) -> Response<ResponseBody> {
    let body = if is_head {
        Bytes::new()
    } else {
        Bytes::from_static(content.as_bytes())
    };

    Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, "text/html; charset=utf-8")
        .header(CONTENT_LENGTH, content.len())
        .body(full(body))
        .unwrap_or_else(|e| {
            log_build_error("HTML", &e);
            Response::new(full(Bytes::new()))
        })
}

/// Build stored file response.
///
/// `content_length` comes from the file's metadata; `body` is the file
/// stream, or empty for `HEAD`.
pub fn build_file_response(
    body: ResponseBody,
    content_length: u64,
    content_type: &str,
    modified: Option<SystemTime>,
) -> Response<ResponseBody> {
    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, content_type)
        .header(CONTENT_LENGTH, content_length);
    if let Some(modified) = modified {
        builder = builder.header(LAST_MODIFIED, http_date(modified));
    }

    builder.body(body).unwrap_or_else(|e| {
        log_build_error("200", &e);
        Response::new(full(Bytes::new()))
    })
}

/// IMF-fixdate, as used by `Last-Modified`
pub fn http_date(time: SystemTime) -> String {
    DateTime::<Utc>::from(time)
        .format("%a, %d %b %Y %H:%M:%S GMT")
        .to_string()
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}
