//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: route lookup, dispatch, and
//! turning handler failures into responses.

use crate::config::AppState;
use crate::error::ExchangeError;
use crate::handler::{download, home, upload};
use crate::http::{self, ResponseBody};
use crate::logger::{self, AccessLogEntry, RequestLogger};
use crate::routing::Endpoint;
use hyper::body::{Body, Bytes};
use hyper::header::{HeaderValue, CONTENT_LENGTH, SERVER};
use percent_encoding::percent_decode_str;
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

/// Boxed error accepted from request bodies
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Request context encapsulating information needed by every handler
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub remote_addr: SocketAddr,
    pub method: Method,
    pub path: String,
}

impl RequestContext {
    pub fn is_head(&self) -> bool {
        self.method == Method::HEAD
    }

    /// Hand a served request to the request logger
    pub fn record(&self, request_logger: &dyn RequestLogger, response: &Response<ResponseBody>) {
        let body_bytes = if self.is_head() {
            0
        } else {
            response
                .headers()
                .get(CONTENT_LENGTH)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok())
                .unwrap_or_default()
        };
        let entry = AccessLogEntry::new(
            self.remote_addr.to_string(),
            self.method.to_string(),
            self.path.clone(),
        )
        .with_status(response.status().as_u16())
        .with_body_bytes(body_bytes);
        request_logger.record(&entry);
    }
}

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    remote_addr: SocketAddr,
    state: Arc<AppState>,
) -> Result<Response<ResponseBody>, Infallible>
where
    B: Body<Data = Bytes> + Send + 'static,
    B::Error: Into<BoxError>,
{
    let ctx = RequestContext {
        remote_addr,
        method: req.method().clone(),
        path: decode_path(req.uri().path()),
    };

    let result = match state.routes.resolve(&ctx.path) {
        Some(Endpoint::Home) => Ok(home::serve(&ctx, &state)),
        Some(Endpoint::Upload) => upload::handle(req, &ctx, &state).await,
        Some(Endpoint::Download) => {
            let query = req.uri().query().map(ToOwned::to_owned);
            download::handle(query.as_deref(), &ctx, &state).await
        }
        None => Err(ExchangeError::NotFound(ctx.path.clone())),
    };

    let mut response = match result {
        Ok(response) => response,
        Err(err) => {
            if err.is_server_error() {
                logger::log_error(&format!(
                    "{} {} from {remote_addr}: {err}",
                    ctx.method, ctx.path
                ));
            }
            http::build_error_response(&err)
        }
    };

    if let Ok(server_name) = HeaderValue::from_str(&state.config.http.server_name) {
        response.headers_mut().insert(SERVER, server_name);
    }
    Ok(response)
}

/// Percent-decoded request path, used for routing and the access log.
/// Invalid UTF-8 after decoding is replaced rather than rejected.
fn decode_path(raw: &str) -> String {
    percent_decode_str(raw).decode_utf8_lossy().into_owned()
}
