//! Download handler
//!
//! Serves `GET /download?file=<name>` from the upload directory.

use crate::config::AppState;
use crate::error::ExchangeError;
use crate::handler::router::RequestContext;
use crate::http::{self, mime, ResponseBody};
use hyper::Response;
use std::io::ErrorKind;
use std::path::Path;

/// Query parameter naming the requested file
pub const FILE_PARAM: &str = "file";

/// Handle `/download`; any method is accepted, `HEAD` gets headers only.
///
/// The file is streamed from disk as the client reads it; `Content-Length`
/// comes from the metadata taken when the name was resolved.
pub async fn handle(
    query: Option<&str>,
    ctx: &RequestContext,
    state: &AppState,
) -> Result<Response<ResponseBody>, ExchangeError> {
    let name = query
        .and_then(|q| query_param(q, FILE_PARAM))
        .filter(|name| !name.is_empty())
        .ok_or(ExchangeError::MissingFileParameter)?;

    let stored = state.store.resolve(&name).await?;
    let body = if ctx.is_head() {
        http::full(Vec::new())
    } else {
        let file = tokio::fs::File::open(&stored.path).await.map_err(|e| {
            // Removed between resolve and open
            if e.kind() == ErrorKind::NotFound {
                ExchangeError::NotFound(name.clone())
            } else {
                ExchangeError::Read(e)
            }
        })?;
        http::file_stream(file)
    };

    let response = http::build_file_response(
        body,
        stored.metadata.len(),
        mime::content_type_for(Path::new(&name)),
        stored.metadata.modified().ok(),
    );
    ctx.record(state.request_logger.as_ref(), &response);
    Ok(response)
}

/// First percent-decoded value of `key` in a query string
fn query_param(query: &str, key: &str) -> Option<String> {
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}
