//! Multipart upload handler
//!
//! Stores the part named `file` under its base filename, overwriting any
//! earlier upload with the same name.

use crate::config::AppState;
use crate::error::ExchangeError;
use crate::handler::router::{BoxError, RequestContext};
use crate::http;
use crate::logger;
use crate::storage::base_filename;
use http_body_util::BodyExt;
use hyper::body::{Body, Bytes};
use hyper::header::{CONTENT_LENGTH, CONTENT_TYPE};
use hyper::{Method, Request, Response, StatusCode};
use multer::{Constraints, Field, Multipart, SizeLimit};
use tokio::io::AsyncWriteExt;

/// Form field carrying the uploaded file
pub const FILE_FIELD: &str = "file";

/// Handle `POST /upload`
pub async fn handle<B>(
    req: Request<B>,
    ctx: &RequestContext,
    state: &AppState,
) -> Result<Response<http::ResponseBody>, ExchangeError>
where
    B: Body<Data = Bytes> + Send + 'static,
    B::Error: Into<BoxError>,
{
    if ctx.method != Method::POST {
        logger::log_warning(&format!("Method not allowed on {}: {}", ctx.path, ctx.method));
        return Err(ExchangeError::MethodNotAllowed(ctx.method.clone()));
    }

    let max_upload_size = state.config.http.max_upload_size;
    check_content_length(&req, max_upload_size)?;

    let content_type = req
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .ok_or(multer::Error::NoMultipart)?;
    let boundary = multer::parse_boundary(content_type)?;

    let mut constraints = Constraints::new();
    if let Some(limit) = max_upload_size {
        constraints = constraints.size_limit(SizeLimit::new().whole_stream(limit));
    }
    let mut multipart =
        Multipart::with_constraints(req.into_body().into_data_stream(), boundary, constraints);

    while let Some(field) = multipart.next_field().await? {
        // Parts without a filename are plain form values, not files
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let Some(file_name) = field.file_name().map(ToOwned::to_owned) else {
            continue;
        };

        let base = base_filename(&file_name)
            .ok_or_else(|| ExchangeError::InvalidFilename(file_name.clone()))?
            .to_string();
        save_field(field, &base, state).await?;

        let response = http::build_text_response(
            StatusCode::OK,
            &format!("File {base} uploaded successfully!"),
        );
        ctx.record(state.request_logger.as_ref(), &response);
        return Ok(response);
    }

    Err(ExchangeError::MissingFileField)
}

/// Reject bodies whose declared length already exceeds the limit
fn check_content_length<B>(
    req: &Request<B>,
    max_upload_size: Option<u64>,
) -> Result<(), ExchangeError> {
    let Some(limit) = max_upload_size else {
        return Ok(());
    };
    let declared = req
        .headers()
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok());
    match declared {
        Some(size) if size > limit => Err(ExchangeError::UploadTooLarge { limit }),
        _ => Ok(()),
    }
}

/// Copy the part's bytes verbatim into the upload directory
async fn save_field(
    mut field: Field<'static>,
    base: &str,
    state: &AppState,
) -> Result<(), ExchangeError> {
    let mut file = state.store.create(base).await.map_err(ExchangeError::Save)?;

    while let Some(chunk) = field.chunk().await? {
        file.write_all(&chunk).await.map_err(ExchangeError::Save)?;
    }
    file.flush().await.map_err(ExchangeError::Save)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::logger::MemoryRequestLogger;
    use http_body_util::Full;
    use std::sync::Arc;

    const BOUNDARY: &str = "X-EXCHANGE-BOUNDARY";

    fn multipart_body(parts: &[(&str, Option<&str>, &[u8])]) -> Vec<u8> {
        let mut body = Vec::new();
        for (name, file_name, data) in parts {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            match file_name {
                Some(f) => body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{f}\"\r\n\
                         Content-Type: application/octet-stream\r\n\r\n"
                    )
                    .as_bytes(),
                ),
                None => body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                ),
            }
            body.extend_from_slice(data);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn upload_request(body: Vec<u8>) -> Request<Full<Bytes>> {
        Request::post("/upload")
            .header(CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"))
            .body(Full::new(Bytes::from(body)))
            .unwrap()
    }

    fn ctx(method: Method) -> RequestContext {
        RequestContext {
            remote_addr: "10.0.0.7:41000".parse().unwrap(),
            method,
            path: "/upload".to_string(),
        }
    }

    fn state(base: &std::path::Path) -> (AppState, Arc<MemoryRequestLogger>) {
        let memory = Arc::new(MemoryRequestLogger::new("plain"));
        let state = AppState::new(Config::with_base_dir(base), memory.clone());
        state.store.ensure_dir().unwrap();
        (state, memory)
    }

    #[tokio::test]
    async fn test_upload_stores_file_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let (state, memory) = state(dir.path());
        let data: Vec<u8> = (0..=255u8).cycle().take(70_000).collect();
        let req = upload_request(multipart_body(&[("file", Some("blob.bin"), &data)]));

        let response = handle(req, &ctx(Method::POST), &state).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(body, "File blob.bin uploaded successfully!");
        assert_eq!(std::fs::read(state.store.upload_path("blob.bin")).unwrap(), data);

        let lines = memory.lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].ends_with("10.0.0.7:41000 POST /upload"));
    }

    #[tokio::test]
    async fn test_upload_strips_directories() {
        let dir = tempfile::tempdir().unwrap();
        let (state, _) = state(dir.path());
        let req = upload_request(multipart_body(&[("file", Some("a/b.txt"), b"nested")]));

        handle(req, &ctx(Method::POST), &state).await.unwrap();

        assert_eq!(std::fs::read(state.store.upload_path("b.txt")).unwrap(), b"nested");
        assert!(!state.store.upload_path("a").exists());
    }

    #[tokio::test]
    async fn test_upload_skips_other_fields() {
        let dir = tempfile::tempdir().unwrap();
        let (state, _) = state(dir.path());
        let req = upload_request(multipart_body(&[
            ("comment", None, b"hello"),
            ("file", None, b"not a file part"),
            ("file", Some("real.txt"), b"payload"),
        ]));

        handle(req, &ctx(Method::POST), &state).await.unwrap();
        assert_eq!(std::fs::read(state.store.upload_path("real.txt")).unwrap(), b"payload");
    }

    #[tokio::test]
    async fn test_upload_without_file_field() {
        let dir = tempfile::tempdir().unwrap();
        let (state, memory) = state(dir.path());
        let req = upload_request(multipart_body(&[("other", Some("x.txt"), b"data")]));

        let err = handle(req, &ctx(Method::POST), &state).await.unwrap_err();
        assert!(matches!(err, ExchangeError::MissingFileField));
        assert!(memory.lines().is_empty());
    }

    #[tokio::test]
    async fn test_upload_not_multipart() {
        let dir = tempfile::tempdir().unwrap();
        let (state, _) = state(dir.path());
        let req = Request::post("/upload")
            .header(CONTENT_TYPE, "text/plain")
            .body(Full::new(Bytes::from_static(b"hello")))
            .unwrap();

        let err = handle(req, &ctx(Method::POST), &state).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_upload_rejects_dot_filename() {
        let dir = tempfile::tempdir().unwrap();
        let (state, _) = state(dir.path());
        let req = upload_request(multipart_body(&[("file", Some("../.."), b"x")]));

        let err = handle(req, &ctx(Method::POST), &state).await.unwrap_err();
        assert!(matches!(err, ExchangeError::InvalidFilename(_)));
    }

    #[tokio::test]
    async fn test_upload_wrong_method() {
        let dir = tempfile::tempdir().unwrap();
        let (state, _) = state(dir.path());
        let req = Request::get("/upload").body(Full::new(Bytes::new())).unwrap();

        let err = handle(req, &ctx(Method::GET), &state).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_upload_size_limit() {
        let dir = tempfile::tempdir().unwrap();
        let (mut state, _) = state(dir.path());
        state.config.http.max_upload_size = Some(64);
        let req = upload_request(multipart_body(&[("file", Some("big.bin"), &[7u8; 4096])]));

        let err = handle(req, &ctx(Method::POST), &state).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_save_failure_is_server_error() {
        let dir = tempfile::tempdir().unwrap();
        let (state, _) = state(dir.path());
        // A directory with the target name cannot be opened as a file
        std::fs::create_dir(state.store.upload_path("taken")).unwrap();
        let req = upload_request(multipart_body(&[("file", Some("taken"), b"x")]));

        let err = handle(req, &ctx(Method::POST), &state).await.unwrap_err();
        assert!(matches!(err, ExchangeError::Save(_)));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
