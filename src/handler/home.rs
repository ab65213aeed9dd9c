//! Home page with the upload and download forms

use crate::config::AppState;
use crate::handler::router::RequestContext;
use crate::http;
use hyper::Response;

const HOME_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <title>File Server</title>
</head>
<body>
    <h1>Upload a File</h1>
    <form enctype="multipart/form-data" action="/upload" method="post">
        <input type="file" name="file" />
        <input type="submit" value="Upload" />
    </form>
    <h1>Download a File</h1>
    <form action="/download" method="get">
        <input type="text" name="file" placeholder="Filename" />
        <input type="submit" value="Download" />
    </form>
</body>
</html>"#;

/// Serve the fixed home page
pub fn serve(ctx: &RequestContext, state: &AppState) -> Response<http::ResponseBody> {
    let response = http::build_html_response(HOME_PAGE, ctx.is_head());
    ctx.record(state.request_logger.as_ref(), &response);
    response
}
