//! Static request handling.
//!
//! Maps one parsed HTTP request onto the served directory tree and produces
//! the complete response. Infallible at the service boundary: every failure
//! mode becomes an HTTP status, so a single bad request can never take down
//! the connection driver, the accept loop, or the process.

use std::io;
use std::path::Path;
use std::sync::Arc;

use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::header::{ALLOW, CONTENT_LENGTH, CONTENT_TYPE, LOCATION};
use hyper::{Method, Request, Response, StatusCode};
use tracing::{debug, error};

use crate::config::schema::ServerConfig;
use crate::files::listing;
use crate::files::resolve::{self, ResolveError};

/// Per-request failure modes, each mapped to a status code.
enum RequestError {
    BadRequest(&'static str),
    MethodNotAllowed,
    Forbidden,
    NotFound,
    Internal(io::Error),
}

impl From<ResolveError> for RequestError {
    fn from(err: ResolveError) -> Self {
        match err {
            ResolveError::Traversal => RequestError::Forbidden,
            ResolveError::InvalidEncoding => RequestError::BadRequest("invalid request path"),
        }
    }
}

/// Serve one request against the configured root.
pub async fn handle(req: Request<Incoming>, config: Arc<ServerConfig>) -> Response<Full<Bytes>> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = match build_response(&req, &config).await {
        Ok(response) => response,
        Err(err) => error_response(err),
    };

    debug!(method = %method, path = %path, status = %response.status(), "request served");
    response
}

async fn build_response(
    req: &Request<Incoming>,
    config: &ServerConfig,
) -> Result<Response<Full<Bytes>>, RequestError> {
    match *req.method() {
        Method::GET | Method::HEAD => {}
        _ => return Err(RequestError::MethodNotAllowed),
    }
    let head_only = *req.method() == Method::HEAD;

    let relative = resolve::resolve_path(req.uri().path())?;
    let full_path = config.content.root_dir.join(&relative);

    let metadata = match tokio::fs::metadata(&full_path).await {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(RequestError::NotFound),
        Err(e) => return Err(RequestError::Internal(e)),
    };

    if metadata.is_dir() {
        serve_directory(req.uri().path(), config, &full_path, head_only).await
    } else {
        serve_file(&full_path, head_only).await
    }
}

async fn serve_file(path: &Path, head_only: bool) -> Result<Response<Full<Bytes>>, RequestError> {
    let body = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(RequestError::NotFound),
        Err(e) => return Err(RequestError::Internal(e)),
    };
    let mime = mime_guess::from_path(path).first_or_octet_stream();
    Ok(content_response(
        StatusCode::OK,
        mime.as_ref(),
        Bytes::from(body),
        head_only,
    ))
}

async fn serve_directory(
    request_path: &str,
    config: &ServerConfig,
    dir: &Path,
    head_only: bool,
) -> Result<Response<Full<Bytes>>, RequestError> {
    // Relative links in listings and index pages only resolve correctly
    // when the directory URL ends in a slash.
    if !request_path.ends_with('/') {
        return Ok(redirect(format!("{}/", request_path)));
    }

    let index_path = dir.join(&config.content.index_file);
    if tokio::fs::metadata(&index_path)
        .await
        .map(|m| m.is_file())
        .unwrap_or(false)
    {
        return serve_file(&index_path, head_only).await;
    }

    let html = listing::render(request_path, dir)
        .await
        .map_err(RequestError::Internal)?;
    Ok(content_response(
        StatusCode::OK,
        "text/html; charset=utf-8",
        Bytes::from(html),
        head_only,
    ))
}

/// Build a success response. `Content-Length` always reflects the full body
/// so HEAD responses mirror their GET counterparts.
fn content_response(
    status: StatusCode,
    content_type: &str,
    body: Bytes,
    head_only: bool,
) -> Response<Full<Bytes>> {
    let length = body.len();
    let payload = if head_only { Bytes::new() } else { body };
    Response::builder()
        .status(status)
        .header(CONTENT_TYPE, content_type)
        .header(CONTENT_LENGTH, length)
        .body(Full::new(payload))
        .expect("statically valid response")
}

fn redirect(location: String) -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::MOVED_PERMANENTLY)
        .header(LOCATION, location)
        .header(CONTENT_LENGTH, 0)
        .body(Full::new(Bytes::new()))
        .expect("statically valid response")
}

fn error_response(err: RequestError) -> Response<Full<Bytes>> {
    let (status, message): (StatusCode, &'static str) = match &err {
        RequestError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
        RequestError::MethodNotAllowed => (StatusCode::METHOD_NOT_ALLOWED, "method not allowed"),
        RequestError::Forbidden => (StatusCode::FORBIDDEN, "forbidden"),
        RequestError::NotFound => (StatusCode::NOT_FOUND, "not found"),
        RequestError::Internal(e) => {
            error!(error = %e, "I/O error while serving request");
            (StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
        }
    };

    let mut builder = Response::builder()
        .status(status)
        .header(CONTENT_TYPE, "text/plain; charset=utf-8")
        .header(CONTENT_LENGTH, message.len());
    if matches!(err, RequestError::MethodNotAllowed) {
        builder = builder.header(ALLOW, "GET, HEAD");
    }
    builder
        .body(Full::new(Bytes::from_static(message.as_bytes())))
        .expect("statically valid response")
}
