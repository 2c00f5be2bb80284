//! HTTP response building module
//!
//! Builders for status responses that never reach a movie handler.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{HeaderValue, ALLOW, CONTENT_TYPE, SERVER};
use hyper::{Method, Response, StatusCode};

const NOT_FOUND_BODY: &str = "404 page not found\n";
const METHOD_NOT_ALLOWED_BODY: &str = "405 method not allowed\n";
const PAYLOAD_TOO_LARGE_BODY: &str = "413 payload too large\n";

/// Build 404 Not Found response
pub fn build_404_response() -> Response<Full<Bytes>> {
    build_text_response(StatusCode::NOT_FOUND, NOT_FOUND_BODY, None)
}

/// Build 405 Method Not Allowed response listing the accepted methods
pub fn build_405_response(allowed: &[Method]) -> Response<Full<Bytes>> {
    let allow = allowed
        .iter()
        .map(Method::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    build_text_response(
        StatusCode::METHOD_NOT_ALLOWED,
        METHOD_NOT_ALLOWED_BODY,
        Some(&allow),
    )
}

/// Build 413 Payload Too Large response
pub fn build_413_response() -> Response<Full<Bytes>> {
    build_text_response(StatusCode::PAYLOAD_TOO_LARGE, PAYLOAD_TOO_LARGE_BODY, None)
}

/// Stamp the `Server` header onto an outgoing response
pub fn set_server_header(response: &mut Response<Full<Bytes>>, server_name: &str) {
    match HeaderValue::from_str(server_name) {
        Ok(value) => {
            response.headers_mut().insert(SERVER, value);
        }
        Err(e) => crate::logger::log_warning(&format!(
            "Invalid server name {server_name:?}: {e}"
        )),
    }
}

fn build_text_response(
    status: StatusCode,
    body: &'static str,
    allow: Option<&str>,
) -> Response<Full<Bytes>> {
    let mut builder = Response::builder()
        .status(status)
        .header(CONTENT_TYPE, "text/plain; charset=utf-8");
    if let Some(allow) = allow {
        builder = builder.header(ALLOW, allow);
    }

    builder
        .body(Full::new(Bytes::from_static(body.as_bytes())))
        .unwrap_or_else(|e| {
            log_build_error(status, &e);
            let mut fallback = Response::new(Full::new(Bytes::from_static(body.as_bytes())));
            *fallback.status_mut() = status;
            fallback
        })
}

/// Log response build error
fn log_build_error(status: StatusCode, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}
