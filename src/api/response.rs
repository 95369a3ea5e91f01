// API response utility functions module

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use serde::Serialize;

use super::error::ApiError;
use crate::http::{build_text_response, CORS_HEADERS};
use crate::logger;

/// Build 200 JSON response with CORS headers
pub fn json_response<T: Serialize>(body: &T) -> Result<Response<Full<Bytes>>, ApiError> {
    let json = serde_json::to_vec(body)?;
    let builder = CORS_HEADERS.iter().fold(
        Response::builder()
            .status(StatusCode::OK)
            .header("Content-Type", "application/json")
            .header("Content-Length", json.len()),
        |b, (name, value)| b.header(*name, *value),
    );

    Ok(builder.body(Full::new(Bytes::from(json))).unwrap_or_else(|e| {
        logger::log_error(&format!("Failed to build JSON response: {e}"));
        Response::new(Full::new(Bytes::new()))
    }))
}

/// Plain-text error response; the message is the error's display text
pub fn error_response(err: &ApiError) -> Response<Full<Bytes>> {
    let status = err.status();
    if status.is_server_error() {
        logger::log_error(&err.to_string());
    }
    build_text_response(status, &err.to_string())
}
