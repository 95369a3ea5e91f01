//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: method check, API/static split,
//! `Server` header and access logging.

use crate::api::{self, API_PREFIX};
use crate::config::AppState;
use crate::handler::static_files;
use crate::http;
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    pub path: &'a str,
    pub query: Option<&'a str>,
    pub is_head: bool,
}

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let method = req.method();
    let uri = req.uri();

    let mut response = route(method, uri.path(), uri.query(), &state).await;
    http::set_server_header(&mut response, &state.config.http.server_name);

    if state.config.logging.access_log {
        let mut entry = AccessLogEntry::new(
            peer_addr.ip().to_string(),
            method.to_string(),
            uri.path().to_string(),
        );
        entry.query = uri.query().map(ToString::to_string);
        entry.http_version = version_label(req.version()).to_string();
        entry.status = response.status().as_u16();
        entry.body_bytes = usize::try_from(response.body().size_hint().exact().unwrap_or(0))
            .unwrap_or(usize::MAX);
        entry.referer = header_string(&req, "referer");
        entry.user_agent = header_string(&req, "user-agent");
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Dispatch on method and path
///
/// Only GET reaches the API; HEAD is always a static lookup.
pub async fn route(
    method: &Method,
    path: &str,
    query: Option<&str>,
    state: &AppState,
) -> Response<Full<Bytes>> {
    match *method {
        Method::GET if path.starts_with(API_PREFIX) => {
            api::handle_api_request(path, query, state).await
        }
        Method::GET | Method::HEAD => {
            let ctx = RequestContext {
                path,
                query,
                is_head: *method == Method::HEAD,
            };
            static_files::serve_static(&ctx, state).await
        }
        _ => {
            logger::log_warning(&format!("Unsupported method: {method} {path}"));
            http::build_501_response(method.as_str())
        }
    }
}

fn header_string<B>(req: &Request<B>, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

const fn version_label(version: hyper::Version) -> &'static str {
    match version {
        hyper::Version::HTTP_09 => "0.9",
        hyper::Version::HTTP_10 => "1.0",
        hyper::Version::HTTP_2 => "2",
        hyper::Version::HTTP_3 => "3",
        _ => "1.1",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_support::state_in;
    use http_body_util::BodyExt;
    use hyper::StatusCode;
    use std::fs;

    async fn body_text(resp: Response<Full<Bytes>>) -> String {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_api_prefix_goes_to_api() {
        let tmp = tempfile::tempdir().unwrap();
        let state = state_in(tmp.path());

        let resp = route(&Method::GET, "/api/files", None, &state).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_text(resp).await, "[]");

        let resp = route(&Method::GET, "/api/frobnicate", None, &state).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_text(resp).await, "API endpoint not found");
    }

    #[tokio::test]
    async fn test_non_api_paths_are_static() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("apiary.html"), "bees").unwrap();
        let state = state_in(tmp.path());

        // "/api" alone and "/apiary.html" do not carry the "/api/" prefix
        let resp = route(&Method::GET, "/apiary.html", None, &state).await;
        assert_eq!(body_text(resp).await, "bees");
        let resp = route(&Method::GET, "/api", None, &state).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_text(resp).await, "File not found");
    }

    #[tokio::test]
    async fn test_head_on_api_path_is_static_lookup() {
        let tmp = tempfile::tempdir().unwrap();
        let state = state_in(tmp.path());

        let resp = route(&Method::HEAD, "/api/files", None, &state).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_options_and_unsupported_methods() {
        let tmp = tempfile::tempdir().unwrap();
        let state = state_in(tmp.path());

        let resp = route(&Method::OPTIONS, "/api/files", None, &state).await;
        assert_eq!(resp.status(), StatusCode::NOT_IMPLEMENTED);
        assert!(resp.headers().get("Access-Control-Allow-Origin").is_none());
        assert_eq!(body_text(resp).await, "Unsupported method ('OPTIONS')");

        let resp = route(&Method::POST, "/api/files", None, &state).await;
        assert_eq!(resp.status(), StatusCode::NOT_IMPLEMENTED);
        assert_eq!(body_text(resp).await, "Unsupported method ('POST')");
    }

    #[tokio::test]
    async fn test_handle_request_sets_server_header() {
        let tmp = tempfile::tempdir().unwrap();
        let state = Arc::new(state_in(tmp.path()));
        let req = Request::builder()
            .uri("/api/file-content?path=missing.csv")
            .body(())
            .unwrap();

        let resp = handle_request(req, state, "127.0.0.1:50000".parse().unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(resp.headers()["Server"], "ResearchData/0.1");
    }
}
