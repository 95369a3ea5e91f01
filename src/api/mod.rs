// API module entry
// Read-only data API under /api/

mod content;
mod error;
mod files;
mod response;
mod types;

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;

use crate::config::AppState;
use crate::logger;

pub use error::ApiError;

/// Path prefix routed to this module
pub const API_PREFIX: &str = "/api/";

/// API route handler
///
/// Dispatches on the exact path; unknown API paths answer 404.
pub async fn handle_api_request(
    path: &str,
    query: Option<&str>,
    state: &AppState,
) -> Response<Full<Bytes>> {
    let result = match path {
        "/api/files" => {
            files::list_data_files(&state.data_dir, &state.config.paths.data_dir)
                .await
                .and_then(|entries| {
                    logger::log_debug(&format!("[API] Listing {} data files", entries.len()));
                    response::json_response(&entries)
                })
        }
        "/api/file-content" => content::read_file_content(state, query)
            .await
            .and_then(|file| response::json_response(&file)),
        _ => Err(ApiError::EndpointNotFound),
    };

    result.unwrap_or_else(|e| response::error_response(&e))
}
