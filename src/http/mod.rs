//! HTTP protocol layer module
//!
//! HTTP helpers shared by the static file server and the data API,
//! independent of either.

pub mod mime;
pub mod query;
pub mod response;

// Re-export commonly used builders
pub use response::{
    build_404_response, build_501_response, build_html_response, build_redirect_response,
    build_text_response, set_server_header, CORS_HEADERS,
};
