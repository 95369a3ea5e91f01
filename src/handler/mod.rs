//! Request handler module
//!
//! Routes each request to the data API or the static file server.

pub mod router;
pub mod static_files;

// Re-export main entry point
pub use router::handle_request;
