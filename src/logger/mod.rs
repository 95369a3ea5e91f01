//! Logger module
//!
//! Provides logging utilities for the server including:
//! - Startup banner and shutdown logging
//! - Access logging with multiple formats
//! - Leveled error/warning/info/debug lines
//! - File-based logging support

mod format;
pub mod writer;

pub use format::AccessLogEntry;

use crate::config::{AppState, Config};
use std::net::SocketAddr;
use std::str::FromStr;

/// Log severity, most severe first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Level {
    Error = 0,
    Warn = 1,
    Info = 2,
    Debug = 3,
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "error" => Ok(Self::Error),
            "warn" | "warning" => Ok(Self::Warn),
            "info" => Ok(Self::Info),
            "debug" | "trace" => Ok(Self::Debug),
            other => Err(format!("Unknown log level: {other}")),
        }
    }
}

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &Config) -> std::io::Result<()> {
    let level = config
        .logging
        .level
        .parse()
        .map_err(|e: String| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;
    writer::init(
        level,
        config.logging.access_log_file.as_deref(),
        config.logging.error_log_file.as_deref(),
    )
}

fn write(level: Level, message: &str) {
    match (writer::get(), level) {
        (Some(w), _) => w.write(level, message),
        // Before init: default info level
        (None, Level::Error | Level::Warn) => eprintln!("{message}"),
        (None, Level::Info) => println!("{message}"),
        (None, Level::Debug) => {}
    }
}

pub fn log_error(message: &str) {
    write(Level::Error, &format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write(Level::Warn, &format!("[WARN] {message}"));
}

pub fn log_info(message: &str) {
    write(Level::Info, message);
}

pub fn log_debug(message: &str) {
    write(Level::Debug, &format!("[DEBUG] {message}"));
}

pub fn log_server_start(addr: &SocketAddr, state: &AppState) {
    let port = addr.port();
    log_info("======================================");
    log_info("Research Data Web Application Server");
    log_info(&format!("Serving at: http://localhost:{port} (bound to {addr})"));
    log_info(&format!("Root directory: {}", state.root_dir.display()));
    log_info(&format!("Data directory: {}", state.data_dir.display()));
    if let Some(workers) = state.config.server.workers {
        log_info(&format!("Worker threads: {workers}"));
    }
    if let Some(ref path) = state.config.logging.access_log_file {
        log_info(&format!("Access log: {path}"));
    }
    if let Some(ref path) = state.config.logging.error_log_file {
        log_info(&format!("Error log: {path}"));
    }
    log_info("Features:");
    log_info("  - Static file serving");
    log_info("  - GET /api/files and GET /api/file-content?path=...");
    log_info("  - CSV and stats file handling");
    log_info("  - Cross-origin resource sharing enabled on API responses");
    log_info("Press Ctrl+C to stop the server");
    log_info("======================================");

    if !state.config.api.restrict_to_data_dir {
        log_warning(
            "/api/file-content reads any path this process can access; \
             set api.restrict_to_data_dir = true to confine it to the data directory",
        );
    }
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    log_debug(&format!("[Connection] Accepted from: {peer_addr}"));
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    log_error(&format!("Failed to serve connection: {err:?}"));
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    let line = entry.format(format);
    match writer::get() {
        Some(w) => w.write_access(&line),
        None => println!("{line}"),
    }
}

pub fn log_shutdown() {
    log_info("\nServer stopped by user");
}
