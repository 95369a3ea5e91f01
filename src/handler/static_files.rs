//! Static file serving module
//!
//! Maps request paths onto the root directory, serves files with a MIME type
//! from their extension, and handles directories (redirect, index file or
//! generated listing).

use crate::config::AppState;
use crate::handler::router::RequestContext;
use crate::http::{self, mime, query::percent_decode};
use crate::logger;
use chrono::{DateTime, Utc};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Serve `ctx.path` from the root directory
pub async fn serve_static(ctx: &RequestContext<'_>, state: &AppState) -> Response<Full<Bytes>> {
    let file_path = state.root_dir.join(to_relative_path(ctx.path));

    let Ok(metadata) = fs::metadata(&file_path).await else {
        return http::build_404_response();
    };

    if metadata.is_dir() {
        return serve_directory(ctx, state, &file_path).await;
    }

    // A trailing slash promises a directory
    if ctx.path.ends_with('/') {
        return http::build_404_response();
    }

    serve_file(ctx, &file_path).await
}

/// Decode and normalize a URL path into a path relative to the root
///
/// Empty and `.` components are dropped and `..` pops the previous component,
/// so the result can never climb above the root.
pub fn to_relative_path(url_path: &str) -> PathBuf {
    let decoded = percent_decode(url_path);
    let mut parts: Vec<&str> = Vec::new();
    for part in decoded.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            p => parts.push(p),
        }
    }
    parts.iter().collect()
}

async fn serve_directory(
    ctx: &RequestContext<'_>,
    state: &AppState,
    dir: &Path,
) -> Response<Full<Bytes>> {
    if !ctx.path.ends_with('/') {
        let target = match ctx.query {
            Some(q) => format!("{}/?{q}", ctx.path),
            None => format!("{}/", ctx.path),
        };
        return http::build_redirect_response(&target);
    }

    for index_file in &state.config.http.index_files {
        let index_path = dir.join(index_file);
        if fs::metadata(&index_path).await.is_ok_and(|m| m.is_file()) {
            return serve_file(ctx, &index_path).await;
        }
    }

    if !state.config.http.directory_listing {
        return http::build_404_response();
    }

    match render_directory_listing(dir, &percent_decode(ctx.path)).await {
        Ok(html) => http::build_html_response(html, ctx.is_head),
        Err(e) => {
            logger::log_warning(&format!("Cannot list '{}': {e}", dir.display()));
            http::build_404_response()
        }
    }
}

async fn serve_file(ctx: &RequestContext<'_>, file_path: &Path) -> Response<Full<Bytes>> {
    let content = match fs::read(file_path).await {
        Ok(c) => c,
        Err(e) => {
            logger::log_error(&format!(
                "Failed to read file '{}': {e}",
                file_path.display()
            ));
            return http::build_404_response();
        }
    };

    let last_modified = fs::metadata(file_path)
        .await
        .and_then(|m| m.modified())
        .ok()
        .map(DateTime::<Utc>::from);

    http::response::build_file_response(
        content,
        mime::content_type_for(file_path),
        last_modified,
        ctx.is_head,
    )
}

/// HTML listing of `dir`, entries sorted case-insensitively
///
/// Directories get a trailing `/` and symlinks a trailing `@` in the
/// displayed name; hrefs are percent-encoded.
pub async fn render_directory_listing(dir: &Path, display_path: &str) -> std::io::Result<String> {
    let mut read_dir = fs::read_dir(dir).await?;
    let mut entries = Vec::new();

    while let Some(entry) = read_dir.next_entry().await? {
        let name = entry.file_name().to_string_lossy().into_owned();
        let is_link = entry.file_type().await.is_ok_and(|t| t.is_symlink());
        let is_dir = fs::metadata(entry.path()).await.is_ok_and(|m| m.is_dir());

        let (display, link) = if is_dir {
            (format!("{name}/"), format!("{}/", urlencoding::encode(&name)))
        } else {
            (name.clone(), urlencoding::encode(&name).into_owned())
        };
        let display = if is_link { format!("{name}@") } else { display };
        entries.push((name.to_lowercase(), display, link));
    }
    entries.sort_by(|a, b| a.0.cmp(&b.0));

    let title = format!("Directory listing for {}", escape_html(display_path));
    let mut html = format!(
        "<!DOCTYPE HTML>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n</head>\n<body>\n<h1>{title}</h1>\n<hr>\n<ul>\n"
    );
    for (_, display, link) in &entries {
        html.push_str(&format!(
            "<li><a href=\"{}\">{}</a></li>\n",
            escape_html(link),
            escape_html(display)
        ));
    }
    html.push_str("</ul>\n<hr>\n</body>\n</html>\n");
    Ok(html)
}

/// Escape text for HTML element and attribute content
fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}
