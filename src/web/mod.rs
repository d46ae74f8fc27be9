//! Embedded web dashboard for seo-research.
//!
//! Provides a lightweight HTTP server (sync, via `tiny_http`) that serves:
//! - A single-page SEO dashboard (URL input, tabs, keyword badges, export)
//! - JSON API endpoints that run analyses through the configured backend
//!
//! Launched via `seo-research web` (default: `http://127.0.0.1:9747`).

mod api;
mod frontend;

use std::io::{Cursor, Read};

use anyhow::{Context, Result};
use tiny_http::{Header, Method, Response, Server, StatusCode};

use crate::context::AppContext;

pub(crate) type HttpResponse = Response<Cursor<Vec<u8>>>;

// ---------------------------------------------------------------------------
// Server entry point
// ---------------------------------------------------------------------------

/// Start the web dashboard server on the given address.
///
/// Blocks the current thread.
pub fn serve(ctx: &AppContext, addr: &str, open: bool) -> Result<()> {
    let server = bind(addr)?;

    println!("seo-research dashboard running at http://{addr}");
    println!("Backend: {}", ctx.client.origin());
    println!("Press Ctrl+C to stop.\n");

    if open {
        let url = format!("http://{addr}");
        if let Err(e) = open_browser(&url) {
            tracing::debug!("could not open browser: {e:#}");
        }
    }

    run(&server, ctx);
    Ok(())
}

/// Bind the dashboard server without starting the request loop.
pub fn bind(addr: &str) -> Result<Server> {
    Server::http(addr).map_err(|e| anyhow::anyhow!("failed to start HTTP server on {addr}: {e}"))
}

/// Handle requests sequentially until the server is dropped or unblocked.
/// Errors are per-request and never stop the loop.
pub fn run(server: &Server, ctx: &AppContext) {
    for mut request in server.incoming_requests() {
        let method = request.method().clone();
        let url = request.url().to_string();

        // Read body up-front for methods that carry one
        let body = if matches!(method, Method::Put | Method::Post | Method::Patch) {
            let mut buf = String::new();
            let _ = request.as_reader().read_to_string(&mut buf);
            Some(buf)
        } else {
            None
        };

        let response = dispatch(ctx, &method, &url, body.as_deref()).unwrap_or_else(|e| {
            tracing::warn!(%method, %url, "handler failed: {e:#}");
            error_response(500, &e.to_string())
        });
        let status = response.status_code().0;
        let _ = request.respond(response);

        tracing::info!(
            %method,
            %url,
            status,
            at = %chrono::Local::now().format("%H:%M:%S"),
            "request"
        );
    }
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Dispatch an incoming request to the appropriate handler.
fn dispatch(
    ctx: &AppContext,
    method: &Method,
    url: &str,
    body: Option<&str>,
) -> Result<HttpResponse> {
    let (path, query) = url.split_once('?').unwrap_or((url, ""));

    match (method, path) {
        // Frontend
        (&Method::Get, "/") | (&Method::Get, "/index.html") => Ok(serve_frontend()),

        // API — Analysis
        (&Method::Get, "/api/keywords") => api::get_keywords(ctx, query),
        (&Method::Get, "/api/analyze") => api::get_analyze(ctx, query),
        (&Method::Post, "/api/export/csv") => api::post_export_csv(body.unwrap_or("{}")),

        // API — Service
        (&Method::Get, "/api/health") => api::get_health(ctx),
        (&Method::Get, "/api/history") => api::get_history(ctx, query),
        (&Method::Get, "/api/config") => api::get_config(ctx),

        // 404
        _ => Ok(error_response(404, "not found")),
    }
}

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

/// Serve the embedded single-page frontend.
fn serve_frontend() -> HttpResponse {
    Response::from_data(frontend::INDEX_HTML.as_bytes().to_vec())
        .with_header(content_type_html())
        .with_status_code(StatusCode(200))
}

/// `{"error": message}` with the given status.
pub(crate) fn error_response(status: u16, message: &str) -> HttpResponse {
    let body = serde_json::json!({ "error": message }).to_string();
    Response::from_data(body.into_bytes())
        .with_header(content_type_json())
        .with_status_code(StatusCode(status))
}

/// JSON content type header.
pub(crate) fn content_type_json() -> Header {
    Header::from_bytes("Content-Type", "application/json; charset=utf-8").unwrap()
}

/// HTML content type header.
fn content_type_html() -> Header {
    Header::from_bytes("Content-Type", "text/html; charset=utf-8").unwrap()
}

/// Build a header from runtime text.
pub(crate) fn header(name: &str, value: &str) -> Result<Header> {
    Header::from_bytes(name.as_bytes(), value.as_bytes())
        .map_err(|()| anyhow::anyhow!("invalid {name} header value: {value}"))
}

/// Attempt to open a URL in the system default browser.
fn open_browser(url: &str) -> Result<()> {
    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/C", "start", url])
            .spawn()
            .context("failed to open browser")?;
    }

    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open")
            .arg(url)
            .spawn()
            .context("failed to open browser")?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open")
            .arg(url)
            .spawn()
            .context("failed to open browser")?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_response_carries_status_and_message() {
        let resp = error_response(502, "HTTP error 500");
        assert_eq!(resp.status_code().0, 502);
    }

    #[test]
    fn header_accepts_attachment_value() {
        let h = header("Content-Disposition", "attachment; filename=\"keywords-a.com.csv\"")
            .unwrap();
        assert_eq!(h.field.as_str().as_str(), "Content-Disposition");
        assert_eq!(h.value.as_str(), "attachment; filename=\"keywords-a.com.csv\"");
    }

    #[test]
    fn frontend_is_html() {
        let resp = serve_frontend();
        assert_eq!(resp.status_code().0, 200);
        assert!(frontend::INDEX_HTML.contains("<html"));
    }

    #[test]
    fn header_rejects_non_ascii() {
        assert!(header("Content-Disposition", "fichier-é.csv").is_err());
    }
}
