//! JSON API handlers for the web dashboard.
//!
//! Each handler corresponds to an API endpoint and returns an
//! [`HttpResponse`]. Analysis failures are reported as `{"error": message}`
//! with 400 when the URL was rejected before any request, 502 when the
//! backend failed.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tiny_http::{Response, StatusCode};

use crate::client::{BackendClient, Mode, clamp_top_n};
use crate::config::AppConfig;
use crate::context::AppContext;
use crate::export;
use crate::history;
use crate::model::KeywordGroups;
use crate::render::Dashboard;
use crate::session::{Session, ViewState};

use super::{HttpResponse, content_type_json, error_response, header};

// ---------------------------------------------------------------------------
// JSON request/response types
// ---------------------------------------------------------------------------

/// Analysis API response: the view model plus the raw keyword lists the
/// export endpoints take back.
#[derive(Serialize)]
struct AnalysisResponse<'a> {
    dashboard: Dashboard,
    keywords: &'a KeywordGroups,
    latency_ms: Option<u64>,
}

/// CSV export request body.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ExportRequest {
    /// Analyzed page, used for the download file name.
    url: String,
    keywords: KeywordGroups,
}

/// Config API response — the effective config as JSON + TOML text.
#[derive(Serialize)]
struct ConfigResponse<'a> {
    config: &'a AppConfig,
    toml_text: String,
}

/// Health API response.
#[derive(Serialize)]
struct HealthResponse {
    backend_url: String,
    backend_ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    history_enabled: bool,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Build a JSON success response.
fn json_response<T: Serialize>(data: &T) -> Result<HttpResponse> {
    let body = serde_json::to_string(data).context("failed to serialize JSON response")?;
    Ok(Response::from_data(body.into_bytes())
        .with_header(content_type_json())
        .with_status_code(StatusCode(200)))
}

/// Decoded value of a query parameter.
fn query_param(query: &str, key: &str) -> Option<String> {
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}

/// Parse `?days=N`.
fn parse_days_param(query: &str) -> Option<u32> {
    query_param(query, "days")?.parse().ok()
}

/// Parse `?gemini_top_n=N`, clamped; missing or non-numeric uses the default.
fn parse_top_n_param(query: &str, default: u32) -> u32 {
    query_param(query, "gemini_top_n")
        .and_then(|v| v.trim().parse::<u32>().ok())
        .map(clamp_top_n)
        .unwrap_or(default)
}

/// Turn a finished session into a response.
fn session_response(session: &Session) -> Result<HttpResponse> {
    match session.state() {
        ViewState::Loaded(outcome) => json_response(&AnalysisResponse {
            dashboard: Dashboard::from_outcome(outcome),
            keywords: outcome.keywords(),
            latency_ms: session
                .last_attempt()
                .and_then(|a| u64::try_from(a.elapsed.as_millis()).ok()),
        }),
        // No attempt means the URL never left the validator.
        ViewState::Errored(message) if session.last_attempt().is_none() => {
            Ok(error_response(400, message))
        }
        ViewState::Errored(message) => Ok(error_response(502, message)),
        ViewState::Idle | ViewState::Loading => Ok(error_response(500, "no result")),
    }
}

// ---------------------------------------------------------------------------
// API Handlers
// ---------------------------------------------------------------------------

/// `GET /api/keywords?url=` — keyword extraction.
pub fn get_keywords(ctx: &AppContext, query: &str) -> Result<HttpResponse> {
    let url = query_param(query, "url").unwrap_or_default();
    session_response(&ctx.run(&url, Mode::Keywords, None))
}

/// `GET /api/analyze?url=&gemini_top_n=N` — full analysis.
pub fn get_analyze(ctx: &AppContext, query: &str) -> Result<HttpResponse> {
    let url = query_param(query, "url").unwrap_or_default();
    let top_n = parse_top_n_param(query, ctx.config.backend.top_n());
    session_response(&ctx.run(&url, Mode::Analyze, Some(top_n)))
}

/// `POST /api/export/csv` — CSV download of keyword lists.
///
/// Expects JSON body: `{ "url": "...", "keywords": { "merged": [...], ... } }`.
/// Answers 204 when every list is empty.
pub fn post_export_csv(body: &str) -> Result<HttpResponse> {
    let req: ExportRequest = match serde_json::from_str(body) {
        Ok(req) => req,
        Err(e) => return Ok(error_response(400, &format!("invalid export request: {e}"))),
    };

    let Some(bytes) = export::keywords_csv(&req.keywords) else {
        return Ok(Response::from_data(Vec::new()).with_status_code(StatusCode(204)));
    };

    let filename = export::csv_filename(&req.url);
    Ok(Response::from_data(bytes)
        .with_header(header("Content-Type", "text/csv; charset=utf-8")?)
        .with_header(header(
            "Content-Disposition",
            &format!("attachment; filename=\"{filename}\""),
        )?)
        .with_status_code(StatusCode(200)))
}

/// `GET /api/health` — backend reachability.
pub fn get_health(ctx: &AppContext) -> Result<HttpResponse> {
    json_response(&health_report(&ctx.client, ctx.log.is_enabled()))
}

fn health_report(client: &BackendClient, history_enabled: bool) -> HealthResponse {
    let (backend_ok, error) = match client.health() {
        Ok(ok) => (ok, None),
        Err(e) => (false, Some(e.user_message())),
    };
    HealthResponse {
        backend_url: client.origin().to_string(),
        backend_ok,
        error,
        history_enabled,
    }
}

/// `GET /api/history?days=N` — request history summary.
pub fn get_history(ctx: &AppContext, query: &str) -> Result<HttpResponse> {
    let stats = history::compute_stats(&ctx.log, parse_days_param(query));
    json_response(&stats)
}

/// `GET /api/config` — effective configuration.
pub fn get_config(ctx: &AppContext) -> Result<HttpResponse> {
    let toml_text = toml::to_string_pretty(&ctx.config).context("failed to serialize config")?;
    json_response(&ConfigResponse {
        config: &ctx.config,
        toml_text,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
