//! `ureq` implementation of [`AnalysisBackend`].
//!
//! Builds `GET {origin}/{endpoint}?url=...` requests against the configured
//! backend origin and maps every failure into a [`FetchError`]:
//!
//! - **Non-2xx**: the error body's `detail` or `message` string, else
//!   `HTTP error {status}`.
//! - **Transport**: connection, DNS or TLS failures.
//! - **Decode**: a 2xx whose body is not a JSON object of the expected shape.
use std::time::Instant;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use super::{AnalysisBackend, AnalysisRequest, FetchError, Mode};
use crate::model::{AnalysisResult, KeywordResult};

/// Synchronous client for the analysis backend.
///
/// Cheap to construct; one instance is created per CLI invocation or per
/// dashboard server.
#[derive(Clone)]
pub struct BackendClient {
    origin: String,
    agent: ureq::Agent,
}

impl std::fmt::Debug for BackendClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendClient")
            .field("origin", &self.origin)
            .finish_non_exhaustive()
    }
}

impl BackendClient {
    /// Build a client for `origin` (e.g. `http://localhost:8000`).
    ///
    /// A trailing `/` is stripped. The origin must be an absolute URL.
    pub fn new(origin: &str) -> Result<Self> {
        let origin = origin.trim().trim_end_matches('/').to_string();
        Url::parse(&origin).with_context(|| format!("invalid backend URL: {origin}"))?;

        Ok(Self {
            origin,
            agent: ureq::AgentBuilder::new().build(),
        })
    }

    /// The backend origin this client talks to.
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Full request URL for `request`, with the page URL percent-encoded.
    pub fn request_url(&self, request: &AnalysisRequest) -> Result<Url, FetchError> {
        let base = format!("{}/{}", self.origin, request.mode.endpoint());
        let page = request.url.as_str();
        let top_n = request.gemini_top_n.to_string();

        let result = match request.mode {
            Mode::Keywords => Url::parse_with_params(&base, &[("url", page)]),
            Mode::Analyze => {
                Url::parse_with_params(&base, &[("url", page), ("gemini_top_n", top_n.as_str())])
            }
        };

        result.map_err(|e| FetchError::Transport(format!("bad request URL {base}: {e}")))
    }

    /// Check the backend's `GET /health` route.
    ///
    /// Returns `Ok(true)` when it answers `{"ok": true}`.
    pub fn health(&self) -> Result<bool, FetchError> {
        let url = format!("{}/health", self.origin);
        let body: Value = self.get_json(&url)?;
        Ok(body.get("ok").and_then(Value::as_bool).unwrap_or(false))
    }

    fn send<T: DeserializeOwned>(&self, request: &AnalysisRequest) -> Result<T, FetchError> {
        let url = self.request_url(request)?;
        tracing::info!(mode = %request.mode, page = %request.url, "requesting analysis");

        let start = Instant::now();
        let result = self.get_json(url.as_str());
        let elapsed_ms = start.elapsed().as_millis() as u64;

        match &result {
            Ok(_) => tracing::debug!(mode = %request.mode, elapsed_ms, "analysis received"),
            Err(e) => tracing::warn!(mode = %request.mode, elapsed_ms, error = %e, "analysis failed"),
        }

        result
    }

    fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        let response = match self.agent.get(url).call() {
            Ok(response) => response,
            Err(ureq::Error::Status(status, response)) => {
                let body = response.into_string().unwrap_or_default();
                return Err(FetchError::Status {
                    status,
                    message: error_message(status, &body),
                });
            }
            Err(ureq::Error::Transport(transport)) => {
                return Err(FetchError::Transport(transport.to_string()));
            }
        };

        let body = response
            .into_string()
            .map_err(|e| FetchError::Transport(format!("failed reading response body: {e}")))?;

        decode_body(&body)
    }
}

impl AnalysisBackend for BackendClient {
    fn fetch_keywords(&self, url: &Url) -> Result<KeywordResult, FetchError> {
        self.send(&AnalysisRequest {
            url: url.clone(),
            mode: Mode::Keywords,
            gemini_top_n: super::DEFAULT_TOP_N,
        })
    }

    fn fetch_analysis(&self, url: &Url, gemini_top_n: u32) -> Result<AnalysisResult, FetchError> {
        self.send(&AnalysisRequest {
            url: url.clone(),
            mode: Mode::Analyze,
            gemini_top_n,
        })
    }
}

/// Resolve the human-readable message for a non-2xx response.
///
/// Prefers a non-empty `detail` string, then `message`, then
/// `HTTP error {status}`.
pub fn error_message(status: u16, body: &str) -> String {
    let parsed: Option<Value> = serde_json::from_str(body).ok();

    parsed
        .as_ref()
        .and_then(|v| {
            ["detail", "message"].iter().find_map(|key| {
                v.get(*key)
                    .and_then(Value::as_str)
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
            })
        })
        .map(str::to_string)
        .unwrap_or_else(|| format!("HTTP error {status}"))
}

/// Decode a successful body; only JSON objects are accepted.
fn decode_body<T: DeserializeOwned>(body: &str) -> Result<T, FetchError> {
    let value: Value =
        serde_json::from_str(body).map_err(|e| FetchError::Decode(e.to_string()))?;

    if !value.is_object() {
        return Err(FetchError::Decode("expected a JSON object".to_string()));
    }

    serde_json::from_value(value).map_err(|e| FetchError::Decode(e.to_string()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
