//! Requests to the external analysis backend.
//!
//! The backend is reached through the [`AnalysisBackend`] trait so the view
//! state and the dashboard can be driven by a stub in tests. The production
//! implementation is [`http::BackendClient`], a synchronous `ureq` client.
//!
//! Exactly one network call is made per user action. There is no retry and no
//! client-side timeout beyond the transport defaults.

mod error;
pub mod http;

use std::fmt;

use url::Url;

use crate::model::{AnalysisResult, KeywordResult, Outcome};
use crate::validate::validate_url;

pub use error::{DECODE_MESSAGE, FetchError, TRANSPORT_MESSAGE};
pub use http::BackendClient;

/// Default number of AI-suggested keywords requested in analyze mode.
pub const DEFAULT_TOP_N: u32 = 20;
/// Smallest `gemini_top_n` the dashboard lets the user pick.
pub const MIN_TOP_N: u32 = 5;
/// Largest `gemini_top_n` the dashboard lets the user pick.
pub const MAX_TOP_N: u32 = 100;

/// Clamp a requested keyword count into `MIN_TOP_N..=MAX_TOP_N`.
pub fn clamp_top_n(n: u32) -> u32 {
    n.clamp(MIN_TOP_N, MAX_TOP_N)
}

// ---------------------------------------------------------------------------
// Mode
// ---------------------------------------------------------------------------

/// Which backend endpoint a request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// `GET /keywords` — keyword lists and page summary.
    Keywords,
    /// `GET /analyze` — keywords plus content, technical and traffic data.
    Analyze,
}

impl Mode {
    /// Path segment appended to the backend origin.
    pub fn endpoint(self) -> &'static str {
        match self {
            Self::Keywords => "keywords",
            Self::Analyze => "analyze",
        }
    }

    pub fn as_str(self) -> &'static str {
        self.endpoint()
    }

    /// Parse a mode name. Accepts `keywords`/`keyword` and `analyze`/`analysis`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "keywords" | "keyword" => Some(Self::Keywords),
            "analyze" | "analysis" => Some(Self::Analyze),
            _ => None,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

/// A validated request ready to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub url: Url,
    pub mode: Mode,
    /// Only sent in [`Mode::Analyze`].
    pub gemini_top_n: u32,
}

impl AnalysisRequest {
    /// Validate `input` and build a request. Fails with
    /// [`FetchError::InvalidUrl`] before anything touches the network.
    pub fn new(input: &str, mode: Mode, gemini_top_n: u32) -> Result<Self, FetchError> {
        let url = validate_url(input)?;
        Ok(Self {
            url,
            mode,
            gemini_top_n,
        })
    }
}

// ---------------------------------------------------------------------------
// Backend trait
// ---------------------------------------------------------------------------

/// The two operations the analysis service offers.
pub trait AnalysisBackend {
    /// `GET /keywords?url=...`
    fn fetch_keywords(&self, url: &Url) -> Result<KeywordResult, FetchError>;

    /// `GET /analyze?url=...&gemini_top_n=...`
    fn fetch_analysis(&self, url: &Url, gemini_top_n: u32) -> Result<AnalysisResult, FetchError>;

    /// Dispatch a request to the operation matching its mode.
    fn fetch(&self, request: &AnalysisRequest) -> Result<Outcome, FetchError> {
        match request.mode {
            Mode::Keywords => self.fetch_keywords(&request.url).map(Outcome::Keywords),
            Mode::Analyze => self
                .fetch_analysis(&request.url, request.gemini_top_n)
                .map(Outcome::Analysis),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_parse_handles_variants() {
        assert_eq!(Mode::parse("keywords"), Some(Mode::Keywords));
        assert_eq!(Mode::parse("Keyword"), Some(Mode::Keywords));
        assert_eq!(Mode::parse("analyze"), Some(Mode::Analyze));
        assert_eq!(Mode::parse("ANALYSIS"), Some(Mode::Analyze));
        assert_eq!(Mode::parse("crawl"), None);
    }

    #[test]
    fn clamp_top_n_bounds() {
        assert_eq!(clamp_top_n(0), MIN_TOP_N);
        assert_eq!(clamp_top_n(20), 20);
        assert_eq!(clamp_top_n(500), MAX_TOP_N);
    }

    #[test]
    fn request_rejects_invalid_url() {
        let err = AnalysisRequest::new("nope", Mode::Keywords, DEFAULT_TOP_N).unwrap_err();
        assert!(err.is_validation());
    }

    struct Canned;

    impl AnalysisBackend for Canned {
        fn fetch_keywords(&self, url: &Url) -> Result<KeywordResult, FetchError> {
            Ok(KeywordResult {
                url: url.to_string(),
                ..Default::default()
            })
        }

        fn fetch_analysis(
            &self,
            _url: &Url,
            gemini_top_n: u32,
        ) -> Result<AnalysisResult, FetchError> {
            Err(FetchError::Status {
                status: 500,
                message: format!("top_n={gemini_top_n}"),
            })
        }
    }

    #[test]
    fn fetch_dispatches_on_mode() {
        let kw = AnalysisRequest::new("https://example.com", Mode::Keywords, 20).unwrap();
        let outcome = Canned.fetch(&kw).unwrap();
        assert!(matches!(outcome, Outcome::Keywords(_)));

        let an = AnalysisRequest::new("https://example.com", Mode::Analyze, 42).unwrap();
        let err = Canned.fetch(&an).unwrap_err();
        assert_eq!(err.user_message(), "top_n=42");
    }
}
