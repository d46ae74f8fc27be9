//! Per-view state: the URL box, the keyword-count control, and the
//! `idle → loading → loaded | errored` lifecycle of a single analysis.
//!
//! A session is exclusively owned by one view (a CLI invocation or a single
//! dashboard API request). Loading is exclusive, and a result and an error
//! message never coexist.

use std::time::{Duration, Instant};

use crate::client::{AnalysisBackend, AnalysisRequest, DEFAULT_TOP_N, Mode, clamp_top_n};
use crate::model::Outcome;
use crate::validate::is_valid_url;

/// What the view is currently showing.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ViewState {
    #[default]
    Idle,
    Loading,
    Loaded(Outcome),
    Errored(String),
}

impl ViewState {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn outcome(&self) -> Option<&Outcome> {
        match self {
            Self::Loaded(outcome) => Some(outcome),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Errored(msg) => Some(msg),
            _ => None,
        }
    }
}

/// Status recorded for any successful (2xx) backend response. The backend
/// trait yields decoded payloads, not raw responses.
pub const SUCCESS_STATUS: u16 = 200;

/// Details of the last request issued, kept for the request log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attempt {
    pub mode: Mode,
    pub url: String,
    pub elapsed: Duration,
    /// [`SUCCESS_STATUS`] for any 2xx, the real code for a non-2xx, `None`
    /// when no usable response arrived.
    pub status: Option<u16>,
}

/// One analysis view.
#[derive(Debug, Clone)]
pub struct Session {
    url: String,
    gemini_top_n: u32,
    state: ViewState,
    last_attempt: Option<Attempt>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new("")
    }
}

impl Session {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            gemini_top_n: DEFAULT_TOP_N,
            state: ViewState::Idle,
            last_attempt: None,
        }
    }

    /// Set the keyword count for analyze mode, clamped to the UI bounds.
    pub fn with_top_n(mut self, n: u32) -> Self {
        self.set_top_n(n);
        self
    }

    pub fn set_url(&mut self, url: impl Into<String>) {
        self.url = url.into();
    }

    pub fn set_top_n(&mut self, n: u32) {
        self.gemini_top_n = clamp_top_n(n);
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn top_n(&self) -> u32 {
        self.gemini_top_n
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// The request issued by the most recent [`submit`](Self::submit), if any
    /// reached the network.
    pub fn last_attempt(&self) -> Option<&Attempt> {
        self.last_attempt.as_ref()
    }

    /// Whether the Analyze action is enabled.
    pub fn can_submit(&self) -> bool {
        !self.state.is_loading() && is_valid_url(&self.url)
    }

    /// Run one analysis.
    ///
    /// An empty or invalid URL moves straight to `Errored` with the inline
    /// validation message and never touches `backend`. Otherwise exactly one
    /// backend call is made. Any previously loaded result is cleared.
    pub fn submit(&mut self, backend: &dyn AnalysisBackend, mode: Mode) -> &ViewState {
        self.last_attempt = None;

        let request = match AnalysisRequest::new(&self.url, mode, self.gemini_top_n) {
            Ok(request) => request,
            Err(e) => {
                tracing::debug!(url = %self.url, "blocked invalid URL");
                self.state = ViewState::Errored(e.user_message());
                return &self.state;
            }
        };

        self.state = ViewState::Loading;
        let start = Instant::now();
        let result = backend.fetch(&request);

        self.last_attempt = Some(Attempt {
            mode,
            url: request.url.to_string(),
            elapsed: start.elapsed(),
            status: match &result {
                Ok(_) => Some(SUCCESS_STATUS),
                Err(e) => e.status(),
            },
        });

        self.state = match result {
            Ok(outcome) => ViewState::Loaded(outcome),
            Err(e) => ViewState::Errored(e.user_message()),
        };
        &self.state
    }

    /// Dismiss an error, returning the view to idle.
    pub fn dismiss(&mut self) {
        if matches!(self.state, ViewState::Errored(_)) {
            self.state = ViewState::Idle;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use url::Url;

    use super::*;
    use crate::client::FetchError;
    use crate::model::{AnalysisResult, KeywordResult};

    #[derive(Default)]
    struct Counting {
        calls: Cell<usize>,
        fail: bool,
    }

    impl AnalysisBackend for Counting {
        fn fetch_keywords(&self, url: &Url) -> Result<KeywordResult, FetchError> {
            self.calls.set(self.calls.get() + 1);
            if self.fail {
                return Err(FetchError::Transport("refused".into()));
            }
            Ok(KeywordResult {
                url: url.to_string(),
                ..Default::default()
            })
        }

        fn fetch_analysis(&self, _url: &Url, _n: u32) -> Result<AnalysisResult, FetchError> {
            self.calls.set(self.calls.get() + 1);
            Err(FetchError::Status {
                status: 500,
                message: "backend overloaded".into(),
            })
        }
    }

    #[test]
    fn invalid_url_never_reaches_backend() {
        let backend = Counting::default();
        for input in ["", "example.com", "mailto:a@b.c", "http://"] {
            let mut session = Session::new(input);
            assert!(!session.can_submit());
            session.submit(&backend, Mode::Analyze);
            assert!(session.state().error().is_some(), "input {input:?}");
            assert!(session.last_attempt().is_none());
        }
        assert_eq!(backend.calls.get(), 0);
    }

    #[test]
    fn success_then_error_clears_result() {
        let backend = Counting::default();
        let mut session = Session::new("https://example.com");

        session.submit(&backend, Mode::Keywords);
        assert!(session.state().outcome().is_some());
        assert_eq!(session.last_attempt().unwrap().status, Some(200));

        session.submit(&backend, Mode::Analyze);
        assert_eq!(session.state().error(), Some("backend overloaded"));
        assert!(session.state().outcome().is_none());
        assert_eq!(session.last_attempt().unwrap().status, Some(500));
        assert_eq!(backend.calls.get(), 2);
    }

    #[test]
    fn transport_failure_shows_generic_message() {
        let backend = Counting {
            fail: true,
            ..Default::default()
        };
        let mut session = Session::new("https://example.com");
        session.submit(&backend, Mode::Keywords);
        assert_eq!(
            session.state().error(),
            Some(crate::client::TRANSPORT_MESSAGE)
        );
        assert_eq!(session.last_attempt().unwrap().status, None);
    }

    #[test]
    fn dismiss_only_clears_errors() {
        let backend = Counting::default();
        let mut session = Session::new("");
        session.submit(&backend, Mode::Keywords);
        session.dismiss();
        assert_eq!(session.state(), &ViewState::Idle);

        session.set_url("https://example.com");
        session.submit(&backend, Mode::Keywords);
        session.dismiss();
        assert!(session.state().outcome().is_some());
    }

    #[test]
    fn top_n_is_clamped() {
        assert_eq!(Session::new("x").with_top_n(1).top_n(), 5);
        assert_eq!(Session::new("x").with_top_n(1000).top_n(), 100);
        assert_eq!(Session::default().top_n(), 20);
    }
}
