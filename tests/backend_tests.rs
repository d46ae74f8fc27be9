/// Client and session behavior against a live mock backend.
///
/// Covers request construction, the error taxonomy, view state transitions
/// and the request log. Rendering details are unit-tested in `render`.
mod common;

use common::{ANALYSIS_BODY, KEYWORDS_BODY, MockBackend, closed_origin};
use seo_research::client::{
    AnalysisBackend, AnalysisRequest, BackendClient, DECODE_MESSAGE, FetchError, Mode,
    TRANSPORT_MESSAGE,
};
use seo_research::history::{RequestLog, compute_stats};
use seo_research::model::Outcome;
use seo_research::render::{Dashboard, NOT_AVAILABLE};
use seo_research::session::{SUCCESS_STATUS, Session, ViewState};

fn client(backend: &MockBackend) -> BackendClient {
    BackendClient::new(&backend.origin).unwrap()
}

fn submit(backend: &MockBackend, url: &str, mode: Mode, top_n: u32) -> Session {
    let mut session = Session::new(url).with_top_n(top_n);
    session.submit(&client(backend), mode);
    session
}

// ---------------------------------------------------------------------------
// Request construction
// ---------------------------------------------------------------------------

#[test]
fn keywords_request_has_encoded_url_and_no_top_n() {
    let backend = MockBackend::fixed(200, KEYWORDS_BODY);
    submit(&backend, "https://example.com/a b?x=1&y=2", Mode::Keywords, 50);

    let requests = backend.requests();
    assert_eq!(requests.len(), 1);
    let sent = &requests[0];
    assert!(sent.starts_with("/keywords?url="), "{sent}");
    assert!(!sent.contains("gemini_top_n"));
    // The page URL's own query separators are encoded.
    assert!(!sent.contains("&y=2"), "{sent}");
    assert!(sent.contains("%3Fx%3D1%26y%3D2"), "{sent}");
}

#[test]
fn analyze_request_carries_top_n() {
    let backend = MockBackend::fixed(200, ANALYSIS_BODY);
    submit(&backend, "https://example.com", Mode::Analyze, 35);

    let requests = backend.requests();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].starts_with("/analyze?url="));
    assert!(requests[0].ends_with("&gemini_top_n=35"), "{}", requests[0]);
}

#[test]
fn analyze_top_n_is_clamped_before_sending() {
    let backend = MockBackend::fixed(200, ANALYSIS_BODY);
    submit(&backend, "https://example.com", Mode::Analyze, 1000);
    assert!(backend.requests()[0].ends_with("gemini_top_n=100"));
}

#[test]
fn trailing_slash_on_origin_is_stripped() {
    let backend = MockBackend::fixed(200, KEYWORDS_BODY);
    let client = BackendClient::new(&format!("{}/", backend.origin)).unwrap();
    let request = AnalysisRequest::new("https://example.com", Mode::Keywords, 20).unwrap();
    client.fetch(&request).unwrap();
    assert!(backend.requests()[0].starts_with("/keywords?"));
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

#[test]
fn invalid_or_empty_url_never_reaches_backend() {
    let backend = MockBackend::fixed(200, KEYWORDS_BODY);

    for input in ["", "example.com", "not a url", "https://"] {
        let session = submit(&backend, input, Mode::Keywords, 20);
        assert!(session.state().error().is_some(), "{input:?}");
        assert!(session.last_attempt().is_none());
    }
    assert!(backend.requests().is_empty());
}

// ---------------------------------------------------------------------------
// Success
// ---------------------------------------------------------------------------

#[test]
fn keyword_badges_match_returned_lists() {
    let backend = MockBackend::fixed(200, KEYWORDS_BODY);
    let session = submit(&backend, "https://example.com", Mode::Keywords, 20);

    let outcome = session.state().outcome().expect("loaded");
    assert!(matches!(outcome, Outcome::Keywords(_)));

    let dash = Dashboard::from_outcome(outcome);
    assert_eq!(dash.summary.gemini_keywords, 2);
    assert_eq!(dash.summary.onpage_keywords, 3);
    assert_eq!(dash.summary.merged_keywords, 4);
    assert_eq!(dash.summary.word_count, 1234);

    // "seo tools" appears in all three groups and is shown in each.
    let shown = dash
        .keywords
        .iter()
        .flat_map(|g| g.keywords.iter())
        .filter(|k| *k == "seo tools")
        .count();
    assert_eq!(shown, 3);
}

#[test]
fn analysis_applies_display_fallbacks() {
    let backend = MockBackend::fixed(200, ANALYSIS_BODY);
    let session = submit(&backend, "https://example.com", Mode::Analyze, 20);

    let dash = Dashboard::from_outcome(session.state().outcome().unwrap());
    let pa = dash.competitor_metric("page_authority").unwrap();
    assert_eq!(pa.display, "40");
    assert!(pa.derived);
    let mv = dash.competitor_metric("monthly_visitors").unwrap();
    assert_eq!(mv.display, "1,200");
    assert!(mv.derived);
    assert_eq!(dash.competitor_metric("backlinks").unwrap().display, NOT_AVAILABLE);
    assert_eq!(dash.summary.technical_passed, 2);
    assert_eq!(dash.summary.h2_count, 3);
}

#[test]
fn sparse_payload_still_loads() {
    let backend = MockBackend::fixed(200, r#"{"url": "https://example.com/", "word_count": null}"#);
    let session = submit(&backend, "https://example.com", Mode::Keywords, 20);

    let dash = Dashboard::from_outcome(session.state().outcome().unwrap());
    assert_eq!(dash.title, NOT_AVAILABLE);
    assert_eq!(dash.summary.word_count, 0);
    assert_eq!(dash.summary.merged_keywords, 0);
}

#[test]
fn new_result_replaces_previous_error() {
    let backend = MockBackend::start(|url| {
        if url.contains("fail") {
            (500, r#"{"detail": "boom"}"#.to_string())
        } else {
            (200, KEYWORDS_BODY.to_string())
        }
    });
    let client = client(&backend);
    let mut session = Session::new("https://fail.example.com");
    session.submit(&client, Mode::Keywords);
    assert_eq!(session.state().error(), Some("boom"));

    session.set_url("https://ok.example.com");
    session.submit(&client, Mode::Keywords);
    assert!(session.state().outcome().is_some());
    assert!(session.state().error().is_none());

    session.set_url("https://fail.example.com");
    session.submit(&client, Mode::Keywords);
    assert!(session.state().outcome().is_none());
}

#[test]
fn any_2xx_is_recorded_as_success_status() {
    let backend = MockBackend::fixed(201, KEYWORDS_BODY);
    let session = submit(&backend, "https://example.com", Mode::Keywords, 20);

    assert!(session.state().outcome().is_some());
    assert_eq!(session.last_attempt().unwrap().status, Some(SUCCESS_STATUS));
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[test]
fn server_error_shows_detail_and_no_result() {
    let backend = MockBackend::fixed(500, r#"{"detail": "backend overloaded"}"#);
    let session = submit(&backend, "https://example.com", Mode::Keywords, 20);

    assert_eq!(
        session.state(),
        &ViewState::Errored("backend overloaded".to_string())
    );
    assert_eq!(session.last_attempt().unwrap().status, Some(500));
}

#[test]
fn detail_wins_over_message() {
    let backend = MockBackend::fixed(422, r#"{"message": "second", "detail": "first"}"#);
    let session = submit(&backend, "https://example.com", Mode::Analyze, 20);
    assert_eq!(session.state().error(), Some("first"));
}

#[test]
fn message_used_without_detail() {
    let backend = MockBackend::fixed(400, r#"{"message": "bad page"}"#);
    let session = submit(&backend, "https://example.com", Mode::Keywords, 20);
    assert_eq!(session.state().error(), Some("bad page"));
}

#[test]
fn non_json_error_body_shows_status() {
    let backend = MockBackend::fixed(404, "<html>Not Found</html>");
    let session = submit(&backend, "https://example.com", Mode::Keywords, 20);
    assert_eq!(session.state().error(), Some("HTTP error 404"));
}

#[test]
fn malformed_success_body_is_generic_decode_error() {
    let backend = MockBackend::fixed(200, "{not json");
    let session = submit(&backend, "https://example.com", Mode::Keywords, 20);
    assert_eq!(session.state().error(), Some(DECODE_MESSAGE));
    assert!(session.state().outcome().is_none());

    let backend = MockBackend::fixed(200, "[1, 2, 3]");
    let client = client(&backend);
    let url = url::Url::parse("https://example.com").unwrap();
    assert!(matches!(client.fetch_keywords(&url), Err(FetchError::Decode(_))));
}

#[test]
fn unreachable_backend_is_generic_transport_error() {
    let client = BackendClient::new(&closed_origin()).unwrap();
    let mut session = Session::new("https://example.com");
    session.submit(&client, Mode::Keywords);

    assert_eq!(session.state().error(), Some(TRANSPORT_MESSAGE));
    let attempt = session.last_attempt().unwrap();
    assert_eq!(attempt.status, None);
    assert_eq!(attempt.mode, Mode::Keywords);
}

// ---------------------------------------------------------------------------
// Health and request log
// ---------------------------------------------------------------------------

#[test]
fn health_reports_ok_flag() {
    let backend = MockBackend::start(|url| {
        if url == "/health" {
            (200, r#"{"ok": true}"#.to_string())
        } else {
            (404, String::new())
        }
    });
    assert!(client(&backend).health().unwrap());

    let backend = MockBackend::fixed(200, r#"{"ok": false}"#);
    assert!(!client(&backend).health().unwrap());

    let unreachable = BackendClient::new(&closed_origin()).unwrap();
    assert!(matches!(unreachable.health(), Err(FetchError::Transport(_))));
}

#[test]
fn request_log_records_each_backend_call() {
    let dir = tempfile::tempdir().unwrap();
    let log = RequestLog::new(dir.path().join("log.jsonl"), true);

    let ok = MockBackend::fixed(200, KEYWORDS_BODY);
    let failing = MockBackend::fixed(500, r#"{"detail": "backend overloaded"}"#);

    log.record_session(&submit(&ok, "https://example.com", Mode::Keywords, 20));
    log.record_session(&submit(&failing, "https://example.com/x", Mode::Analyze, 20));
    // Blocked by validation: not logged.
    log.record_session(&submit(&ok, "nope", Mode::Keywords, 20));

    let entries = log.read_all();
    assert_eq!(entries.len(), 2);
    assert!(entries[0].success);
    assert_eq!(entries[0].keyword_count, 9);
    assert_eq!(entries[0].status, Some(200));
    assert!(!entries[1].success);
    assert_eq!(entries[1].mode, "analyze");
    assert_eq!(entries[1].error.as_deref(), Some("backend overloaded"));

    let stats = compute_stats(&log, Some(1));
    assert_eq!(stats.total_requests, 2);
    assert_eq!(stats.errors, 1);
    assert_eq!(stats.top_hosts[0].host, "example.com");
    assert_eq!(stats.top_hosts[0].count, 2);
}
