//! Local mock of the analysis backend, served by `tiny_http` on an ephemeral
//! port. Every request URL is recorded so tests can assert on what was sent.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::thread;

use tiny_http::{Header, Response, Server, StatusCode};

pub struct MockBackend {
    pub origin: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl MockBackend {
    /// Start a backend that answers every request with `handler(path_and_query)`.
    pub fn start<F>(handler: F) -> Self
    where
        F: Fn(&str) -> (u16, String) + Send + 'static,
    {
        let server = Server::http("127.0.0.1:0").unwrap();
        let port = server.server_addr().to_ip().unwrap().port();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&requests);

        thread::spawn(move || {
            for request in server.incoming_requests() {
                let url = request.url().to_string();
                seen.lock().unwrap().push(url.clone());
                let (status, body) = handler(&url);
                let response = Response::from_string(body)
                    .with_status_code(StatusCode(status))
                    .with_header(
                        Header::from_bytes("Content-Type", "application/json").unwrap(),
                    );
                let _ = request.respond(response);
            }
        });

        Self {
            origin: format!("http://127.0.0.1:{port}"),
            requests,
        }
    }

    /// Start a backend that always answers `status` with `body`.
    pub fn fixed(status: u16, body: &str) -> Self {
        let body = body.to_string();
        Self::start(move |_| (status, body.clone()))
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

/// An origin nothing listens on.
pub fn closed_origin() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}

pub const KEYWORDS_BODY: &str = r#"{
    "url": "https://example.com/",
    "title": "Example Domain",
    "meta_description": "An example page",
    "word_count": 1234,
    "keywords": {
        "gemini": ["seo tools", "keyword research"],
        "onpage": ["example", "domain", "seo tools"],
        "merged": ["seo tools", "keyword research", "example", "domain"]
    }
}"#;

pub const ANALYSIS_BODY: &str = r#"{
    "url": "https://example.com/",
    "title": "Example Domain",
    "word_count": 800,
    "keywords": {"gemini": ["ai"], "onpage": [], "merged": ["ai"]},
    "content_metrics": {"h1": 1, "h2": 3, "paragraphs": 12},
    "technical": {"has_meta_description": true, "has_canonical": false, "has_og": true},
    "headings": {"h1": ["Example"], "h2": ["One", "Two", "Three"]},
    "domain_authority": 50,
    "estimated_traffic": 1000
}"#;
