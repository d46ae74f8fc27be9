use std::fs::{self, OpenOptions, create_dir_all};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::expand_tilde;
use crate::config::schema::LoggingConfig;
use crate::session::{Session, ViewState};

const UNKNOWN_HOST: &str = "unknown";

// ---------------------------------------------------------------------------
// Request log entry (JSONL)
// ---------------------------------------------------------------------------

/// A single entry in the request log (`~/.seo-research/request-log.jsonl`).
///
/// One line per backend request that actually went out. Requests blocked by
/// URL validation are never recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestLogEntry {
    pub timestamp: String,
    pub url: String,
    /// `"keywords"` or `"analyze"`.
    pub mode: String,
    #[serde(default = "default_true")]
    pub success: bool,
    /// HTTP status, absent for transport failures.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub status: Option<u16>,
    pub latency_ms: u64,
    /// Total keywords across all three provenance lists.
    #[serde(default)]
    pub keyword_count: usize,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<String>,
}

fn default_true() -> bool {
    true
}

impl RequestLogEntry {
    /// Build an entry from the session's most recent request.
    ///
    /// Returns `None` when the last submit never reached the backend.
    pub fn from_session(session: &Session) -> Option<Self> {
        let attempt = session.last_attempt()?;
        let (success, keyword_count, error) = match session.state() {
            ViewState::Loaded(outcome) => (true, outcome.keywords().total(), None),
            ViewState::Errored(message) => (false, 0, Some(message.clone())),
            ViewState::Idle | ViewState::Loading => return None,
        };

        Some(Self {
            timestamp: Utc::now().to_rfc3339(),
            url: attempt.url.clone(),
            mode: attempt.mode.as_str().to_string(),
            success,
            status: attempt.status,
            latency_ms: u64::try_from(attempt.elapsed.as_millis()).unwrap_or(u64::MAX),
            keyword_count,
            error,
        })
    }

    /// Host part of the logged URL, used for grouping. `unknown` when the
    /// URL has no host.
    pub fn host(&self) -> String {
        Url::parse(&self.url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_owned))
            .unwrap_or_else(|| UNKNOWN_HOST.to_string())
    }
}

// ---------------------------------------------------------------------------
// Request log
// ---------------------------------------------------------------------------

/// Append-only JSONL request log.
#[derive(Debug, Clone)]
pub struct RequestLog {
    path: PathBuf,
    enabled: bool,
}

impl RequestLog {
    pub fn new(path: impl Into<PathBuf>, enabled: bool) -> Self {
        Self {
            path: path.into(),
            enabled,
        }
    }

    pub fn from_config(config: &LoggingConfig) -> Self {
        Self::new(expand_tilde(&config.path), config.enabled)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Record the session's most recent request, if it reached the backend.
    pub fn record_session(&self, session: &Session) {
        if let Some(entry) = RequestLogEntry::from_session(session) {
            self.record(&entry);
        }
    }

    /// Append an entry. Best-effort: failures are logged and otherwise ignored.
    pub fn record(&self, entry: &RequestLogEntry) {
        if !self.enabled {
            return;
        }
        if let Err(e) = self.append(entry) {
            tracing::debug!(path = %self.path.display(), "request log write failed: {e}");
        }
    }

    fn append(&self, entry: &RequestLogEntry) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let json = serde_json::to_string(entry)?;
        writeln!(file, "{json}")?;

        Ok(())
    }

    /// Read every entry. Malformed lines are skipped; a missing file reads as
    /// empty.
    pub fn read_all(&self) -> Vec<RequestLogEntry> {
        let Ok(file) = fs::File::open(&self.path) else {
            return Vec::new();
        };

        BufReader::new(file)
            .lines()
            .map_while(Result::ok)
            .filter_map(|line| serde_json::from_str::<RequestLogEntry>(&line).ok())
            .collect()
    }

    /// Read entries from the last `days` days, or all entries for `None`.
    pub fn read_since_days(&self, days: Option<u32>) -> Vec<RequestLogEntry> {
        let entries = self.read_all();

        let Some(days) = days else {
            return entries;
        };

        let cutoff = (Utc::now() - chrono::Duration::days(i64::from(days))).to_rfc3339();
        entries
            .into_iter()
            .filter(|e| e.timestamp >= cutoff)
            .collect()
    }
}
