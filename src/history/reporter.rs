//! Request history aggregation for `seo-research history` and `/api/history`.
//!
//! Reads the JSONL request log and provides:
//! - **Totals**: requests by mode, failures, average latency
//! - **Trend**: requests per day
//! - **Hosts**: most-analyzed sites

use std::collections::HashMap;

use serde::Serialize;

use super::logger::{RequestLog, RequestLogEntry};

/// Number of hosts listed in [`HistoryStats::top_hosts`].
const TOP_HOSTS: usize = 10;

// ---------------------------------------------------------------------------
// Aggregated stats
// ---------------------------------------------------------------------------

/// Summary statistics over a window of the request log.
#[derive(Debug, Default, Serialize)]
pub struct HistoryStats {
    pub total_requests: usize,
    pub keyword_requests: usize,
    pub analyze_requests: usize,
    pub errors: usize,
    pub avg_latency_ms: f64,
    pub daily: Vec<DailyCount>,
    pub top_hosts: Vec<HostCount>,
}

impl HistoryStats {
    /// Share of failed requests, 0.0 when there are none.
    pub fn error_pct(&self) -> f64 {
        if self.total_requests == 0 {
            0.0
        } else {
            (self.errors as f64 / self.total_requests as f64) * 100.0
        }
    }
}

/// Requests on a single day.
#[derive(Debug, Clone, Serialize)]
pub struct DailyCount {
    /// `YYYY-MM-DD`.
    pub date: String,
    pub requests: usize,
    pub errors: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct HostCount {
    pub host: String,
    pub count: usize,
}

// ---------------------------------------------------------------------------
// Stats computation
// ---------------------------------------------------------------------------

/// Compute stats from `log`, optionally filtered to the last `days` days.
pub fn compute_stats(log: &RequestLog, days: Option<u32>) -> HistoryStats {
    let entries = log.read_since_days(days);
    build_stats(&entries)
}

pub fn build_stats(entries: &[RequestLogEntry]) -> HistoryStats {
    if entries.is_empty() {
        return HistoryStats::default();
    }

    let total_requests = entries.len();
    let analyze_requests = entries.iter().filter(|e| e.mode == "analyze").count();
    let errors = entries.iter().filter(|e| !e.success).count();
    let avg_latency_ms =
        entries.iter().map(|e| e.latency_ms as f64).sum::<f64>() / total_requests as f64;

    HistoryStats {
        total_requests,
        keyword_requests: total_requests - analyze_requests,
        analyze_requests,
        errors,
        avg_latency_ms,
        daily: compute_daily(entries),
        top_hosts: compute_top_hosts(entries),
    }
}

/// Group by date (first 10 chars of the RFC 3339 timestamp), ascending.
fn compute_daily(entries: &[RequestLogEntry]) -> Vec<DailyCount> {
    let mut daily: HashMap<&str, DailyCount> = HashMap::new();
    for entry in entries {
        let date = entry.timestamp.get(..10).unwrap_or("unknown");
        let day = daily.entry(date).or_insert_with(|| DailyCount {
            date: date.to_string(),
            requests: 0,
            errors: 0,
        });
        day.requests += 1;
        if !entry.success {
            day.errors += 1;
        }
    }

    let mut days: Vec<DailyCount> = daily.into_values().collect();
    days.sort_by(|a, b| a.date.cmp(&b.date));
    days
}

/// Most frequent hosts, by count descending then name.
fn compute_top_hosts(entries: &[RequestLogEntry]) -> Vec<HostCount> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for entry in entries {
        *counts.entry(entry.host()).or_default() += 1;
    }

    let mut hosts: Vec<HostCount> = counts
        .into_iter()
        .map(|(host, count)| HostCount { host, count })
        .collect();
    hosts.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.host.cmp(&b.host)));
    hosts.truncate(TOP_HOSTS);
    hosts
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_entries() -> Vec<RequestLogEntry> {
        let entry = |ts: &str, url: &str, mode: &str, success: bool, latency: u64| RequestLogEntry {
            timestamp: ts.to_string(),
            url: url.to_string(),
            mode: mode.to_string(),
            success,
            status: if success { Some(200) } else { Some(500) },
            latency_ms: latency,
            keyword_count: if success { 10 } else { 0 },
            error: (!success).then(|| "backend overloaded".to_string()),
        };
        vec![
            entry("2025-01-15T10:00:00+00:00", "https://example.com/", "keywords", true, 100),
            entry("2025-01-15T10:05:00+00:00", "https://example.com/blog", "analyze", true, 300),
            entry("2025-01-16T09:00:00+00:00", "https://other.org/", "analyze", false, 200),
            entry("2025-01-16T09:30:00+00:00", "https://example.com/", "keywords", true, 200),
        ]
    }

    #[test]
    fn test_build_stats_totals() {
        let stats = build_stats(&sample_entries());
        assert_eq!(stats.total_requests, 4);
        assert_eq!(stats.keyword_requests, 2);
        assert_eq!(stats.analyze_requests, 2);
        assert_eq!(stats.errors, 1);
        assert_eq!(stats.avg_latency_ms, 200.0);
        assert_eq!(stats.error_pct(), 25.0);
    }

    #[test]
    fn test_daily_trend_sorted() {
        let stats = build_stats(&sample_entries());
        assert_eq!(stats.daily.len(), 2);
        assert_eq!(stats.daily[0].date, "2025-01-15");
        assert_eq!(stats.daily[0].requests, 2);
        assert_eq!(stats.daily[1].date, "2025-01-16");
        assert_eq!(stats.daily[1].errors, 1);
    }

    #[test]
    fn test_top_hosts() {
        let stats = build_stats(&sample_entries());
        assert_eq!(stats.top_hosts[0].host, "example.com");
        assert_eq!(stats.top_hosts[0].count, 3);
        assert_eq!(stats.top_hosts[1].host, "other.org");
    }

    #[test]
    fn test_empty_entries() {
        let stats = build_stats(&[]);
        assert_eq!(stats.total_requests, 0);
        assert_eq!(stats.avg_latency_ms, 0.0);
        assert_eq!(stats.error_pct(), 0.0);
        assert!(stats.daily.is_empty());
    }
}
