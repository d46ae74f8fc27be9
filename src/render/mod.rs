//! Presentation of an analysis result.
//!
//! [`Dashboard::from_outcome`] is a pure function from a backend payload to a
//! serializable view model. Both the terminal printer ([`terminal`]) and the
//! browser dashboard render from it. Nothing computed here is stored: derived
//! traffic estimates exist only for display and are rebuilt on every render.

pub mod terminal;

use std::fmt;

use serde::Serialize;

use crate::model::{AnalysisResult, Outcome, Provenance};

/// Placeholder shown for any absent value.
pub const NOT_AVAILABLE: &str = "N/A";

// ---------------------------------------------------------------------------
// Tabs
// ---------------------------------------------------------------------------

/// Dashboard tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    Overview,
    Keywords,
    Content,
    Technical,
    Competitor,
}

impl Tab {
    pub const ALL: [Tab; 5] = [
        Self::Overview,
        Self::Keywords,
        Self::Content,
        Self::Technical,
        Self::Competitor,
    ];

    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "overview" | "summary" => Some(Self::Overview),
            "keywords" | "keyword" => Some(Self::Keywords),
            "content" | "headings" => Some(Self::Content),
            "technical" | "tech" => Some(Self::Technical),
            "competitor" | "competitors" | "traffic" => Some(Self::Competitor),
            _ => None,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Overview => "Overview",
            Self::Keywords => "Keywords",
            Self::Content => "Content",
            Self::Technical => "Technical SEO",
            Self::Competitor => "Competitor Metrics",
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Overview => "overview",
            Self::Keywords => "keywords",
            Self::Content => "content",
            Self::Technical => "technical",
            Self::Competitor => "competitor",
        })
    }
}

// ---------------------------------------------------------------------------
// View model
// ---------------------------------------------------------------------------

/// Everything a dashboard view needs, already formatted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub mode: &'static str,
    pub url: String,
    pub title: String,
    pub meta_description: String,
    pub tabs: Vec<Tab>,
    pub summary: Summary,
    pub keywords: Vec<BadgeGroup>,
    pub headings: Vec<HeadingGroup>,
    pub content_metrics: Vec<MetricView>,
    pub technical: Vec<CheckItem>,
    pub competitor: Vec<MetricView>,
}

/// Summary counters shown on the overview tab.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub word_count: u64,
    pub merged_keywords: usize,
    pub gemini_keywords: usize,
    pub onpage_keywords: usize,
    pub h1_count: u64,
    pub h2_count: u64,
    pub technical_passed: usize,
    pub technical_total: usize,
}

/// One provenance group of keyword badges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BadgeGroup {
    pub provenance: Provenance,
    pub label: &'static str,
    pub count: usize,
    pub keywords: Vec<String>,
}

/// Headings recorded for one tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeadingGroup {
    pub tag: String,
    pub texts: Vec<String>,
}

/// One pass/fail row of the technical-SEO checklist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckItem {
    pub key: String,
    pub label: String,
    pub passed: bool,
}

/// A displayed number. `derived` marks a display-only estimate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricView {
    pub key: String,
    pub label: String,
    pub value: Option<f64>,
    pub display: String,
    pub derived: bool,
}

impl Dashboard {
    /// Build the view model for a parsed response.
    pub fn from_outcome(outcome: &Outcome) -> Self {
        let groups = outcome.keywords();

        let keywords: Vec<BadgeGroup> = Provenance::ALL
            .iter()
            .map(|&p| BadgeGroup {
                provenance: p,
                label: p.label(),
                count: groups.get(p).len(),
                keywords: groups.get(p).to_vec(),
            })
            .collect();

        let mut summary = Summary {
            word_count: outcome.word_count(),
            merged_keywords: groups.merged.len(),
            gemini_keywords: groups.gemini.len(),
            onpage_keywords: groups.onpage.len(),
            ..Summary::default()
        };

        let (tabs, headings, content_metrics, technical, competitor) = match outcome.analysis() {
            Some(analysis) => {
                let technical = technical_checklist(analysis);
                summary.h1_count = analysis.heading_count("h1");
                summary.h2_count = analysis.heading_count("h2");
                summary.technical_passed = technical.iter().filter(|c| c.passed).count();
                summary.technical_total = technical.len();
                (
                    Tab::ALL.to_vec(),
                    heading_groups(analysis),
                    content_metric_rows(analysis),
                    technical,
                    competitor_metrics(analysis),
                )
            }
            None => (
                vec![Tab::Overview, Tab::Keywords],
                Vec::new(),
                Vec::new(),
                Vec::new(),
                Vec::new(),
            ),
        };

        Self {
            mode: match outcome {
                Outcome::Keywords(_) => "keywords",
                Outcome::Analysis(_) => "analyze",
            },
            url: outcome.url().to_string(),
            title: placeholder(outcome.title()),
            meta_description: placeholder(outcome.meta_description()),
            tabs,
            summary,
            keywords,
            headings,
            content_metrics,
            technical,
            competitor,
        }
    }

    /// Badge list for one provenance.
    pub fn badges(&self, provenance: Provenance) -> &[String] {
        self.keywords
            .iter()
            .find(|g| g.provenance == provenance)
            .map(|g| g.keywords.as_slice())
            .unwrap_or_default()
    }

    /// Competitor metric by key.
    pub fn competitor_metric(&self, key: &str) -> Option<&MetricView> {
        self.competitor.iter().find(|m| m.key == key)
    }
}

fn placeholder(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => NOT_AVAILABLE.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Content and technical sections
// ---------------------------------------------------------------------------

/// Heading levels h1..h6 first, then any other tags in sorted order.
fn heading_groups(analysis: &AnalysisResult) -> Vec<HeadingGroup> {
    let level = |tag: &str| -> u8 {
        tag.strip_prefix('h')
            .and_then(|n| n.parse::<u8>().ok())
            .filter(|n| (1..=6).contains(n))
            .unwrap_or(u8::MAX)
    };

    let mut groups: Vec<HeadingGroup> = analysis
        .headings
        .iter()
        .map(|(tag, texts)| HeadingGroup {
            tag: tag.clone(),
            texts: texts.clone(),
        })
        .collect();
    groups.sort_by(|a, b| level(&a.tag).cmp(&level(&b.tag)).then(a.tag.cmp(&b.tag)));
    groups
}

fn content_metric_rows(analysis: &AnalysisResult) -> Vec<MetricView> {
    analysis
        .content_metrics
        .iter()
        .map(|(key, &value)| MetricView {
            key: key.clone(),
            label: humanize(key),
            value: Some(value),
            display: format_value(value, MetricFormat::Count),
            derived: false,
        })
        .collect()
}

fn technical_checklist(analysis: &AnalysisResult) -> Vec<CheckItem> {
    analysis
        .technical
        .iter()
        .map(|(key, &passed)| CheckItem {
            key: key.clone(),
            label: technical_label(key),
            passed,
        })
        .collect()
}

/// Human label for a technical flag.
pub fn technical_label(key: &str) -> String {
    match key {
        "has_meta_description" => "Meta description".to_string(),
        "has_canonical" | "has_canonical_url" => "Canonical tag".to_string(),
        "has_og" | "has_open_graph" => "Open Graph tags".to_string(),
        "has_twitter_cards" => "Twitter cards".to_string(),
        other => humanize(other.strip_prefix("has_").unwrap_or(other)),
    }
}

/// `word_count` → `Word count`.
fn humanize(key: &str) -> String {
    let spaced = key.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// ---------------------------------------------------------------------------
// Competitor metrics
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MetricFormat {
    Count,
    Percent,
    Decimal,
    Seconds,
    Currency,
}

struct MetricSpec {
    key: &'static str,
    label: &'static str,
    /// Where the backend's competitor analyzer nests the same figure.
    nested: Option<(&'static str, &'static str)>,
    /// Display estimate `source × factor` when the metric is absent.
    fallback: Option<(&'static str, f64)>,
    format: MetricFormat,
}

const COMPETITOR_METRICS: &[MetricSpec] = &[
    MetricSpec {
        key: "domain_authority",
        label: "Domain authority",
        nested: None,
        fallback: None,
        format: MetricFormat::Count,
    },
    MetricSpec {
        key: "page_authority",
        label: "Page authority",
        nested: None,
        fallback: Some(("domain_authority", 0.8)),
        format: MetricFormat::Count,
    },
    MetricSpec {
        key: "estimated_traffic",
        label: "Estimated traffic",
        nested: None,
        fallback: None,
        format: MetricFormat::Count,
    },
    MetricSpec {
        key: "monthly_visitors",
        label: "Monthly visitors",
        nested: Some(("estimated_traffic", "monthly_visits")),
        fallback: Some(("estimated_traffic", 1.2)),
        format: MetricFormat::Count,
    },
    MetricSpec {
        key: "bounce_rate",
        label: "Bounce rate",
        nested: Some(("estimated_traffic", "bounce_rate")),
        fallback: None,
        format: MetricFormat::Percent,
    },
    MetricSpec {
        key: "pages_per_session",
        label: "Pages / session",
        nested: Some(("estimated_traffic", "pages_per_session")),
        fallback: None,
        format: MetricFormat::Decimal,
    },
    MetricSpec {
        key: "avg_session_duration",
        label: "Avg. session",
        nested: Some(("estimated_traffic", "avg_session_duration")),
        fallback: None,
        format: MetricFormat::Seconds,
    },
    MetricSpec {
        key: "traffic_value",
        label: "Traffic value",
        nested: Some(("estimated_traffic", "traffic_value")),
        fallback: None,
        format: MetricFormat::Currency,
    },
    MetricSpec {
        key: "backlinks",
        label: "Backlinks",
        nested: Some(("backlink_metrics", "total_backlinks")),
        fallback: None,
        format: MetricFormat::Count,
    },
    MetricSpec {
        key: "referring_domains",
        label: "Referring domains",
        nested: Some(("backlink_metrics", "referring_domains")),
        fallback: None,
        format: MetricFormat::Count,
    },
];

/// Resolve a reported figure: top-level first, then its nested location.
fn reported(analysis: &AnalysisResult, spec: &MetricSpec) -> Option<f64> {
    analysis.metric(spec.key).or_else(|| {
        spec.nested
            .and_then(|(parent, child)| analysis.nested_metric(parent, child))
    })
}

fn competitor_metrics(analysis: &AnalysisResult) -> Vec<MetricView> {
    COMPETITOR_METRICS
        .iter()
        .map(|spec| {
            let (value, derived) = match reported(analysis, spec) {
                Some(v) => (Some(v), false),
                None => {
                    let estimate = spec.fallback.and_then(|(source, factor)| {
                        analysis.metric(source).map(|v| (v * factor).round())
                    });
                    (estimate, estimate.is_some())
                }
            };

            MetricView {
                key: spec.key.to_string(),
                label: spec.label.to_string(),
                value,
                display: value
                    .map(|v| format_value(v, spec.format))
                    .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
                derived,
            }
        })
        .collect()
}

fn format_value(value: f64, format: MetricFormat) -> String {
    match format {
        MetricFormat::Count => {
            if value.fract() == 0.0 {
                format_signed(value)
            } else {
                format!("{value:.2}")
            }
        }
        MetricFormat::Percent => {
            let pct = if value.abs() <= 1.0 { value * 100.0 } else { value };
            format!("{pct:.1}%")
        }
        MetricFormat::Decimal => format!("{value:.2}"),
        MetricFormat::Seconds => {
            let secs = value.max(0.0).round() as u64;
            format!("{}m {:02}s", secs / 60, secs % 60)
        }
        MetricFormat::Currency => format!("${}", format_signed(value.round())),
    }
}

fn format_signed(value: f64) -> String {
    let digits = format_number(value.abs() as u64);
    if value < 0.0 {
        format!("-{digits}")
    } else {
        digits
    }
}

/// Format a number with comma separators for readability.
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, ch) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(ch);
    }
    result.chars().rev().collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
