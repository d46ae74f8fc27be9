//! Response payload shapes returned by the analysis backend.
//!
//! Every field is optional on the wire. Absent and `null` values fall back to
//! an empty string, zero, or an empty collection instead of failing the whole
//! response, so a partially filled payload still renders.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// ---------------------------------------------------------------------------
// Provenance
// ---------------------------------------------------------------------------

/// Where a keyword came from, as classified by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    /// Suggested by the AI keyword model.
    Gemini,
    /// Extracted from the page text.
    Onpage,
    /// Deduplicated union of both, computed by the backend.
    Merged,
}

impl Provenance {
    /// Export order: merged first, then gemini, then onpage.
    pub const ALL: [Provenance; 3] = [Self::Merged, Self::Gemini, Self::Onpage];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Gemini => "gemini",
            Self::Onpage => "onpage",
            Self::Merged => "merged",
        }
    }

    /// Heading used above the badge list for this group.
    pub fn label(self) -> &'static str {
        match self {
            Self::Gemini => "AI suggested",
            Self::Onpage => "On-page",
            Self::Merged => "Merged",
        }
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Keyword groups
// ---------------------------------------------------------------------------

/// Keywords grouped by provenance, each in backend order.
///
/// Unknown provenance keys are ignored. Duplicates across groups are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeywordGroups {
    #[serde(deserialize_with = "string_list")]
    pub gemini: Vec<String>,
    #[serde(deserialize_with = "string_list")]
    pub onpage: Vec<String>,
    #[serde(deserialize_with = "string_list")]
    pub merged: Vec<String>,
}

impl KeywordGroups {
    pub fn get(&self, provenance: Provenance) -> &[String] {
        match provenance {
            Provenance::Gemini => &self.gemini,
            Provenance::Onpage => &self.onpage,
            Provenance::Merged => &self.merged,
        }
    }

    /// `true` when no group has any keyword.
    pub fn is_empty(&self) -> bool {
        self.gemini.is_empty() && self.onpage.is_empty() && self.merged.is_empty()
    }

    /// Total badge count across the three groups (duplicates included).
    pub fn total(&self) -> usize {
        self.gemini.len() + self.onpage.len() + self.merged.len()
    }
}

// ---------------------------------------------------------------------------
// Payloads
// ---------------------------------------------------------------------------

/// Payload of `GET /keywords`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeywordResult {
    #[serde(deserialize_with = "null_as_default")]
    pub url: String,
    pub title: Option<String>,
    pub meta_description: Option<String>,
    #[serde(deserialize_with = "lenient_count")]
    pub word_count: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub keywords: KeywordGroups,
}

/// Payload of `GET /analyze`.
///
/// Carries the same page fields as [`KeywordResult`] plus the audit maps.
/// Traffic and authority figures are an open set: anything the struct does not
/// name lands in `extra` untouched and is read through [`AnalysisResult::metric`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisResult {
    #[serde(deserialize_with = "null_as_default")]
    pub url: String,
    pub title: Option<String>,
    pub meta_description: Option<String>,
    #[serde(deserialize_with = "lenient_count")]
    pub word_count: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub keywords: KeywordGroups,
    #[serde(deserialize_with = "numeric_map")]
    pub content_metrics: BTreeMap<String, f64>,
    #[serde(deserialize_with = "bool_map")]
    pub technical: BTreeMap<String, bool>,
    #[serde(deserialize_with = "headings_map")]
    pub headings: BTreeMap<String, Vec<String>>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl AnalysisResult {
    /// Read a numeric figure by top-level key.
    pub fn metric(&self, key: &str) -> Option<f64> {
        self.extra.get(key).and_then(as_number)
    }

    /// Read a numeric figure nested one level down, e.g.
    /// `estimated_traffic.monthly_visits` or `backlink_metrics.total_backlinks`.
    pub fn nested_metric(&self, parent: &str, key: &str) -> Option<f64> {
        self.extra
            .get(parent)
            .and_then(Value::as_object)
            .and_then(|obj| obj.get(key))
            .and_then(as_number)
    }

    /// Number of headings recorded for a tag such as `h1`.
    ///
    /// Falls back to `content_metrics[tag]` when the backend sent counts but
    /// no heading texts.
    pub fn heading_count(&self, tag: &str) -> u64 {
        match self.headings.get(tag) {
            Some(list) if !list.is_empty() => list.len() as u64,
            _ => self
                .content_metrics
                .get(tag)
                .map(|n| n.max(0.0) as u64)
                .unwrap_or(0),
        }
    }
}

/// A successfully parsed backend response.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", content = "result", rename_all = "lowercase")]
pub enum Outcome {
    Keywords(KeywordResult),
    Analysis(AnalysisResult),
}

impl Outcome {
    pub fn url(&self) -> &str {
        match self {
            Self::Keywords(r) => &r.url,
            Self::Analysis(r) => &r.url,
        }
    }

    pub fn title(&self) -> Option<&str> {
        match self {
            Self::Keywords(r) => r.title.as_deref(),
            Self::Analysis(r) => r.title.as_deref(),
        }
    }

    pub fn meta_description(&self) -> Option<&str> {
        match self {
            Self::Keywords(r) => r.meta_description.as_deref(),
            Self::Analysis(r) => r.meta_description.as_deref(),
        }
    }

    pub fn word_count(&self) -> u64 {
        match self {
            Self::Keywords(r) => r.word_count,
            Self::Analysis(r) => r.word_count,
        }
    }

    pub fn keywords(&self) -> &KeywordGroups {
        match self {
            Self::Keywords(r) => &r.keywords,
            Self::Analysis(r) => &r.keywords,
        }
    }

    pub fn analysis(&self) -> Option<&AnalysisResult> {
        match self {
            Self::Analysis(r) => Some(r),
            Self::Keywords(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Lenient field decoders
// ---------------------------------------------------------------------------

/// Interpret a JSON value as a number: numbers as-is, numeric strings parsed.
pub fn as_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().replace(',', "").parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|n| n.is_finite())
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn lenient_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(as_number(&value).map(|n| n.max(0.0) as u64).unwrap_or(0))
}

fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(strings_of(&value))
}

fn strings_of(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn numeric_map<'de, D>(deserializer: D) -> Result<BTreeMap<String, f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let Value::Object(obj) = value else {
        return Ok(BTreeMap::new());
    };
    Ok(obj
        .into_iter()
        .filter_map(|(k, v)| as_number(&v).map(|n| (k, n)))
        .collect())
}

fn bool_map<'de, D>(deserializer: D) -> Result<BTreeMap<String, bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let Value::Object(obj) = value else {
        return Ok(BTreeMap::new());
    };
    Ok(obj
        .into_iter()
        .filter_map(|(k, v)| v.as_bool().map(|b| (k, b)))
        .collect())
}

fn headings_map<'de, D>(deserializer: D) -> Result<BTreeMap<String, Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let Value::Object(obj) = value else {
        return Ok(BTreeMap::new());
    };
    Ok(obj
        .into_iter()
        .map(|(k, v)| (k, strings_of(&v)))
        .collect())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
