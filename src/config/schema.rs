/// Configuration schema and defaults for seo-research.
///
/// Defines the TOML-serializable configuration structure with the sections
/// `[backend]`, `[output]`, `[web]` and `[logging]`. Every field has a
/// built-in default; users only set the values they want to override.
use serde::{Deserialize, Serialize};

use crate::client::{DEFAULT_TOP_N, clamp_top_n};

/// Backend origin used when nothing else is configured.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";

/// Address the embedded dashboard binds to by default.
pub const DEFAULT_WEB_ADDR: &str = "127.0.0.1:9747";

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Top-level seo-research configuration.
///
/// Maps directly to `~/.seo-research/config.toml` and `.seo-research.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub backend: BackendConfig,
    pub output: OutputConfig,
    pub web: WebConfig,
    pub logging: LoggingConfig,
}

// ---------------------------------------------------------------------------
// [backend]
// ---------------------------------------------------------------------------

/// Where the analysis service lives and how it is queried.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL of the analysis service.
    pub url: String,
    /// AI keyword count requested in analyze mode (5..=100).
    pub default_top_n: u32,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_BACKEND_URL.to_string(),
            default_top_n: DEFAULT_TOP_N,
        }
    }
}

impl BackendConfig {
    /// `default_top_n` clamped to the allowed range.
    pub fn top_n(&self) -> u32 {
        clamp_top_n(self.default_top_n)
    }
}

// ---------------------------------------------------------------------------
// [output]
// ---------------------------------------------------------------------------

/// Output format for terminal commands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
}

impl OutputFormat {
    pub fn from_str_opt(s: Option<&str>) -> Self {
        match s.map(str::to_ascii_lowercase).as_deref() {
            Some("json") => Self::Json,
            Some("csv") => Self::Csv,
            _ => Self::Table,
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Table => write!(f, "table"),
            Self::Json => write!(f, "json"),
            Self::Csv => write!(f, "csv"),
        }
    }
}

/// Terminal output settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default format when `--format` is not given.
    pub format: OutputFormat,
    /// Colored output. Also disabled by `NO_COLOR`.
    pub color: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Table,
            color: true,
        }
    }
}

// ---------------------------------------------------------------------------
// [web]
// ---------------------------------------------------------------------------

/// Embedded dashboard settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    /// `host:port` the dashboard binds to.
    pub addr: String,
    /// Open the dashboard in the default browser on start.
    pub open_browser: bool,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            addr: DEFAULT_WEB_ADDR.to_string(),
            open_browser: true,
        }
    }
}

// ---------------------------------------------------------------------------
// [logging]
// ---------------------------------------------------------------------------

/// Diagnostics level and request history settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Whether backend requests are appended to the request log.
    pub enabled: bool,
    /// Path to the request log file. `~` is expanded to the home directory.
    pub path: String,
    /// Diagnostic level: `"error"`, `"warn"`, `"info"`, `"debug"`, `"trace"`.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "~/.seo-research/request-log.jsonl".to_string(),
            level: "warn".to_string(),
        }
    }
}

impl AppConfig {
    /// Annotated default config written by `seo-research config init`.
    pub fn default_toml() -> String {
        r#"# seo-research configuration
#
# Configuration hierarchy (highest precedence wins):
#   1. Environment variables (SEO_RESEARCH_*, NEXT_PUBLIC_FASTAPI_URL, NO_COLOR)
#   2. Project config (.seo-research.toml in current directory)
#   3. User global config (~/.seo-research/config.toml)
#   4. Built-in defaults

[backend]
url = "http://localhost:8000"   # Analysis service origin
default_top_n = 20              # AI keywords requested by `analyze` (5-100)

[output]
format = "table"                # table | json | csv
color = true

[web]
addr = "127.0.0.1:9747"
open_browser = true

[logging]
enabled = true                  # Append every backend request to the request log
path = "~/.seo-research/request-log.jsonl"
level = "warn"                  # error | warn | info | debug | trace
"#
        .to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_toml_parses_back() {
        let config: AppConfig = toml::from_str(&AppConfig::default_toml()).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
[backend]
url = "https://seo.internal:9000"
"#,
        )
        .unwrap();
        assert_eq!(config.backend.url, "https://seo.internal:9000");
        assert_eq!(config.backend.default_top_n, 20);
        assert!(config.logging.enabled);
        assert_eq!(config.web.addr, DEFAULT_WEB_ADDR);
    }

    #[test]
    fn top_n_is_clamped() {
        let mut backend = BackendConfig::default();
        backend.default_top_n = 1;
        assert_eq!(backend.top_n(), 5);
        backend.default_top_n = 1000;
        assert_eq!(backend.top_n(), 100);
    }

    #[test]
    fn output_format_parsing() {
        assert_eq!(OutputFormat::from_str_opt(None), OutputFormat::Table);
        assert_eq!(OutputFormat::from_str_opt(Some("json")), OutputFormat::Json);
        assert_eq!(OutputFormat::from_str_opt(Some("CSV")), OutputFormat::Csv);
        assert_eq!(OutputFormat::from_str_opt(Some("xml")), OutputFormat::Table);
        assert_eq!(OutputFormat::Json.to_string(), "json");
    }
}
