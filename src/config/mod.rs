/// Configuration system for seo-research.
///
/// Provides a layered configuration hierarchy:
///
/// 1. **Built-in defaults** — hardcoded in [`schema::AppConfig::default()`]
/// 2. **User global config** — `~/.seo-research/config.toml`
/// 3. **Project local config** — `.seo-research.toml` in the current directory
/// 4. **Environment variables** — highest precedence
///
/// Later layers override earlier ones key by key: a file that only sets
/// `backend.url` leaves every other value from the previous layer intact.
/// Malformed files are skipped with a warning.
///
/// # Usage
///
/// ```rust,ignore
/// use seo_research::config;
///
/// let cfg = config::load();
/// let client = BackendClient::new(&cfg.backend.url)?;
/// ```
pub mod schema;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub use schema::{AppConfig, OutputFormat};

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Load the fully resolved configuration.
///
/// Merges all layers in order: defaults → global TOML → project TOML → env
/// vars.
pub fn load() -> AppConfig {
    let mut config = load_layers(&[global_config_path(), project_config_path()]);
    apply_env_overrides(&mut config);
    config
}

/// Merge the given TOML files (in order) over the built-in defaults.
pub fn load_layers(paths: &[Option<PathBuf>]) -> AppConfig {
    let mut merged = match toml::Value::try_from(AppConfig::default()) {
        Ok(value) => value,
        Err(_) => return AppConfig::default(),
    };

    for path in paths.iter().flatten() {
        let Some(layer) = load_toml_file(path) else {
            continue;
        };
        let mut candidate = merged.clone();
        merge_values(&mut candidate, layer);
        match candidate.clone().try_into::<AppConfig>() {
            Ok(_) => merged = candidate,
            Err(e) => {
                tracing::warn!(path = %path.display(), "ignoring config with invalid values: {e}");
            }
        }
    }

    merged.try_into().unwrap_or_else(|e| {
        tracing::warn!("config layers did not resolve, using defaults: {e}");
        AppConfig::default()
    })
}

/// Read a TOML file as a raw value. Missing files are silent; malformed
/// files are logged and skipped.
fn load_toml_file(path: &Path) -> Option<toml::Value> {
    let content = fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(value) => {
            tracing::debug!(path = %path.display(), "loaded config layer");
            Some(value)
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), "ignoring malformed config: {e}");
            None
        }
    }
}

/// Recursively overlay `overlay` onto `base`. Tables merge; everything else
/// replaces.
fn merge_values(base: &mut toml::Value, overlay: toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base_table), toml::Value::Table(overlay_table)) => {
            for (key, value) in overlay_table {
                match base_table.get_mut(&key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        base_table.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

// ---------------------------------------------------------------------------
// File paths
// ---------------------------------------------------------------------------

/// Path to the user global config: `~/.seo-research/config.toml`.
fn global_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".seo-research").join("config.toml"))
}

/// Path to the project local config: `.seo-research.toml` in the current directory.
fn project_config_path() -> Option<PathBuf> {
    std::env::current_dir()
        .ok()
        .map(|cwd| cwd.join(".seo-research.toml"))
}

/// Return the path to the global config file for display/init purposes.
pub fn global_config_file() -> Option<PathBuf> {
    global_config_path()
}

/// Return the path to the project config file for display purposes.
pub fn project_config_file() -> Option<PathBuf> {
    project_config_path()
}

/// Expand a leading `~` to the home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    if path == "~"
        && let Some(home) = dirs::home_dir()
    {
        return home;
    }
    PathBuf::from(path)
}

// ---------------------------------------------------------------------------
// Environment variable overrides
// ---------------------------------------------------------------------------

/// Apply environment variable overrides (highest precedence layer).
///
/// Supported variables:
/// - `NEXT_PUBLIC_FASTAPI_URL` — backend origin (legacy name)
/// - `SEO_RESEARCH_BACKEND_URL` — backend origin (wins over the legacy name)
/// - `SEO_RESEARCH_TOP_N` — default AI keyword count
/// - `SEO_RESEARCH_FORMAT` — `table`, `json` or `csv`
/// - `SEO_RESEARCH_LOG` — diagnostic level
/// - `SEO_RESEARCH_HISTORY` — request log on/off (`1`/`true`/`yes`/`on`)
/// - `NO_COLOR` — any non-empty value disables colors
fn apply_env_overrides(config: &mut AppConfig) {
    apply_overrides(config, |key| std::env::var(key).ok());
}

/// Apply overrides from an arbitrary variable source.
pub fn apply_overrides(config: &mut AppConfig, var: impl Fn(&str) -> Option<String>) {
    // Backend
    for key in ["NEXT_PUBLIC_FASTAPI_URL", "SEO_RESEARCH_BACKEND_URL"] {
        if let Some(val) = var(key)
            && !val.trim().is_empty()
        {
            config.backend.url = val.trim().to_string();
        }
    }
    if let Some(val) = var("SEO_RESEARCH_TOP_N")
        && let Ok(n) = val.trim().parse::<u32>()
    {
        config.backend.default_top_n = n;
    }

    // Output
    if let Some(val) = var("SEO_RESEARCH_FORMAT")
        && !val.is_empty()
    {
        config.output.format = OutputFormat::from_str_opt(Some(&val));
    }
    if let Some(val) = var("NO_COLOR")
        && !val.is_empty()
    {
        config.output.color = false;
    }

    // Logging
    if let Some(val) = var("SEO_RESEARCH_LOG")
        && !val.is_empty()
    {
        config.logging.level = val;
    }
    if let Some(val) = var("SEO_RESEARCH_HISTORY") {
        config.logging.enabled = is_truthy(&val);
    }
}

/// Check if a string value represents a truthy boolean.
fn is_truthy(val: &str) -> bool {
    matches!(
        val.to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

// ---------------------------------------------------------------------------
// Config init / set / reset
// ---------------------------------------------------------------------------

/// Write the default annotated config to `~/.seo-research/config.toml`.
///
/// Returns an error if the file already exists, unless `force` is set.
pub fn init_config(force: bool) -> Result<PathBuf> {
    let path = global_config_path().context("could not determine home directory")?;
    init_config_at(&path, force)?;
    Ok(path)
}

fn init_config_at(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create config directory")?;
    }

    fs::write(path, AppConfig::default_toml()).context("failed to write config file")
}

/// Set a single config key in the global config file.
///
/// Supports dotted keys like `backend.url`. The value is typed after the
/// existing value at that key.
pub fn set_config_value(key: &str, value: &str) -> Result<()> {
    let path = global_config_path().context("could not determine home directory")?;
    set_config_value_at(&path, key, value)
}

fn set_config_value_at(path: &Path, key: &str, value: &str) -> Result<()> {
    // Start from the file if present, else from serialized defaults, so every
    // known key exists and carries its type.
    let mut root: toml::Value = if path.exists() {
        let content = fs::read_to_string(path).context("failed to read config file")?;
        let mut defaults = toml::Value::try_from(AppConfig::default())
            .context("failed to serialize default config")?;
        let current: toml::Value =
            toml::from_str(&content).context("failed to parse config as TOML value")?;
        merge_values(&mut defaults, current);
        defaults
    } else {
        toml::Value::try_from(AppConfig::default()).context("failed to serialize default config")?
    };

    set_toml_value(&mut root, key, value)?;

    // Reject values that would make the file unloadable.
    let _: AppConfig = root
        .clone()
        .try_into()
        .with_context(|| format!("invalid value for '{key}': {value}"))?;

    let output = toml::to_string_pretty(&root).context("failed to serialize updated config")?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create config directory")?;
    }
    fs::write(path, output).context("failed to write config file")
}

/// Set a value in a TOML value tree using a dotted key path.
fn set_toml_value(root: &mut toml::Value, key: &str, raw_value: &str) -> Result<()> {
    let parts: Vec<&str> = key.split('.').collect();
    if parts.iter().any(|p| p.is_empty()) {
        anyhow::bail!("invalid config key: '{key}'");
    }

    let mut current = root;
    for &part in &parts[..parts.len() - 1] {
        current = current
            .get_mut(part)
            .with_context(|| format!("config key not found: section '{part}' in '{key}'"))?;
    }

    let leaf = parts[parts.len() - 1];
    let table = current.as_table_mut().with_context(|| {
        format!(
            "expected table at '{}'",
            key.rsplit_once('.').map(|(s, _)| s).unwrap_or("")
        )
    })?;

    let new_value = match table.get(leaf) {
        Some(toml::Value::Boolean(_)) => toml::Value::Boolean(is_truthy(raw_value)),
        Some(toml::Value::Integer(_)) => {
            let n: i64 = raw_value
                .parse()
                .with_context(|| format!("expected integer for '{key}', got '{raw_value}'"))?;
            toml::Value::Integer(n)
        }
        Some(toml::Value::Float(_)) => {
            let f: f64 = raw_value
                .parse()
                .with_context(|| format!("expected float for '{key}', got '{raw_value}'"))?;
            toml::Value::Float(f)
        }
        Some(_) => toml::Value::String(raw_value.to_string()),
        None => anyhow::bail!("unknown config key: '{key}'"),
    };

    table.insert(leaf.to_string(), new_value);
    Ok(())
}

/// Reset the global config to defaults (overwrite the file).
pub fn reset_config() -> Result<PathBuf> {
    init_config(true)
}

/// Render a resolved config (files, env and command-line overrides applied)
/// as TOML.
pub fn show_effective_config(config: &AppConfig) -> Result<String> {
    toml::to_string_pretty(config).context("failed to serialize effective config")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn is_truthy_accepts_variants() {
        assert!(is_truthy("1"));
        assert!(is_truthy("TRUE"));
        assert!(is_truthy("yes"));
        assert!(is_truthy("On"));
        assert!(!is_truthy("0"));
        assert!(!is_truthy("off"));
        assert!(!is_truthy(""));
    }

    #[test]
    fn legacy_backend_variable_is_honored() {
        let mut config = AppConfig::default();
        apply_overrides(&mut config, vars(&[("NEXT_PUBLIC_FASTAPI_URL", "http://api:8000")]));
        assert_eq!(config.backend.url, "http://api:8000");
    }

    #[test]
    fn native_backend_variable_wins() {
        let mut config = AppConfig::default();
        apply_overrides(
            &mut config,
            vars(&[
                ("NEXT_PUBLIC_FASTAPI_URL", "http://legacy:8000"),
                ("SEO_RESEARCH_BACKEND_URL", "http://native:8000"),
            ]),
        );
        assert_eq!(config.backend.url, "http://native:8000");
    }

    #[test]
    fn env_overrides_output_and_logging() {
        let mut config = AppConfig::default();
        apply_overrides(
            &mut config,
            vars(&[
                ("SEO_RESEARCH_FORMAT", "json"),
                ("NO_COLOR", "1"),
                ("SEO_RESEARCH_LOG", "debug"),
                ("SEO_RESEARCH_HISTORY", "off"),
                ("SEO_RESEARCH_TOP_N", "50"),
            ]),
        );
        assert_eq!(config.output.format, OutputFormat::Json);
        assert!(!config.output.color);
        assert_eq!(config.logging.level, "debug");
        assert!(!config.logging.enabled);
        assert_eq!(config.backend.default_top_n, 50);
    }

    #[test]
    fn empty_env_values_are_ignored() {
        let mut config = AppConfig::default();
        apply_overrides(
            &mut config,
            vars(&[("SEO_RESEARCH_BACKEND_URL", "  "), ("NO_COLOR", "")]),
        );
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn layers_merge_key_by_key() {
        let dir = tempfile::tempdir().unwrap();
        let global = dir.path().join("global.toml");
        let project = dir.path().join("project.toml");
        fs::write(&global, "[backend]\nurl = \"http://global:1\"\ndefault_top_n = 40\n").unwrap();
        fs::write(&project, "[backend]\nurl = \"http://project:2\"\n").unwrap();

        let config = load_layers(&[Some(global), Some(project)]);
        assert_eq!(config.backend.url, "http://project:2");
        assert_eq!(config.backend.default_top_n, 40);
        assert_eq!(config.web, schema::WebConfig::default());
    }

    #[test]
    fn malformed_layer_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let bad = dir.path().join("bad.toml");
        fs::write(&bad, "[backend\nurl = ").unwrap();
        let config = load_layers(&[Some(bad), Some(dir.path().join("missing.toml"))]);
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn mistyped_layer_keeps_other_layers() {
        let dir = tempfile::tempdir().unwrap();
        let global = dir.path().join("global.toml");
        let project = dir.path().join("project.toml");
        fs::write(&global, "[backend]\nurl = \"http://global:1\"\n").unwrap();
        fs::write(&project, "[web]\nopen_browser = \"no\"\n").unwrap();

        let config = load_layers(&[Some(global), Some(project)]);
        assert_eq!(config.backend.url, "http://global:1");
        assert!(config.web.open_browser);
    }

    #[test]
    fn set_value_writes_typed_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cfg").join("config.toml");

        set_config_value_at(&path, "backend.url", "http://x:1").unwrap();
        set_config_value_at(&path, "backend.default_top_n", "35").unwrap();
        set_config_value_at(&path, "web.open_browser", "false").unwrap();
        set_config_value_at(&path, "output.format", "csv").unwrap();

        let config = load_layers(&[Some(path.clone())]);
        assert_eq!(config.backend.url, "http://x:1");
        assert_eq!(config.backend.default_top_n, 35);
        assert!(!config.web.open_browser);
        assert_eq!(config.output.format, OutputFormat::Csv);
    }

    #[test]
    fn set_value_rejects_bad_keys_and_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        assert!(set_config_value_at(&path, "nonexistent.key", "x").is_err());
        assert!(set_config_value_at(&path, "backend.nope", "x").is_err());
        assert!(set_config_value_at(&path, "backend.default_top_n", "many").is_err());
        assert!(set_config_value_at(&path, "output.format", "xml").is_err());
        assert!(set_config_value_at(&path, "", "x").is_err());
        assert!(!path.exists());
    }

    #[test]
    fn init_refuses_to_overwrite_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        init_config_at(&path, false).unwrap();
        assert!(init_config_at(&path, false).is_err());
        init_config_at(&path, true).unwrap();
        let parsed: AppConfig = toml::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed, AppConfig::default());
    }

    #[test]
    fn expand_tilde_handles_home() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_tilde("~/x.jsonl"), home.join("x.jsonl"));
        }
        assert_eq!(expand_tilde("/tmp/x.jsonl"), PathBuf::from("/tmp/x.jsonl"));
    }

    #[test]
    fn show_effective_config_returns_toml() {
        let mut config = AppConfig::default();
        config.backend.url = "http://override:9".to_string();
        let toml_str = show_effective_config(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.backend.url, "http://override:9");
    }
}
