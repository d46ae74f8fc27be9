//! CLI command implementations for seo-research.
//!
//! Provides subcommand handlers for:
//! - `seo-research keywords <URL>` — keyword extraction
//! - `seo-research analyze <URL>` — full analysis dashboard
//! - `seo-research export <URL>` — CSV file or clipboard export
//! - `seo-research health` — check backend, config, request log
//! - `seo-research history` — request history summary
//! - `seo-research config show|init|set|reset` — configuration management

use std::path::PathBuf;

use anyhow::{Context, Result};
use colored::Colorize;

use crate::client::Mode;
use crate::config::{self, AppConfig, OutputFormat};
use crate::context::AppContext;
use crate::export;
use crate::history::{self, HistoryStats};
use crate::model::Outcome;
use crate::render::{Dashboard, Tab, format_number, terminal};
use crate::session::ViewState;
use crate::validate::is_valid_url;

/// Run one request and turn the final view state into a result.
fn fetch_outcome(
    ctx: &AppContext,
    url: &str,
    mode: Mode,
    top_n: Option<u32>,
    quiet: bool,
) -> Result<Outcome> {
    if !quiet && is_valid_url(url) {
        eprintln!(
            "{}",
            format!("Analyzing {url} via {}…", ctx.client.origin()).dimmed()
        );
    }

    let session = ctx.run(url, mode, top_n);
    match session.state() {
        ViewState::Loaded(outcome) => Ok(outcome.clone()),
        ViewState::Errored(message) => anyhow::bail!("{message}"),
        ViewState::Idle | ViewState::Loading => anyhow::bail!("no result"),
    }
}

// ---------------------------------------------------------------------------
// seo-research keywords | analyze
// ---------------------------------------------------------------------------

/// Fetch and print one analysis.
pub fn run_fetch(
    ctx: &AppContext,
    url: &str,
    mode: Mode,
    top_n: Option<u32>,
    format: OutputFormat,
    tab: Option<Tab>,
) -> Result<()> {
    let outcome = fetch_outcome(ctx, url, mode, top_n, format != OutputFormat::Table)?;
    let dashboard = Dashboard::from_outcome(&outcome);

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&dashboard)?);
        }
        OutputFormat::Csv => match export::keywords_csv_text(outcome.keywords()) {
            Some(csv) => print!("{csv}"),
            None => println!("{}", export::CSV_HEADER),
        },
        OutputFormat::Table => terminal::print_dashboard(&dashboard, tab),
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// seo-research export
// ---------------------------------------------------------------------------

/// Fetch keywords and write them to a CSV file or the clipboard.
pub fn run_export(
    ctx: &AppContext,
    url: &str,
    mode: Mode,
    top_n: Option<u32>,
    out: Option<PathBuf>,
    clipboard: bool,
) -> Result<()> {
    let outcome = fetch_outcome(ctx, url, mode, top_n, false)?;
    let groups = outcome.keywords();

    if clipboard {
        let Some(text) = export::clipboard_text(groups) else {
            println!("{}", "No merged keywords to copy.".yellow());
            return Ok(());
        };
        export::copy_to_clipboard(&text)?;
        println!(
            "{} Copied {} merged keywords to the clipboard",
            "✓".green().bold(),
            groups.merged.len()
        );
        return Ok(());
    }

    let path = out.unwrap_or_else(|| PathBuf::from(export::csv_filename(outcome.url())));
    match export::write_csv(groups, &path)? {
        Some(path) => println!(
            "{} Wrote {} keywords to {}",
            "✓".green().bold(),
            groups.total(),
            path.display()
        ),
        None => println!("{}", "No keywords to export.".yellow()),
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// seo-research health
// ---------------------------------------------------------------------------

/// Check backend reachability, config files and the request log.
pub fn run_health(ctx: &AppContext) -> Result<()> {
    println!("{}", "SEO Research Health Check".bold().cyan());
    println!("{}", "=".repeat(40));

    // Backend
    let (backend_ok, backend_detail) = match ctx.client.health() {
        Ok(true) => (true, format!("reachable at {}", ctx.client.origin())),
        Ok(false) => (false, format!("{} answered but did not report ok", ctx.client.origin())),
        Err(e) => (false, format!("{}: {}", ctx.client.origin(), e.user_message())),
    };
    print_health_item("Analysis backend", backend_ok, &backend_detail);

    // Config files
    let global_exists = config::global_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let project_exists = config::project_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    print_health_item(
        "Global config",
        global_exists,
        if global_exists {
            "~/.seo-research/config.toml found"
        } else {
            "not found (run `seo-research config init` to create)"
        },
    );
    print_health_item(
        "Project config",
        project_exists,
        if project_exists {
            ".seo-research.toml found"
        } else {
            "none (optional)"
        },
    );
    print_health_item(
        "AI keyword count",
        true,
        &ctx.config.backend.top_n().to_string(),
    );

    // Request log
    if ctx.log.is_enabled() {
        let log_exists = ctx.log.path().exists();
        print_health_item(
            "Request log",
            log_exists,
            &if log_exists {
                format!("{} entries", ctx.log.read_all().len())
            } else {
                "no log file yet".to_string()
            },
        );
    } else {
        print_health_item("Request log", false, "disabled (logging.enabled = false)");
    }

    Ok(())
}

fn print_health_item(name: &str, ok: bool, detail: &str) {
    let status = if ok {
        "✓".green().bold()
    } else {
        "✗".red().bold()
    };
    println!("  {} {:<20} {}", status, name, detail.dimmed());
}

// ---------------------------------------------------------------------------
// seo-research history
// ---------------------------------------------------------------------------

/// Summarize the request log.
pub fn run_history(ctx: &AppContext, days: Option<u32>, format: OutputFormat) -> Result<()> {
    let stats = history::compute_stats(&ctx.log, days);

    if stats.total_requests == 0 && format == OutputFormat::Table {
        println!(
            "{}",
            "No requests recorded yet. Run `seo-research keywords <URL>` to get started."
                .yellow()
        );
        return Ok(());
    }

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&stats)?),
        OutputFormat::Csv => print_history_csv(&stats),
        OutputFormat::Table => print_history_table(&stats, days),
    }

    Ok(())
}

fn print_history_table(stats: &HistoryStats, days: Option<u32>) {
    let title = match days {
        Some(d) => format!("Request History — Last {d} Days"),
        None => "Request History".to_string(),
    };
    println!("{}", title.bold().cyan());
    println!("{}", "=".repeat(50));
    println!();

    println!("  {} {}", "Total requests:".bold(), stats.total_requests);
    println!(
        "  {} {} keywords · {} analyze",
        "By mode:       ".bold(),
        stats.keyword_requests,
        stats.analyze_requests
    );
    println!(
        "  {} {} ({:.1}%)",
        "Errors:        ".bold(),
        stats.errors,
        stats.error_pct()
    );
    println!(
        "  {} {:.0}ms",
        "Avg latency:   ".bold(),
        stats.avg_latency_ms
    );
    println!();

    if !stats.daily.is_empty() {
        println!("{}", "Requests per Day".bold().cyan());
        println!("  {:<12} {:>8} {:>8}", "Date", "Requests", "Errors");
        println!("  {}", "-".repeat(30));
        for day in &stats.daily {
            println!(
                "  {:<12} {:>8} {:>8}",
                day.date,
                format_number(day.requests as u64),
                day.errors
            );
        }
        println!();
    }

    if !stats.top_hosts.is_empty() {
        println!("{}", "Most Analyzed Sites".bold().cyan());
        for (i, host) in stats.top_hosts.iter().enumerate() {
            let line = format!("  {:<40} {:>6}", host.host, host.count);
            if i % 2 == 0 {
                println!("{line}");
            } else {
                println!("{}", line.dimmed());
            }
        }
    }
}

fn print_history_csv(stats: &HistoryStats) {
    println!("date,requests,errors");
    for day in &stats.daily {
        println!("{},{},{}", day.date, day.requests, day.errors);
    }
}

// ---------------------------------------------------------------------------
// seo-research config show | init | set | reset
// ---------------------------------------------------------------------------

/// Show the effective (merged) configuration as TOML.
pub fn run_config_show(cfg: &AppConfig, backend_flag: bool) -> Result<()> {
    let toml_str = config::show_effective_config(cfg)?;
    println!("{}", "Effective seo-research Configuration".bold().cyan());
    println!("{}", "=".repeat(50));
    println!();
    println!("{toml_str}");

    let global_exists = config::global_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let project_exists = config::project_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    println!("{}", "Sources (highest priority last):".dimmed());
    println!("  {} built-in defaults", "·".dimmed());
    print_source("~/.seo-research/config.toml", global_exists);
    print_source(".seo-research.toml", project_exists);
    println!(
        "  {} {}",
        "·".dimmed(),
        "SEO_RESEARCH_* / NEXT_PUBLIC_FASTAPI_URL environment variables".dimmed()
    );
    if backend_flag {
        println!("  {} {}", "✓".green(), "--backend flag".dimmed());
    }

    Ok(())
}

fn print_source(name: &str, exists: bool) {
    if exists {
        println!("  {} {}", "✓".green(), name.dimmed());
    } else {
        println!("  {} {}", "·".dimmed(), format!("{name} (not found)").dimmed());
    }
}

/// Initialize a default config file at `~/.seo-research/config.toml`.
pub fn run_config_init(force: bool) -> Result<()> {
    let path = config::init_config(force)?;
    println!(
        "{} Config written to {}",
        "✓".green().bold(),
        path.display()
    );
    println!("  {}", "Set backend.url to point at your analysis service.".dimmed());
    Ok(())
}

/// Set a single configuration value in the global config file.
pub fn run_config_set(key: &str, value: &str) -> Result<()> {
    config::set_config_value(key, value)
        .with_context(|| format!("could not set {key}"))?;
    println!("{} Set {} = {}", "✓".green().bold(), key.bold(), value);
    Ok(())
}

/// Reset configuration to defaults.
pub fn run_config_reset() -> Result<()> {
    let path = config::reset_config()?;
    println!(
        "{} Config reset to defaults at {}",
        "✓".green().bold(),
        path.display()
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
