use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use seo_research::cli;
use seo_research::client::{MAX_TOP_N, MIN_TOP_N, Mode};
use seo_research::config::{self, AppConfig};
use seo_research::context::AppContext;
use seo_research::render::Tab;
use seo_research::web;

#[derive(Debug, Parser)]
#[command(name = "seo-research")]
#[command(about = "SEO Research Pro — keyword, content and competitor insights from your analysis backend")]
struct App {
    /// Analysis backend origin (overrides config and environment)
    #[arg(long, global = true)]
    backend: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Extract keywords for a page
    Keywords {
        url: String,
        /// Output format: table, json, csv (default from config)
        #[arg(long)]
        format: Option<String>,
        /// Only print one tab: overview, keywords
        #[arg(long, value_parser = parse_tab)]
        tab: Option<Tab>,
    },
    /// Run the full analysis: keywords, content, technical SEO, competitor metrics
    Analyze {
        url: String,
        /// Number of AI-suggested keywords to request (5-100)
        #[arg(long, value_parser = clap::value_parser!(u32).range(MIN_TOP_N as i64..=MAX_TOP_N as i64))]
        top_n: Option<u32>,
        /// Output format: table, json, csv (default from config)
        #[arg(long)]
        format: Option<String>,
        /// Only print one tab: overview, keywords, content, technical, competitor
        #[arg(long, value_parser = parse_tab)]
        tab: Option<Tab>,
    },
    /// Export keywords to a CSV file or the clipboard
    Export {
        url: String,
        /// Which backend endpoint supplies the keywords: keywords or analyze
        #[arg(long, default_value = "keywords", value_parser = parse_mode)]
        mode: Mode,
        /// Number of AI-suggested keywords to request in analyze mode (5-100)
        #[arg(long, value_parser = clap::value_parser!(u32).range(MIN_TOP_N as i64..=MAX_TOP_N as i64))]
        top_n: Option<u32>,
        /// CSV output path (default: keywords-{host}.csv)
        #[arg(long, conflicts_with = "clipboard")]
        out: Option<PathBuf>,
        /// Copy the merged keywords to the clipboard instead of writing CSV
        #[arg(long)]
        clipboard: bool,
    },
    /// Check backend reachability, config files and the request log
    Health,
    /// Summarize past requests from the request log
    History {
        /// Only include the last N days
        #[arg(long)]
        days: Option<u32>,
        /// Output format: table, json, csv (default from config)
        #[arg(long)]
        format: Option<String>,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Start the browser dashboard
    Web {
        /// Address to bind (default from config: 127.0.0.1:9747)
        #[arg(long)]
        addr: Option<String>,
        /// Do not open the browser
        #[arg(long)]
        no_open: bool,
    },
}

#[derive(Debug, Subcommand)]
enum ConfigAction {
    /// Show the effective configuration
    Show,
    /// Write a default config to ~/.seo-research/config.toml
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Set a value, e.g. `config set backend.url http://localhost:8000`
    Set { key: String, value: String },
    /// Reset the global config to defaults
    Reset,
}

fn parse_tab(value: &str) -> Result<Tab, String> {
    Tab::parse(value).ok_or_else(|| format!("unknown tab '{value}'"))
}

fn parse_mode(value: &str) -> Result<Mode, String> {
    Mode::parse(value).ok_or_else(|| format!("unknown mode '{value}' (keywords or analyze)"))
}

fn main() -> ExitCode {
    let app = App::parse();

    let mut cfg = config::load();
    if let Some(backend) = &app.backend {
        cfg.backend.url = backend.clone();
    }
    init_tracing(&cfg);
    if !cfg.output.color {
        colored::control::set_override(false);
    }

    match run(app.command, cfg, app.backend.is_some()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {e:#}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}

/// Diagnostics go to stderr so stdout stays clean for JSON/CSV output.
fn init_tracing(cfg: &AppConfig) {
    let filter = EnvFilter::try_from_env("SEO_RESEARCH_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .or_else(|_| EnvFilter::try_new(&cfg.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_ansi(cfg.output.color),
        )
        .try_init();
}

fn run(command: Commands, cfg: AppConfig, backend_flag: bool) -> Result<()> {
    match command {
        // Config management works even when the backend URL is broken.
        Commands::Config { action } => run_config(action, &cfg, backend_flag),
        command => run_with_context(command, &AppContext::new(cfg)?),
    }
}

fn run_config(action: ConfigAction, cfg: &AppConfig, backend_flag: bool) -> Result<()> {
    match action {
        ConfigAction::Show => cli::run_config_show(cfg, backend_flag),
        ConfigAction::Init { force } => cli::run_config_init(force),
        ConfigAction::Set { key, value } => cli::run_config_set(&key, &value),
        ConfigAction::Reset => cli::run_config_reset(),
    }
}

fn run_with_context(command: Commands, ctx: &AppContext) -> Result<()> {
    match command {
        Commands::Keywords { url, format, tab } => {
            let fmt = ctx.format(format.as_deref());
            cli::run_fetch(ctx, &url, Mode::Keywords, None, fmt, tab)
        }
        Commands::Analyze {
            url,
            top_n,
            format,
            tab,
        } => {
            let fmt = ctx.format(format.as_deref());
            cli::run_fetch(ctx, &url, Mode::Analyze, top_n, fmt, tab)
        }
        Commands::Export {
            url,
            mode,
            top_n,
            out,
            clipboard,
        } => cli::run_export(ctx, &url, mode, top_n, out, clipboard),
        Commands::Health => cli::run_health(ctx),
        Commands::History { days, format } => {
            let fmt = ctx.format(format.as_deref());
            cli::run_history(ctx, days, fmt)
        }
        Commands::Web { addr, no_open } => {
            let addr = addr.unwrap_or_else(|| ctx.config.web.addr.clone());
            let open = ctx.config.web.open_browser && !no_open;
            web::serve(ctx, &addr, open)
        }
        Commands::Config { action } => run_config(action, &ctx.config, false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        App::command().debug_assert();
    }

    #[test]
    fn top_n_out_of_range_is_rejected() {
        assert!(App::try_parse_from(["seo-research", "analyze", "https://a.com", "--top-n", "4"]).is_err());
        assert!(App::try_parse_from(["seo-research", "analyze", "https://a.com", "--top-n", "101"]).is_err());
        assert!(App::try_parse_from(["seo-research", "analyze", "https://a.com", "--top-n", "100"]).is_ok());
    }

    #[test]
    fn global_backend_flag_after_subcommand() {
        let app = App::try_parse_from(["seo-research", "health", "--backend", "http://x:1"]).unwrap();
        assert_eq!(app.backend.as_deref(), Some("http://x:1"));
    }

    #[test]
    fn backend_flag_reaches_config_show() {
        let app =
            App::try_parse_from(["seo-research", "--backend", "http://flag:2", "config", "show"])
                .unwrap();
        assert_eq!(app.backend.as_deref(), Some("http://flag:2"));
        assert!(matches!(
            app.command,
            Commands::Config {
                action: ConfigAction::Show
            }
        ));

        let mut cfg = AppConfig::default();
        cfg.backend.url = app.backend.unwrap();
        let shown = config::show_effective_config(&cfg).unwrap();
        assert!(shown.contains("http://flag:2"));
    }

    #[test]
    fn export_clipboard_conflicts_with_out() {
        assert!(
            App::try_parse_from([
                "seo-research",
                "export",
                "https://a.com",
                "--out",
                "k.csv",
                "--clipboard"
            ])
            .is_err()
        );
    }
}
