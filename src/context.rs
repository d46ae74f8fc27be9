//! Resolved configuration plus the long-lived pieces built from it, shared by
//! the CLI handlers and the web dashboard.

use anyhow::Result;

use crate::client::{BackendClient, Mode};
use crate::config::{AppConfig, OutputFormat};
use crate::history::RequestLog;
use crate::session::Session;

#[derive(Debug, Clone)]
pub struct AppContext {
    pub config: AppConfig,
    pub client: BackendClient,
    pub log: RequestLog,
}

impl AppContext {
    pub fn new(config: AppConfig) -> Result<Self> {
        let client = BackendClient::new(&config.backend.url)?;
        let log = RequestLog::from_config(&config.logging);
        Ok(Self {
            config,
            client,
            log,
        })
    }

    /// `--format` if given, else the configured default.
    pub fn format(&self, flag: Option<&str>) -> OutputFormat {
        match flag {
            Some(f) => OutputFormat::from_str_opt(Some(f)),
            None => self.config.output.format,
        }
    }

    /// Run one request through a fresh session and record it in the request
    /// log. `top_n` defaults to the configured value and is clamped.
    pub fn run(&self, url: &str, mode: Mode, top_n: Option<u32>) -> Session {
        let mut session =
            Session::new(url).with_top_n(top_n.unwrap_or_else(|| self.config.backend.top_n()));
        session.submit(&self.client, mode);
        self.log.record_session(&session);
        session
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::ViewState;

    fn context(dir: &std::path::Path) -> AppContext {
        let mut config = AppConfig::default();
        config.logging.path = dir.join("log.jsonl").display().to_string();
        AppContext::new(config).unwrap()
    }

    #[test]
    fn format_flag_overrides_config() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(dir.path());
        assert_eq!(ctx.format(None), OutputFormat::Table);
        assert_eq!(ctx.format(Some("json")), OutputFormat::Json);
    }

    #[test]
    fn invalid_url_is_not_logged() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(dir.path());
        let session = ctx.run("not a url", Mode::Keywords, None);
        assert!(matches!(session.state(), ViewState::Errored(_)));
        assert!(session.last_attempt().is_none());
        assert!(ctx.log.read_all().is_empty());
    }

    #[test]
    fn bad_backend_origin_is_rejected() {
        let mut config = AppConfig::default();
        config.backend.url = "not a url".to_string();
        assert!(AppContext::new(config).is_err());
    }
}
