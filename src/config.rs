//! Layered configuration for agency-desk.
//!
//! Settings are read from `desk.toml` and then overridden by the environment
//! and finally by CLI flags:
//!
//! ```toml
//! [api]
//! base_url = "https://api.example-agency.com"
//! token = "0123abcd"
//! timeout_secs = 30
//!
//! [ui]
//! items_per_page = 12
//! currency = "ZAR"
//!
//! [log]
//! level = "warn"
//! json = false
//! ```
//!
//! The file is looked up at `.agency/desk.toml` in the working directory,
//! then at `<config dir>/agency-desk/desk.toml`.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::currency::Currency;
use crate::pagination::PAGE_SIZE_OPTIONS;

pub const ENV_BASE_API: &str = "AGENCY_BASE_API";
pub const ENV_API_TOKEN: &str = "AGENCY_API_TOKEN";
pub const ENV_LOG: &str = "AGENCY_LOG";

pub const DEFAULT_BASE_URL: &str = "https://api.example-agency.com";
const CONFIG_FILE: &str = "desk.toml";

/// Backend connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSection {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for ApiSection {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Display preferences for tables and prices.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiSection {
    #[serde(default = "default_items_per_page")]
    pub items_per_page: usize,
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_items_per_page() -> usize {
    12
}

fn default_currency() -> String {
    "ZAR".to_string()
}

impl Default for UiSection {
    fn default() -> Self {
        Self {
            items_per_page: default_items_per_page(),
            currency: default_currency(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogSection {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

/// The complete desk.toml structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeskToml {
    #[serde(default)]
    pub api: ApiSection,
    #[serde(default)]
    pub ui: UiSection,
    #[serde(default)]
    pub log: LogSection,
}

impl DeskToml {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse desk.toml")
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize desk.toml")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// Validate the configuration and return any warnings.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        let url = self.api.base_url.trim();
        if !(url.starts_with("https://") || url.starts_with("http://")) {
            warnings.push(format!(
                "Invalid api.base_url '{}': must start with http:// or https://",
                self.api.base_url
            ));
        } else if url.starts_with("http://")
            && !(url.contains("localhost") || url.contains("127.0.0.1"))
        {
            warnings.push(format!(
                "api.base_url '{}' is not HTTPS; the token will be sent in clear text",
                self.api.base_url
            ));
        }

        if self.api.timeout_secs == 0 {
            warnings.push("api.timeout_secs must be greater than 0".to_string());
        }

        if !PAGE_SIZE_OPTIONS.contains(&self.ui.items_per_page) {
            warnings.push(format!(
                "Unsupported ui.items_per_page {}: expected one of {:?}",
                self.ui.items_per_page, PAGE_SIZE_OPTIONS
            ));
        }

        if self.ui.currency.parse::<Currency>().is_err() {
            warnings.push(format!("Unknown ui.currency '{}'", self.ui.currency));
        }

        if self.log.level.parse::<tracing::Level>().is_err() {
            warnings.push(format!("Invalid log.level '{}'", self.log.level));
        }

        warnings
    }
}

/// Flags from the command line that take precedence over file and env.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub base_api: Option<String>,
    pub token: Option<String>,
    pub verbose: bool,
    pub json_logs: bool,
}

/// Effective configuration after layering file → env → CLI.
#[derive(Debug, Clone)]
pub struct DeskConfig {
    /// Where the file layer came from, if a file was found.
    pub source: Option<PathBuf>,
    pub toml: DeskToml,
    pub base_url: String,
    pub token: Option<String>,
    pub verbose: bool,
    pub json_logs: bool,
}

impl DeskConfig {
    /// Resolve configuration for a working directory.
    pub fn resolve(work_dir: &Path, cli: &CliOverrides) -> Result<Self> {
        let source = find_config_file(work_dir);
        let toml = match &source {
            Some(path) => DeskToml::load(path)?,
            None => DeskToml::default(),
        };
        Ok(Self::layer(source, toml, |key| std::env::var(key), cli))
    }

    /// Apply env and CLI layers on top of a parsed file. `env` is injected so
    /// tests do not have to mutate the process environment.
    pub fn layer<F>(source: Option<PathBuf>, toml: DeskToml, env: F, cli: &CliOverrides) -> Self
    where
        F: Fn(&str) -> std::result::Result<String, std::env::VarError>,
    {
        let non_empty = |v: String| if v.trim().is_empty() { None } else { Some(v) };

        let base_url = cli
            .base_api
            .clone()
            .or_else(|| env(ENV_BASE_API).ok().and_then(non_empty))
            .unwrap_or_else(|| toml.api.base_url.clone());

        let token = cli
            .token
            .clone()
            .or_else(|| env(ENV_API_TOKEN).ok().and_then(non_empty))
            .or_else(|| toml.api.token.clone());

        let json_logs = cli.json_logs || toml.log.json;

        Self {
            source,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            verbose: cli.verbose,
            json_logs,
            toml,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.toml.api.timeout_secs.max(1))
    }

    pub fn items_per_page(&self) -> usize {
        if PAGE_SIZE_OPTIONS.contains(&self.toml.ui.items_per_page) {
            self.toml.ui.items_per_page
        } else {
            default_items_per_page()
        }
    }

    pub fn currency(&self) -> Currency {
        self.toml.ui.currency.parse().unwrap_or(Currency::Zar)
    }

    /// Log filter directive: `-v` wins, then `AGENCY_LOG` (read by the
    /// subscriber), then the file.
    pub fn log_level(&self) -> String {
        if self.verbose {
            "debug".to_string()
        } else {
            self.toml.log.level.clone()
        }
    }
}

/// Path of the project-local config file for a working directory.
pub fn local_config_path(work_dir: &Path) -> PathBuf {
    work_dir.join(".agency").join(CONFIG_FILE)
}

/// Path of the per-user config file, if the platform has a config dir.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("agency-desk").join(CONFIG_FILE))
}

fn find_config_file(work_dir: &Path) -> Option<PathBuf> {
    let local = local_config_path(work_dir);
    if local.exists() {
        return Some(local);
    }
    user_config_path().filter(|p| p.exists())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env::VarError;
    use tempfile::tempdir;

    fn no_env(_: &str) -> std::result::Result<String, VarError> {
        Err(VarError::NotPresent)
    }

    #[test]
    fn test_parse_full_file() {
        let toml = DeskToml::parse(
            r#"
            [api]
            base_url = "https://backend.test"
            token = "abc"
            timeout_secs = 5

            [ui]
            items_per_page = 24
            currency = "USD"

            [log]
            level = "info"
            json = true
            "#,
        )
        .unwrap();
        assert_eq!(toml.api.base_url, "https://backend.test");
        assert_eq!(toml.api.token.as_deref(), Some("abc"));
        assert_eq!(toml.ui.items_per_page, 24);
        assert!(toml.log.json);
        assert!(toml.validate().is_empty());
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let toml = DeskToml::parse("").unwrap();
        assert_eq!(toml.api.base_url, DEFAULT_BASE_URL);
        assert_eq!(toml.api.timeout_secs, 30);
        assert_eq!(toml.ui.items_per_page, 12);
        assert_eq!(toml.ui.currency, "ZAR");
        assert_eq!(toml.log.level, "warn");
    }

    #[test]
    fn test_validate_reports_bad_values() {
        let mut toml = DeskToml::default();
        toml.api.base_url = "ftp://nope".into();
        toml.api.timeout_secs = 0;
        toml.ui.items_per_page = 13;
        toml.ui.currency = "XYZ".into();
        toml.log.level = "loud".into();
        let warnings = toml.validate();
        assert_eq!(warnings.len(), 5, "{:?}", warnings);
    }

    #[test]
    fn test_validate_warns_on_plain_http_remote() {
        let mut toml = DeskToml::default();
        toml.api.base_url = "http://api.example.com".into();
        assert_eq!(toml.validate().len(), 1);
        toml.api.base_url = "http://localhost:8000".into();
        assert!(toml.validate().is_empty());
    }

    #[test]
    fn test_env_overrides_file() {
        let mut toml = DeskToml::default();
        toml.api.token = Some("file-token".into());
        let env = |key: &str| match key {
            ENV_BASE_API => Ok("https://env.test/".to_string()),
            ENV_API_TOKEN => Ok("env-token".to_string()),
            _ => Err(VarError::NotPresent),
        };
        let config = DeskConfig::layer(None, toml, env, &CliOverrides::default());
        assert_eq!(config.base_url, "https://env.test");
        assert_eq!(config.token.as_deref(), Some("env-token"));
    }

    #[test]
    fn test_cli_overrides_env() {
        let env = |key: &str| match key {
            ENV_BASE_API => Ok("https://env.test".to_string()),
            _ => Err(VarError::NotPresent),
        };
        let cli = CliOverrides {
            base_api: Some("https://cli.test".into()),
            token: Some("cli-token".into()),
            verbose: true,
            json_logs: false,
        };
        let config = DeskConfig::layer(None, DeskToml::default(), env, &cli);
        assert_eq!(config.base_url, "https://cli.test");
        assert_eq!(config.token.as_deref(), Some("cli-token"));
        assert_eq!(config.log_level(), "debug");
    }

    #[test]
    fn test_blank_env_token_is_ignored() {
        let mut toml = DeskToml::default();
        toml.api.token = Some("file-token".into());
        let env = |key: &str| match key {
            ENV_API_TOKEN => Ok("   ".to_string()),
            _ => Err(VarError::NotPresent),
        };
        let config = DeskConfig::layer(None, toml, env, &CliOverrides::default());
        assert_eq!(config.token.as_deref(), Some("file-token"));
    }

    #[test]
    fn test_unsupported_page_size_falls_back() {
        let mut toml = DeskToml::default();
        toml.ui.items_per_page = 7;
        let config = DeskConfig::layer(None, toml, no_env, &CliOverrides::default());
        assert_eq!(config.items_per_page(), 12);
    }

    #[test]
    fn test_resolve_reads_local_file() {
        let dir = tempdir().unwrap();
        let mut toml = DeskToml::default();
        toml.api.base_url = "https://local.test".into();
        toml.save(&local_config_path(dir.path())).unwrap();

        let config = DeskConfig::resolve(dir.path(), &CliOverrides {
            base_api: None,
            token: Some("t".into()),
            ..CliOverrides::default()
        })
        .unwrap();
        assert_eq!(config.source, Some(local_config_path(dir.path())));
        assert_eq!(config.toml.api.base_url, "https://local.test");
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("desk.toml");
        let mut toml = DeskToml::default();
        toml.ui.currency = "EUR".into();
        toml.save(&path).unwrap();
        let loaded = DeskToml::load(&path).unwrap();
        assert_eq!(loaded.ui.currency, "EUR");
    }
}
