//! Settings for a scrape run.
//!
//! Settings come from an optional TOML file. Environment overrides are a
//! separate step so library callers never pick up process state by accident;
//! the binary applies them once at startup.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::llm::LlmConfig;
use crate::normalize::DEFAULT_MIN_CONTENT_CHARS;

/// Application name, used for the config directory.
pub const APP_NAME: &str = "dirscrape";

/// Config file name inside the config directory.
pub const CONFIG_FILENAME: &str = "config.toml";

/// Errors loading or printing settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse TOML config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Crawl and pipeline limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrapeConfig {
    /// Stop once this many unique records are collected.
    pub max_records: usize,
    /// Candidate pages per run, seed included (never above 20).
    pub max_pages: usize,
    /// Pages with less text than this are skipped.
    pub min_content_chars: usize,
    /// Per-request HTTP timeout.
    pub timeout_secs: u64,
    /// None for the default desktop agent, "impersonate" for a random one,
    /// anything else is sent verbatim.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            max_records: 20,
            max_pages: crate::discovery::MAX_CANDIDATES,
            min_content_chars: DEFAULT_MIN_CONTENT_CHARS,
            timeout_secs: 10,
            user_agent: None,
        }
    }
}

impl ScrapeConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Headless browser fallback settings (used with the `browser` feature).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Retry pages the HTTP client could not load in a headless browser.
    pub enabled: bool,
    /// Run in headless mode.
    pub headless: bool,
    /// Page load timeout in seconds.
    pub timeout: u64,
    /// Chrome executable; autodetected when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chrome_path: Option<PathBuf>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            headless: true,
            timeout: 30,
            chrome_path: None,
        }
    }
}

/// Everything a run needs, passed explicitly into the pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub scrape: ScrapeConfig,
    pub llm: LlmConfig,
    pub browser: BrowserConfig,
}

impl Settings {
    /// `$XDG_CONFIG_HOME/dirscrape/config.toml` (or the platform equivalent).
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_NAME).join(CONFIG_FILENAME))
    }

    /// Load settings from `path`, or from the default location when it exists.
    ///
    /// An explicit path that cannot be read is an error; a missing default
    /// file just means defaults.
    pub async fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load_from_path(path).await,
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::load_from_path(&path).await,
                _ => Ok(Self::default()),
            },
        }
    }

    /// Load settings from a specific TOML file.
    pub async fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents =
            tokio::fs::read_to_string(path)
                .await
                .map_err(|source| ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })?;
        Self::from_toml(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Apply process environment overrides. Only the binary calls this.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup.
    ///
    /// Supported variables:
    /// - `DIRSCRAPE_MAX_RECORDS`, `DIRSCRAPE_TIMEOUT_SECS`,
    ///   `DIRSCRAPE_MIN_CONTENT_CHARS`: numbers, ignored when unparseable
    /// - `DIRSCRAPE_USER_AGENT`: user agent string or "impersonate"
    /// - the `LLM_*` variables handled by [`LlmConfig::with_overrides`]
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(n) = lookup("DIRSCRAPE_MAX_RECORDS").and_then(|v| v.parse().ok()) {
            self.scrape.max_records = n;
        }
        if let Some(n) = lookup("DIRSCRAPE_TIMEOUT_SECS").and_then(|v| v.parse().ok()) {
            self.scrape.timeout_secs = n;
        }
        if let Some(n) = lookup("DIRSCRAPE_MIN_CONTENT_CHARS").and_then(|v| v.parse().ok()) {
            self.scrape.min_content_chars = n;
        }
        if let Some(ua) = lookup("DIRSCRAPE_USER_AGENT").filter(|v| !v.is_empty()) {
            self.scrape.user_agent = Some(ua);
        }
        self.llm = self.llm.with_overrides(&lookup);
        self
    }

    /// TOML rendering with the API key masked.
    pub fn to_toml_redacted(&self) -> Result<String, ConfigError> {
        let mut printable = self.clone();
        printable.llm = printable.llm.redacted();
        Ok(toml::to_string_pretty(&printable)?)
    }
}
