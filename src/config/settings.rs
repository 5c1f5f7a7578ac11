//! Application settings management

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// General settings
    #[serde(default)]
    pub general: GeneralSettings,

    /// Recording service API settings
    #[serde(default)]
    pub api: ApiSettings,

    /// Markdown export settings
    #[serde(default)]
    pub export: ExportSettings,

    /// Local search settings
    #[serde(default)]
    pub search: SearchSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralSettings {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSettings {
    /// API key sent with every request
    #[serde(default)]
    pub api_key: String,

    /// Base endpoint of the recording service API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Pause between consecutive requests (1000ms = 60 requests per minute)
    #[serde(default = "default_request_delay_ms")]
    pub request_delay_ms: u64,

    /// Total attempts per request, shared by network errors and 429 responses
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Backoff used when a 429 response carries no usable Retry-After header
    #[serde(default = "default_retry_after_secs")]
    pub default_retry_after_secs: u64,

    /// Base backoff after a network error, multiplied by the attempt number
    #[serde(default = "default_network_backoff_ms")]
    pub network_backoff_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportSettings {
    /// Directory that receives one Markdown file per meeting
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Fetch and include the meeting summary when available
    #[serde(default = "default_true")]
    pub include_summary: bool,

    /// Only export meetings created after this instant (RFC 3339 or YYYY-MM-DD)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_after: Option<String>,

    /// Only export meetings created before this instant (RFC 3339 or YYYY-MM-DD)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_before: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchSettings {
    /// Directory to search (defaults to the export output directory)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,

    /// Lines of context shown around each match
    #[serde(default = "default_context_lines")]
    pub context_lines: usize,

    /// Maximum number of fuzzy results
    #[serde(default = "default_limit")]
    pub limit: usize,
}

/// Creation-date bounds for the meeting listing, normalized to RFC 3339
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateRange {
    pub created_after: Option<String>,
    pub created_before: Option<String>,
}

// Default value functions

fn default_data_dir() -> PathBuf {
    ProjectDirs::from("com", "transcripts", "transcripts")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("~/.local/share/transcripts"))
}

fn default_output_dir() -> PathBuf {
    let mut dir = default_data_dir();
    dir.push("transcripts");
    dir
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_base_url() -> String {
    "https://api.fathom.ai/external/v1".to_string()
}

fn default_request_delay_ms() -> u64 {
    1000
}

fn default_max_attempts() -> u32 {
    3
}

fn default_retry_after_secs() -> u64 {
    60
}

fn default_network_backoff_ms() -> u64 {
    2000
}

fn default_true() -> bool {
    true
}

fn default_context_lines() -> usize {
    2
}

fn default_limit() -> usize {
    20
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_base_url(),
            request_delay_ms: default_request_delay_ms(),
            max_attempts: default_max_attempts(),
            default_retry_after_secs: default_retry_after_secs(),
            network_backoff_ms: default_network_backoff_ms(),
        }
    }
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            include_summary: true,
            created_after: None,
            created_before: None,
        }
    }
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            directory: None,
            context_lines: default_context_lines(),
            limit: default_limit(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            general: GeneralSettings::default(),
            api: ApiSettings::default(),
            export: ExportSettings::default(),
            search: SearchSettings::default(),
        }
    }
}

impl Settings {
    /// Load settings from the configuration file, then apply environment overrides
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        let mut settings = Self::load_from(&config_path)?;
        settings.apply_env_overrides_with(|key| std::env::var(key).ok())?;
        Ok(settings)
    }

    /// Load settings from a specific file without touching the environment
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            tracing::debug!("No config file found, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", config_path.display()))
    }

    /// Apply overrides from an environment lookup.
    ///
    /// The lookup is injected so nothing below the entry point reads process state.
    pub fn apply_env_overrides_with<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(level) = get("TRANSCRIPTS_LOG_LEVEL") {
            self.general.log_level = level.trim().to_string();
        }
        if let Some(key) = get("TRANSCRIPTS_API_KEY") {
            self.api.api_key = key.trim().to_string();
        }
        if let Some(url) = get("TRANSCRIPTS_BASE_URL") {
            self.api.base_url = url.trim().to_string();
        }
        if let Some(dir) = get("TRANSCRIPTS_OUTPUT_DIR") {
            self.export.output_dir = PathBuf::from(dir.trim());
        }
        if let Some(flag) = get("TRANSCRIPTS_INCLUDE_SUMMARY") {
            self.export.include_summary = parse_bool(&flag).with_context(|| {
                format!("Invalid TRANSCRIPTS_INCLUDE_SUMMARY value: {}", flag)
            })?;
        }
        if let Some(after) = get("TRANSCRIPTS_CREATED_AFTER") {
            self.export.created_after = Some(after.trim().to_string());
        }
        if let Some(before) = get("TRANSCRIPTS_CREATED_BEFORE") {
            self.export.created_before = Some(before.trim().to_string());
        }

        Ok(())
    }

    /// Get the path to the configuration file
    pub fn config_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("com", "transcripts", "transcripts")
            .context("Could not determine config directory")?;

        let config_dir = dirs.config_dir();
        Ok(config_dir.join("config.toml"))
    }

    /// Write default configuration to a file
    pub fn write_default(path: &Path) -> Result<()> {
        let settings = Self::default();
        let content = toml::to_string_pretty(&settings)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Copy of the settings that is safe to print
    pub fn redacted(&self) -> Self {
        let mut settings = self.clone();
        if !settings.api.api_key.is_empty() {
            settings.api.api_key = "********".to_string();
        }
        settings
    }

    /// Resolve and validate the creation-date bounds
    pub fn date_range(&self) -> Result<DateRange> {
        let after = self
            .export
            .created_after
            .as_deref()
            .map(normalize_date_bound)
            .transpose()
            .context("Invalid created_after bound")?;
        let before = self
            .export
            .created_before
            .as_deref()
            .map(normalize_date_bound)
            .transpose()
            .context("Invalid created_before bound")?;

        Ok(DateRange {
            created_after: after,
            created_before: before,
        })
    }

    /// Directory searched when none is given on the command line
    pub fn search_dir(&self) -> PathBuf {
        self.search
            .directory
            .clone()
            .unwrap_or_else(|| self.export.output_dir.clone())
    }

    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.api.request_delay_ms)
    }

    /// Default tracing filter when `RUST_LOG` is unset. `--verbose` wins.
    pub fn log_filter(&self, verbose: bool) -> String {
        if verbose {
            return "debug".to_string();
        }
        match self.general.log_level.trim() {
            "" => default_log_level(),
            level => level.to_string(),
        }
    }
}

/// Normalize a date bound to RFC 3339. Bare dates mean midnight UTC.
pub fn normalize_date_bound(raw: &str) -> Result<String> {
    let raw = raw.trim();

    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Ok(instant
            .with_timezone(&Utc)
            .to_rfc3339_opts(SecondsFormat::Secs, true));
    }

    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .with_context(|| format!("Expected RFC 3339 or YYYY-MM-DD, got '{}'", raw))?;
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .context("Invalid date")?
        .and_utc();

    Ok(midnight.to_rfc3339_opts(SecondsFormat::Secs, true))
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
