//! deepresearch configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main deepresearch configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Remote service configuration
    pub service: ServiceConfig,

    /// Plan generation models
    pub plan: PlanConfig,

    /// Polling cadence and budget
    pub poll: PollConfig,

    /// Report output
    pub report: ReportConfig,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[serde(rename = "log-level", skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}

impl Config {
    /// Validate configuration before use
    ///
    /// Checks that the API key is available and the poll settings are usable.
    /// Call this early in startup to fail fast with clear error messages.
    pub fn validate(&self) -> Result<()> {
        self.service.get_api_key()?;

        if self.poll.interval_ms == 0 {
            return Err(eyre::eyre!("poll.interval-ms must be greater than zero"));
        }
        if self.poll.timeout_ms == 0 {
            return Err(eyre::eyre!("poll.timeout-ms must be greater than zero"));
        }
        Ok(())
    }

    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        Self::load_first(&Self::search_paths())
    }

    /// Read only the log level, before logging is set up
    ///
    /// Follows the same chain as [`Config::load`]. Errors are swallowed; the
    /// full load reports them later.
    pub fn load_log_level(config_path: Option<&PathBuf>) -> Option<String> {
        match config_path {
            Some(path) => Self::read_quietly(path)?.log_level,
            None => Self::log_level_from(&Self::search_paths()),
        }
    }

    /// Implicit config locations in priority order:
    /// `./.deepresearch.yml`, then `~/.config/deepresearch/deepresearch.yml`
    fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(".deepresearch.yml")];
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("deepresearch").join("deepresearch.yml"));
        }
        paths
    }

    /// Load the first existing file in `paths` that parses, else defaults
    fn load_first(paths: &[PathBuf]) -> Result<Self> {
        for path in paths.iter().filter(|p| p.exists()) {
            match Self::load_from_file(path) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", path.display(), e);
                }
            }
        }

        // No config file found, use defaults
        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Log level of the config [`Config::load_first`] would pick
    fn log_level_from(paths: &[PathBuf]) -> Option<String> {
        paths
            .iter()
            .filter(|p| p.exists())
            .find_map(|p| Self::read_quietly(p))?
            .log_level
    }

    fn read_quietly(path: &Path) -> Option<Self> {
        let content = fs::read_to_string(path).ok()?;
        serde_yaml::from_str(&content).ok()
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// Remote service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Environment variable containing the API key
    #[serde(rename = "api-key-env")]
    pub api_key_env: String,

    /// API base URL
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Research agent identifier
    pub agent: String,

    /// Per-request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            api_key_env: "GEMINI_API_KEY".to_string(),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            agent: "deep-research-pro-preview-12-2025".to_string(),
            timeout_ms: 120_000,
        }
    }
}

impl ServiceConfig {
    /// Resolve the API key from the environment, then from `./.env`
    pub fn get_api_key(&self) -> Result<String> {
        lookup_api_key(&self.api_key_env, Path::new(".env")).ok_or_else(|| {
            eyre::eyre!(
                "API key not found. Set the {} environment variable or add it to .env",
                self.api_key_env
            )
        })
    }
}

/// Look up `var` in the process environment, falling back to a dotenv file
pub fn lookup_api_key(var: &str, dotenv: &Path) -> Option<String> {
    if let Some(value) = std::env::var(var).ok().filter(|v| !v.trim().is_empty()) {
        return Some(value);
    }

    let content = fs::read_to_string(dotenv).ok()?;
    parse_dotenv(&content, var)
}

/// Find `var` in dotenv-formatted text (`KEY=VALUE`, optional quotes and `export`)
fn parse_dotenv(content: &str, var: &str) -> Option<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| {
            let line = line.strip_prefix("export ").unwrap_or(line);
            let (key, value) = line.split_once('=')?;
            (key.trim() == var).then(|| value.trim().trim_matches(|c| c == '"' || c == '\'').to_string())
        })
        .find(|value| !value.is_empty())
}

/// Plan generation models
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanConfig {
    /// Model tried first
    #[serde(rename = "primary-model")]
    pub primary_model: String,

    /// Model tried once when the primary is unavailable
    #[serde(rename = "fallback-model")]
    pub fallback_model: String,
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            primary_model: "gemini-3-flash-preview".to_string(),
            fallback_model: "gemini-2.0-flash".to_string(),
        }
    }
}

/// Polling cadence and budget
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PollConfig {
    /// Fixed delay between polls in milliseconds
    #[serde(rename = "interval-ms")]
    pub interval_ms: u64,

    /// Wall-clock budget for the whole job in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_ms: 10_000,
            timeout_ms: 60 * 60 * 1000,
        }
    }
}

impl PollConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Report output
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Directory reports are written to
    #[serde(rename = "output-dir")]
    pub output_dir: PathBuf,

    /// Maximum length of the topic slug in file names
    #[serde(rename = "slug-max-len")]
    pub slug_max_len: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            slug_max_len: crate::report::DEFAULT_SLUG_MAX_LEN,
        }
    }
}
