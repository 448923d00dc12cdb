//! Client configuration.
//!
//! Supports reading `~/.config/docqa/config.toml`:
//!
//! ```toml
//! mode = "http"                      # or "simulated"
//! base_url = "http://localhost:3000"
//! timeout_secs = 60
//!
//! [simulation]
//! upload_delay_ms = 1500
//! answer_delay_ms = 2000
//! seed = 42
//! ```
//!
//! The `DOCQA_API_URL` environment variable overrides `base_url`.

use crate::error::{DocQaError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable that overrides the service base URL.
pub const API_URL_ENV: &str = "DOCQA_API_URL";

/// Base URL used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Which collaborator implementation backs the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceMode {
    /// Talk to the real backend over HTTP.
    #[default]
    Http,
    /// In-memory stand-in with artificial delays and canned answers.
    Simulated,
}

/// Knobs for the simulated services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub upload_delay_ms: u64,
    pub answer_delay_ms: u64,
    /// Fixed RNG seed for reproducible ids and chunk counts.
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            upload_delay_ms: 1500,
            answer_delay_ms: 2000,
            seed: None,
        }
    }
}

impl SimulationConfig {
    /// No delays; used by tests.
    pub fn instant() -> Self {
        Self {
            upload_delay_ms: 0,
            answer_delay_ms: 0,
            seed: None,
        }
    }

    pub fn upload_delay(&self) -> Duration {
        Duration::from_millis(self.upload_delay_ms)
    }

    pub fn answer_delay(&self) -> Duration {
        Duration::from_millis(self.answer_delay_ms)
    }
}

/// Root configuration for the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub mode: ServiceMode,
    pub base_url: String,
    /// Per-request timeout imposed by the HTTP client. `None` waits indefinitely.
    pub timeout_secs: Option<u64>,
    pub simulation: SimulationConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            mode: ServiceMode::default(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: None,
            simulation: SimulationConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Loads the default config file (if present) and applies the environment.
    pub fn load() -> Result<Self> {
        let mut config = match default_config_path() {
            Some(path) if path.exists() => Self::from_file(&path)?,
            _ => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Parses a TOML config file.
    ///
    /// The result is not validated; later layers (environment, CLI flags) may
    /// still replace the base URL or mode. Call [`validate`](Self::validate)
    /// once everything is applied.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            DocQaError::io(format!(
                "Failed to read configuration file at {}: {}",
                path.display(),
                e
            ))
        })?;
        let mut config: Self = toml::from_str(&content)?;
        config.base_url = normalize_base_url(&config.base_url);
        Ok(config)
    }

    /// Applies environment overrides using the given lookup.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(API_URL_ENV).filter(|v| !v.trim().is_empty()) {
            self.base_url = normalize_base_url(&url);
        }
    }

    /// Replaces the base URL.
    pub fn with_base_url(mut self, url: impl AsRef<str>) -> Self {
        self.base_url = normalize_base_url(url.as_ref());
        self
    }

    pub fn with_mode(mut self, mode: ServiceMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Checks that the base URL is usable for HTTP mode.
    pub fn validate(&self) -> Result<()> {
        if self.mode == ServiceMode::Http
            && !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://"))
        {
            return Err(DocQaError::config(format!(
                "base_url must start with http:// or https://, got '{}'",
                self.base_url
            )));
        }
        Ok(())
    }
}

/// Returns `~/.config/docqa/config.toml`, if a home directory exists.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".config").join("docqa").join("config.toml"))
}

fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.mode, ServiceMode::Http);
        assert_eq!(config.base_url, "http://localhost:3000");
        assert_eq!(config.timeout(), None);
        assert_eq!(config.simulation.upload_delay(), Duration::from_millis(1500));
        assert_eq!(config.simulation.answer_delay(), Duration::from_millis(2000));
    }

    #[test]
    fn test_from_file_partial() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
mode = "simulated"
base_url = "http://qa.internal:8000/"

[simulation]
upload_delay_ms = 10
seed = 7
"#
        )
        .unwrap();

        let config = ClientConfig::from_file(file.path()).unwrap();
        assert_eq!(config.mode, ServiceMode::Simulated);
        assert_eq!(config.base_url, "http://qa.internal:8000");
        assert_eq!(config.simulation.upload_delay_ms, 10);
        assert_eq!(config.simulation.answer_delay_ms, 2000);
        assert_eq!(config.simulation.seed, Some(7));
    }

    #[test]
    fn test_from_file_invalid_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "mode = [").unwrap();

        let err = ClientConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, DocQaError::Serialization { ref format, .. } if format == "TOML"));
    }

    #[test]
    fn test_bad_scheme_in_file_fails_validation() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"base_url = "localhost:3000""#).unwrap();

        let config = ClientConfig::from_file(file.path()).unwrap();
        assert_eq!(config.base_url, "localhost:3000");

        let err = config.validate().unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_later_layers_repair_bad_file_url() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"base_url = "localhost:3000""#).unwrap();
        let loaded = ClientConfig::from_file(file.path()).unwrap();

        let mut from_env = loaded.clone();
        from_env.apply_env(|key| (key == API_URL_ENV).then(|| "http://qa:8000".to_string()));
        assert!(from_env.validate().is_ok());

        let from_flag = loaded.clone().with_base_url("https://qa.example.com/");
        assert_eq!(from_flag.base_url, "https://qa.example.com");
        assert!(from_flag.validate().is_ok());

        let simulated = loaded.with_mode(ServiceMode::Simulated);
        assert!(simulated.validate().is_ok());
    }

    #[test]
    fn test_env_overrides_base_url() {
        let mut config = ClientConfig::default();
        config.apply_env(|key| {
            (key == API_URL_ENV).then(|| "https://api.example.com/".to_string())
        });
        assert_eq!(config.base_url, "https://api.example.com");
    }

    #[test]
    fn test_blank_env_is_ignored() {
        let mut config = ClientConfig::default();
        config.apply_env(|_| Some("  ".to_string()));
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_default_config_path() {
        if let Some(path) = default_config_path() {
            assert!(path.ends_with(".config/docqa/config.toml"));
        }
    }
}
