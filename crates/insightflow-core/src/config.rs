//! Runtime configuration
//!
//! Settings come from three layers, later ones winning:
//!
//! 1. Built-in defaults
//! 2. An optional TOML file (`--config`, or `~/.config/insightflow/config.toml`)
//! 3. Environment variables (a `.env` file is loaded first if present)
//!
//! ```toml
//! data_dir = "data"
//!
//! [summarizer]
//! model = "mistralai/Mistral-7B-Instruct-v0.2"
//! base_url = "https://router.huggingface.co/hf-inference"
//! timeout_secs = 30
//! ```
//!
//! The Hugging Face credential is only read from `HUGGINGFACE_API_KEY`; it is
//! never stored in the config file.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};

pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_MODEL: &str = "mistralai/Mistral-7B-Instruct-v0.2";
pub const DEFAULT_BASE_URL: &str = "https://router.huggingface.co/hf-inference";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const ENV_API_KEY: &str = "HUGGINGFACE_API_KEY";
pub const ENV_DATA_DIR: &str = "INSIGHTFLOW_DATA_DIR";
pub const ENV_MODEL: &str = "HF_MODEL";
pub const ENV_BASE_URL: &str = "HF_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "HF_TIMEOUT_SECS";

/// On-disk config file layout (all fields optional)
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileConfig {
    data_dir: Option<PathBuf>,
    summarizer: FileSummarizerConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileSummarizerConfig {
    model: Option<String>,
    base_url: Option<String>,
    timeout_secs: Option<u64>,
}

/// Settings for the remote text-generation endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummarizerConfig {
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
    /// Bearer credential; required before serving or answering questions
    pub api_key: Option<String>,
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            api_key: None,
        }
    }
}

impl SummarizerConfig {
    /// The configured credential, or a config error naming the variable to set
    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key.as_deref().ok_or_else(|| {
            Error::Config(format!(
                "{} not found in environment variables",
                ENV_API_KEY
            ))
        })
    }
}

/// Complete runtime configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory holding the persisted aggregate tables
    pub data_dir: PathBuf,
    pub summarizer: SummarizerConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            summarizer: SummarizerConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from the file layer and the process environment
    ///
    /// An explicit `path` must exist. Without one, the default location is
    /// used only if a file is there.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        // Best-effort .env load; ignore if missing
        let _ = dotenvy::dotenv();

        let path = match path {
            Some(p) => Some(p.to_path_buf()),
            None => default_config_path().filter(|p| p.exists()),
        };

        let file = match path {
            Some(p) => {
                debug!(path = %p.display(), "Reading config file");
                Some(fs::read_to_string(&p)?)
            }
            None => None,
        };

        Self::from_parts(file.as_deref(), |key| std::env::var(key).ok())
    }

    /// Build configuration from optional TOML text and an environment lookup
    pub fn from_parts<F>(toml_text: Option<&str>, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let file: FileConfig = match toml_text {
            Some(text) => toml::from_str(text)?,
            None => FileConfig::default(),
        };
        let var = |key: &str| env(key).filter(|v| !v.trim().is_empty());

        let mut config = Config::default();

        if let Some(dir) = file.data_dir {
            config.data_dir = dir;
        }
        if let Some(model) = file.summarizer.model {
            config.summarizer.model = model;
        }
        if let Some(url) = file.summarizer.base_url {
            config.summarizer.base_url = url;
        }
        if let Some(secs) = file.summarizer.timeout_secs {
            config.summarizer.timeout = Duration::from_secs(secs);
        }

        if let Some(dir) = var(ENV_DATA_DIR) {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(model) = var(ENV_MODEL) {
            config.summarizer.model = model;
        }
        if let Some(url) = var(ENV_BASE_URL) {
            config.summarizer.base_url = url;
        }
        if let Some(secs) = var(ENV_TIMEOUT_SECS) {
            let secs: u64 = secs
                .trim()
                .parse()
                .map_err(|e| Error::Config(format!("invalid {}: {}", ENV_TIMEOUT_SECS, e)))?;
            config.summarizer.timeout = Duration::from_secs(secs);
        }
        config.summarizer.api_key = var(ENV_API_KEY);

        if config.summarizer.timeout.is_zero() {
            return Err(Error::Config("summarizer timeout must be positive".into()));
        }

        Ok(config)
    }
}

/// Default config file location (`<config dir>/insightflow/config.toml`)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("insightflow").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_file_or_env() {
        let config = Config::from_parts(None, env_from(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.summarizer.timeout, Duration::from_secs(30));
        assert!(config.summarizer.require_api_key().is_err());
    }

    #[test]
    fn test_file_values_apply() {
        let toml = r#"
data_dir = "/srv/insightflow"

[summarizer]
model = "tiiuae/falcon-7b-instruct"
timeout_secs = 10
"#;
        let config = Config::from_parts(Some(toml), env_from(&[])).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/srv/insightflow"));
        assert_eq!(config.summarizer.model, "tiiuae/falcon-7b-instruct");
        assert_eq!(config.summarizer.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.summarizer.timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_env_overrides_file() {
        let toml = "data_dir = \"from-file\"\n";
        let env = env_from(&[
            (ENV_DATA_DIR, "from-env"),
            (ENV_BASE_URL, "http://127.0.0.1:9999"),
            (ENV_TIMEOUT_SECS, "5"),
            (ENV_API_KEY, "hf_test"),
        ]);
        let config = Config::from_parts(Some(toml), env).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("from-env"));
        assert_eq!(config.summarizer.base_url, "http://127.0.0.1:9999");
        assert_eq!(config.summarizer.timeout, Duration::from_secs(5));
        assert_eq!(config.summarizer.require_api_key().unwrap(), "hf_test");
    }

    #[test]
    fn test_blank_api_key_counts_as_missing() {
        let config = Config::from_parts(None, env_from(&[(ENV_API_KEY, "  ")])).unwrap();
        let err = config.summarizer.require_api_key().unwrap_err();
        assert!(err.to_string().contains(ENV_API_KEY));
    }

    #[test]
    fn test_invalid_timeout_rejected() {
        assert!(matches!(
            Config::from_parts(None, env_from(&[(ENV_TIMEOUT_SECS, "soon")])),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            Config::from_parts(None, env_from(&[(ENV_TIMEOUT_SECS, "0")])),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_malformed_file_rejected() {
        assert!(matches!(
            Config::from_parts(Some("data_dir = ["), env_from(&[])),
            Err(Error::Toml(_))
        ));
    }
}
