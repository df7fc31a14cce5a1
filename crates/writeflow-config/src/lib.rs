use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

/// User settings for the writing assistant. Every field has a default, so a
/// config file only needs the values it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_base_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub goal: String,
    pub tone: String,
    pub audience: String,
    pub suggestion_debounce_ms: u64,
    pub autosave_debounce_ms: u64,
    pub min_content_chars: usize,
    /// Soft limit shown in word-count warnings
    pub word_limit: usize,
    /// Undo depth; 0 keeps everything
    pub history_limit: usize,
    pub enabled_suggestion_types: Vec<String>,
    pub data_dir: PathBuf,
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000/api".to_string(),
            api_token: None,
            user_id: None,
            goal: "clarity".to_string(),
            tone: "professional".to_string(),
            audience: "general".to_string(),
            suggestion_debounce_ms: 1000,
            autosave_debounce_ms: 5000,
            min_content_chars: 10,
            word_limit: 500,
            history_limit: 0,
            enabled_suggestion_types: ["spelling", "grammar", "style", "clarity", "tone"]
                .into_iter()
                .map(String::from)
                .collect(),
            data_dir: PathBuf::from("~/.local/share/writeflow"),
            request_timeout_secs: 30,
        }
    }
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let mut config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        config.data_dir = Self::expand_path(&config.data_dir).unwrap_or(config.data_dir);

        Ok(Some(config))
    }

    /// Load the user's config file, or defaults when there is none.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_path();
        Ok(Self::load_from_path(&config_path)?.unwrap_or_else(Self::expanded_default))
    }

    /// Defaults with `data_dir` expanded, as a loaded file would have it.
    fn expanded_default() -> Self {
        let mut config = Self::default();
        config.data_dir = Self::expand_path(&config.data_dir).unwrap_or(config.data_dir);
        config
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        self.save_to_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/writeflow");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    pub fn suggestion_debounce(&self) -> Duration {
        Duration::from_millis(self.suggestion_debounce_ms)
    }

    pub fn autosave_debounce(&self) -> Duration {
        Duration::from_millis(self.autosave_debounce_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn history_limit(&self) -> Option<usize> {
        (self.history_limit > 0).then_some(self.history_limit)
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}
