//! Configuration management for the job optimizer

use crate::error::{JobOptimizerError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub backend: BackendConfig,
    pub storage: StorageConfig,
    pub output: OutputConfig,

    /// Path this config was loaded from; `None` means the default location.
    #[serde(skip)]
    source: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub base_url: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Overrides the directory the session snapshot lives in.
    pub data_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub color_output: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Console,
    Json,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Console,
            color_output: true,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: BackendConfig::default(),
            storage: StorageConfig::default(),
            output: OutputConfig::default(),
            source: None,
        }
    }
}

impl Config {
    /// Load from an explicit path (`--config`) or fall back to the default
    /// location. An explicit path that does not exist is an error; a missing
    /// default file is written out with defaults instead.
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let config_path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(Self::default_path);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let mut config: Config = toml::from_str(&content).map_err(|e| {
                JobOptimizerError::Configuration(format!("Failed to parse config: {}", e))
            })?;
            config.source = path.map(Path::to_path_buf);
            Ok(config)
        } else if path.is_some() {
            Err(JobOptimizerError::Configuration(format!(
                "Config file not found: {}",
                config_path.display()
            )))
        } else {
            let config = Self::default();
            config.save()?;
            Ok(config)
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&self.source_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| {
            JobOptimizerError::Configuration(format!("Failed to serialize config: {}", e))
        })?;

        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("job-optimizer")
            .join("config.toml")
    }

    /// The file this configuration came from (or will be saved to).
    pub fn source_path(&self) -> PathBuf {
        self.source.clone().unwrap_or_else(Self::default_path)
    }

    /// Where the session snapshot lives, honoring the storage override.
    pub fn session_path(&self) -> PathBuf {
        match &self.storage.data_dir {
            Some(dir) => dir.join("session.json"),
            None => Self::default_data_dir().join("session.json"),
        }
    }

    pub fn default_data_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("job-optimizer")
    }

    pub fn use_colors(&self) -> bool {
        self.output.color_output
    }
}
