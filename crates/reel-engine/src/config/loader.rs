use super::schema::ReelConfig;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("Unknown hotkey '{0}' (expected F1..F12)")]
    UnknownHotkey(String),
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load `explicit` when given, otherwise fall back to [`ConfigLoader::load_default`].
    pub async fn load(explicit: Option<&Path>) -> Result<ReelConfig, ConfigError> {
        match explicit {
            Some(path) => Self::load_from(path).await,
            None => Self::load_default().await,
        }
    }

    /// Load from default locations:
    /// 1. ./reel.yaml
    /// 2. ~/.reel/config.yaml
    /// 3. Default configuration
    pub async fn load_default() -> Result<ReelConfig, ConfigError> {
        let local_config = PathBuf::from("./reel.yaml");
        if local_config.exists() {
            return Self::load_from(&local_config).await;
        }

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".reel").join("config.yaml");
            if home_config.exists() {
                return Self::load_from(&home_config).await;
            }
        }

        Ok(ReelConfig::default())
    }

    pub async fn load_from(path: &Path) -> Result<ReelConfig, ConfigError> {
        tracing::debug!("Loading config from {}", path.display());
        let content = tokio::fs::read_to_string(path).await?;
        let config: ReelConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }
}
