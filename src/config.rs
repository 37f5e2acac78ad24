use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

fn default_base_url() -> String {
    "http://localhost:8080/api".to_string()
}

fn default_timeout() -> u64 {
    30
}

#[derive(Debug, Clone, Deserialize)]
pub struct Routes {
    #[serde(default = "Routes::default_clients")]
    pub clients: String,
    #[serde(default = "Routes::default_staff")]
    pub staff: String,
    #[serde(default = "Routes::default_dashboard")]
    pub dashboard: String,
}

impl Routes {
    fn default_clients() -> String {
        "/clients".to_string()
    }

    fn default_staff() -> String {
        "/staff".to_string()
    }

    fn default_dashboard() -> String {
        "/dashboard".to_string()
    }
}

impl Default for Routes {
    fn default() -> Self {
        Self {
            clients: Self::default_clients(),
            staff: Self::default_staff(),
            dashboard: Self::default_dashboard(),
        }
    }
}

/// App configuration: YAML file with an environment override for the base
/// URL so scripted runs can point at another backend without editing files.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(rename = "apiBaseUrl", default = "default_base_url")]
    pub api_base_url: String,
    #[serde(rename = "requestTimeoutSecs", default = "default_timeout")]
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub routes: Routes,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_base_url(),
            request_timeout_secs: default_timeout(),
            routes: Routes::default(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid config file {path}: {source}")]
    Parse {
        path: String,
        source: serde_yaml::Error,
    },
}

impl AppConfig {
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("tindigwa")
            .join("config.yaml")
    }

    /// Explicit path must exist; the default path is optional. The
    /// `TINDIGWA_API_URL` environment variable wins over both.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let fallback = Self::default_path();
                if fallback.exists() {
                    Self::from_file(&fallback)?
                } else {
                    Self::default()
                }
            }
        };

        if let Ok(url) = std::env::var("TINDIGWA_API_URL") {
            if !url.trim().is_empty() {
                config.api_base_url = url;
            }
        }
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        serde_yaml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }
}
