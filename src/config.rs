use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use anyhow::{Context, Result, anyhow};

/// Environment variable that overrides the configured endpoint
pub const ENDPOINT_ENV: &str = "MEDCHAT_ENDPOINT";

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:5000";

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// Base address of the question service, e.g. `http://192.168.0.75:5000`
    pub endpoint: Option<String>,
    pub log_file: Option<PathBuf>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from the user config directory. A missing file means defaults.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let config_content = fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config: Config = serde_json::from_str(&config_content)
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok(config)
    }

    /// Endpoint base address: env var first, then config file, then default
    pub fn endpoint(&self) -> String {
        Self::resolve_endpoint(std::env::var(ENDPOINT_ENV).ok(), self.endpoint.as_deref())
    }

    fn resolve_endpoint(from_env: Option<String>, from_file: Option<&str>) -> String {
        from_env
            .filter(|v| !v.trim().is_empty())
            .or_else(|| from_file.map(str::to_string))
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string())
    }

    pub fn log_file(&self) -> Result<PathBuf> {
        if let Some(path) = &self.log_file {
            return Ok(path.clone());
        }

        let data_dir = dirs::data_local_dir()
            .ok_or_else(|| anyhow!("Could not determine data directory"))?;

        Ok(data_dir.join("medchat").join("medchat.log"))
    }

    fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("medchat").join("config.json"))
    }
}
