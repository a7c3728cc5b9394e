use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

pub const DEFAULT_GEOCODING_URL: &str = "https://geocoding-api.open-meteo.com/v1/search";
pub const DEFAULT_FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";

/// Upstream endpoints for the two lookups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub geocoding_url: String,
    pub forecast_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            geocoding_url: DEFAULT_GEOCODING_URL.to_string(),
            forecast_url: DEFAULT_FORECAST_URL.to_string(),
        }
    }
}

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Show the country as a flag emoji instead of its ISO code.
    pub show_flag: bool,

    /// Overrides where the last query is kept.
    pub state_file: Option<PathBuf>,

    /// Example TOML:
    /// [endpoints]
    /// geocoding_url = "https://geocoding-api.open-meteo.com/v1/search"
    pub endpoints: Endpoints,
}

impl Config {
    /// Load config from disk, or return defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let cfg: Config = toml::from_str(contents)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(project_dirs()?.config_dir().join("config.toml"))
    }

    /// Where the last query lives: the override if set, else the platform data dir.
    pub fn state_file_path(&self) -> Result<PathBuf> {
        match &self.state_file {
            Some(path) => Ok(path.clone()),
            None => Ok(project_dirs()?.data_dir().join("state.toml")),
        }
    }

    /// Endpoints must be absolute http(s) URLs.
    pub fn validate(&self) -> Result<()> {
        for (name, url) in [
            ("geocoding_url", &self.endpoints.geocoding_url),
            ("forecast_url", &self.endpoints.forecast_url),
        ] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(anyhow!(
                    "Invalid {name} '{url}': expected an http:// or https:// URL.\n\
                     Hint: run `weather configure` to fix it."
                ));
            }
        }

        Ok(())
    }
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("dev", "weather-lookup", "weather")
        .ok_or_else(|| anyhow!("Could not determine platform config directory"))
}
