//! Layered application configuration.

use std::{fs, path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::{coordinator::DEFAULT_MAX_CONCURRENCY, error::RefreshError};

/// Directory under the platform config dir holding `config.toml`.
pub const CONFIG_DIR_NAME: &str = "cdrefresh";
/// Prefix for environment overrides, e.g. `CDREFRESH_MAX_CONCURRENCY=8`.
pub const ENV_PREFIX: &str = "CDREFRESH";

const DEFAULT_CONFIG: &str = r#"# cdrefresh configuration

# Directory receiving champion_cooldowns_<version>.json and manifest.json.
data_dir = "data"

# Champions resolved in parallel.
max_concurrency = 16

# Per-request timeout in seconds.
request_timeout_secs = 5

ddragon_base = "https://ddragon.leagueoflegends.com"
meraki_base = "https://cdn.merakianalytics.com/riot/lol/resources/latest/en-US"
live_client_url = "https://127.0.0.1:2999/liveclientdata/allgamedata"
locale = "en_US"
"#;

/// Runtime settings for a refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Output directory for datasets and the manifest.
    pub data_dir: PathBuf,
    /// Maximum number of champions resolved at once.
    pub max_concurrency: usize,
    /// Timeout applied to every HTTP request.
    pub request_timeout_secs: u64,
    /// Root of the versioned static CDN.
    pub ddragon_base: String,
    /// Root of the curated champion feed.
    pub meraki_base: String,
    /// Live client snapshot endpoint.
    pub live_client_url: String,
    /// Locale segment used in CDN paths.
    pub locale: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            request_timeout_secs: 5,
            ddragon_base: "https://ddragon.leagueoflegends.com".to_string(),
            meraki_base: "https://cdn.merakianalytics.com/riot/lol/resources/latest/en-US"
                .to_string(),
            live_client_url: "https://127.0.0.1:2999/liveclientdata/allgamedata".to_string(),
            locale: "en_US".to_string(),
        }
    }
}

impl AppConfig {
    /// Load defaults, then the user config file, then environment overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(config_path())
    }

    /// Same as [`AppConfig::load`] with an explicit config file location.
    pub fn load_from(path: Option<PathBuf>) -> Result<Self> {
        let defaults = AppConfig::default();
        let mut builder = Config::builder()
            .set_default("data_dir", defaults.data_dir.to_string_lossy().to_string())?
            .set_default("max_concurrency", defaults.max_concurrency as u64)?
            .set_default("request_timeout_secs", defaults.request_timeout_secs)?
            .set_default("ddragon_base", defaults.ddragon_base)?
            .set_default("meraki_base", defaults.meraki_base)?
            .set_default("live_client_url", defaults.live_client_url)?
            .set_default("locale", defaults.locale)?;

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(false));
        }

        let config: AppConfig = builder
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()
            .context("failed to assemble configuration")?
            .try_deserialize()
            .context("failed to parse configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that cannot drive a run.
    pub fn validate(&self) -> Result<(), RefreshError> {
        if self.max_concurrency == 0 {
            return Err(RefreshError::InvalidConfig(
                "max_concurrency must be at least 1".to_string(),
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err(RefreshError::InvalidConfig(
                "request_timeout_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Per-request timeout as a [`Duration`].
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Location of the user config file, if a config directory exists.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join("config.toml"))
}

/// Write a commented default config file when none exists yet.
pub fn ensure_default_config() -> Result<()> {
    let Some(path) = config_path() else {
        return Ok(());
    };
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(&path, DEFAULT_CONFIG)
        .with_context(|| format!("failed to write default config {}", path.display()))
}
