use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Base URL of the satellite-data service; operation paths are appended
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Bounded wait for every remote call, in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Register unknown satellites via fetch-and-save and look them up again
    #[serde(default = "default_recover_unregistered")]
    pub recover_unregistered: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneConfig {
    /// Visualization engine access token, handed to the engine at init
    #[serde(default)]
    pub access_token: String,

    /// Camera height above a focused object, in kilometers
    #[serde(default = "default_camera_standoff_km")]
    pub camera_standoff_km: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default = "default_log_dir")]
    pub log_dir: String,

    #[serde(default)]
    pub service: ServiceConfig,

    #[serde(default)]
    pub scene: SceneConfig,
}

fn default_base_url() -> String {
    "http://localhost:8080/api".to_string()
}

fn default_request_timeout_secs() -> u64 {
    15
}

fn default_recover_unregistered() -> bool {
    true
}

fn default_camera_standoff_km() -> f64 {
    1500.0
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_dir() -> String {
    "logs".to_string()
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            recover_unregistered: default_recover_unregistered(),
        }
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            access_token: String::new(),
            camera_standoff_km: default_camera_standoff_km(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_dir: default_log_dir(),
            service: ServiceConfig::default(),
            scene: SceneConfig::default(),
        }
    }
}

impl ServiceConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl AppConfig {
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{}'", path))?;
        let config: AppConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file '{}'", path))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        reqwest::Url::parse(&self.service.base_url)
            .with_context(|| format!("Invalid service base_url '{}'", self.service.base_url))?;

        if self.service.request_timeout_secs == 0 {
            anyhow::bail!("service.request_timeout_secs must be greater than zero");
        }

        Ok(())
    }
}
