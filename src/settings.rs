use std::path::{Path, PathBuf};

use config::Config;
use serde::Deserialize;
use validator::Validate;

use crate::error::{CollectorError, Result};
use crate::utils::constants::{
    DEFAULT_BASE_DELAY_SECS, DEFAULT_MAX_REQUESTS, DEFAULT_TIMEOUT_SECS, METADATA_DIR, RAW_DIR,
};

/// Resolves named secrets at load time. The config document only ever
/// carries the *name* of the environment variable holding the API key;
/// injecting the provider keeps tests off the process environment.
pub trait SecretsProvider {
    fn resolve(&self, name: &str) -> Result<String>;
}

/// Reads secrets from the process environment.
pub struct EnvSecrets;

impl SecretsProvider for EnvSecrets {
    fn resolve(&self, name: &str) -> Result<String> {
        std::env::var(name).map_err(|_| CollectorError::MissingSecret {
            name: name.to_string(),
        })
    }
}

/// Immutable run configuration, loaded once before the loop starts.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct Settings {
    #[validate(nested)]
    pub api: ApiSettings,

    #[serde(default)]
    #[validate(nested)]
    pub collection: CollectionSettings,

    #[serde(default)]
    pub logging: LoggingSettings,

    #[serde(default)]
    pub storage: StorageSettings,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ApiSettings {
    #[validate(url)]
    pub api_url: String,

    #[validate(length(min = 1))]
    pub cities: Vec<String>,

    /// Name of the environment variable holding the API key. The key
    /// itself never appears in the config document.
    #[validate(length(min = 1))]
    pub api_key_env_var: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Resolved secret; populated by `Settings::load`, never serialized.
    #[serde(skip)]
    pub api_key: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CollectionSettings {
    /// Base inter-iteration delay in seconds, before multiplier and jitter.
    #[serde(default = "default_base_delay")]
    #[validate(range(min = 0.0))]
    pub base_delay: f64,

    /// Batch budget: the loop stops once this many batches have run.
    #[serde(default = "default_max_requests")]
    pub max_requests: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,

    #[serde(default = "default_log_level")]
    pub level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_reports_dir")]
    pub reports_dir: PathBuf,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_base_delay() -> f64 {
    DEFAULT_BASE_DELAY_SECS
}

fn default_max_requests() -> u32 {
    DEFAULT_MAX_REQUESTS
}

fn default_log_file() -> PathBuf {
    PathBuf::from("logs/collection.log")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_reports_dir() -> PathBuf {
    PathBuf::from("reports")
}

impl Default for CollectionSettings {
    fn default() -> Self {
        Self {
            base_delay: default_base_delay(),
            max_requests: default_max_requests(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            log_file: default_log_file(),
            level: default_log_level(),
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            reports_dir: default_reports_dir(),
        }
    }
}

impl Settings {
    /// Load and validate a config document, then resolve the API key.
    /// Any failure here is fatal: the loop never starts on a bad config.
    pub fn load(path: &Path, secrets: &dyn SecretsProvider) -> Result<Self> {
        let mut settings: Settings = Config::builder()
            .add_source(config::File::from(path))
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        settings.api.api_key = secrets.resolve(&settings.api.api_key_env_var)?;

        Ok(settings)
    }
}

impl StorageSettings {
    pub fn raw_dir(&self) -> PathBuf {
        self.data_dir.join(RAW_DIR)
    }

    pub fn metadata_dir(&self) -> PathBuf {
        self.data_dir.join(METADATA_DIR)
    }

    /// Create the data and report directories required by a run.
    pub fn ensure_directories(&self) -> Result<()> {
        std::fs::create_dir_all(self.raw_dir())?;
        std::fs::create_dir_all(self.metadata_dir())?;
        std::fs::create_dir_all(&self.reports_dir)?;
        Ok(())
    }
}
