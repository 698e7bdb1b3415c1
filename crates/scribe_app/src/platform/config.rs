//! Startup configuration: defaults, then `scribe.ron`, then environment.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::LevelFilter;
use scribe_core::DEFAULT_LIST_LIMIT;
use scribe_engine::{ApiError, ApiSettings, DEFAULT_BASE_URL};
use scribe_logging::scribe_info;
use serde::Deserialize;

use super::logging::{LogDestination, UnknownDestination};

const CONFIG_FILENAME: &str = "scribe.ron";
const DEFAULT_POLL_INTERVAL_MS: u64 = 2_000;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub api_base_url: String,
    pub poll_interval_ms: u64,
    pub list_limit: u32,
    pub request_timeout_secs: Option<u64>,
    pub log_destination: LogDestination,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_BASE_URL.to_string(),
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            list_limit: DEFAULT_LIST_LIMIT,
            request_timeout_secs: None,
            log_destination: LogDestination::File,
            log_level: "info".to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not parse {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("invalid backend URL: {0}")]
    BaseUrl(#[from] ApiError),
    #[error(transparent)]
    Destination(#[from] UnknownDestination),
    #[error("unknown log level `{0}`")]
    Level(String),
    #[error("{0} must be greater than zero")]
    Zero(&'static str),
}

impl AppConfig {
    /// Loads `SCRIBE_CONFIG` (or `./scribe.ron` when present) and applies
    /// `SCRIBE_API_URL`, `SCRIBE_LOG` and `SCRIBE_LOG_LEVEL`.
    pub fn load() -> Result<Self, ConfigError> {
        let explicit = std::env::var_os("SCRIBE_CONFIG").map(PathBuf::from);
        let required = explicit.is_some();
        let path = explicit.unwrap_or_else(|| PathBuf::from(CONFIG_FILENAME));
        Self::load_from(&path, required, |key| std::env::var(key).ok())
    }

    pub(crate) fn load_from(
        path: &Path,
        required: bool,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut config = match fs::read_to_string(path) {
            Ok(text) => ron::from_str::<AppConfig>(&text).map_err(|err| ConfigError::Parse {
                path: path.to_path_buf(),
                message: err.to_string(),
            })?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound && !required => {
                AppConfig::default()
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        if let Some(url) = lookup("SCRIBE_API_URL").filter(|url| !url.trim().is_empty()) {
            config.api_base_url = url.trim().to_string();
        }
        if let Some(destination) = lookup("SCRIBE_LOG") {
            config.log_destination = destination.parse()?;
        }
        if let Some(level) = lookup("SCRIBE_LOG_LEVEL") {
            config.log_level = level;
        }

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::Zero("poll_interval_ms"));
        }
        if self.list_limit == 0 {
            return Err(ConfigError::Zero("list_limit"));
        }
        self.log_level()?;
        self.api_settings()?;
        Ok(())
    }

    pub fn log_level(&self) -> Result<LevelFilter, ConfigError> {
        scribe_logging::parse_level(&self.log_level)
            .ok_or_else(|| ConfigError::Level(self.log_level.clone()))
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn api_settings(&self) -> Result<ApiSettings, ApiError> {
        let mut settings = ApiSettings::new(&self.api_base_url)?;
        settings.request_timeout = self.request_timeout_secs.map(Duration::from_secs);
        Ok(settings)
    }

    pub fn log_summary(&self) {
        scribe_info!(
            "config api_base_url={} poll_interval_ms={} list_limit={}",
            self.api_base_url,
            self.poll_interval_ms,
            self.list_limit
        );
    }
}
