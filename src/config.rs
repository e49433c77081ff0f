use std::path::PathBuf;
use std::time::Duration;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::csv_reader::{DataSource, DEFAULT_SOURCE};
use crate::error::ConfigError;

pub const CONFIG_FILE: &'static str = "dashboard.toml";
pub const ENV_PREFIX: &'static str = "DASHBOARD_";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// URL or local path of the salary CSV
    pub source: String,
    pub request_timeout_secs: u64,
    pub tick_rate_ms: u64,
    pub log_file: PathBuf,
    pub export_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            source: DEFAULT_SOURCE.to_string(),
            request_timeout_secs: 30,
            tick_rate_ms: 200,
            log_file: PathBuf::from("salary_dashboard.log"),
            export_dir: PathBuf::from("."),
        }
    }
}

impl Config {
    /// Defaults, then `dashboard.toml`, then `DASHBOARD_*` variables.
    pub fn load() -> Result<Self, ConfigError> {
        Ok(Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::prefixed(ENV_PREFIX))
            .extract()?)
    }

    pub fn data_source(&self) -> DataSource {
        DataSource::parse(&self.source)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms)
    }
}
