use serde::Deserialize;

use tackle_core::config::{Config, LogFormat};

use crate::domain::types::DEFAULT_RID_MAX_ATTEMPTS;

/// Results service configuration loaded from environment variables.
#[derive(Debug, Deserialize)]
pub struct ResultsConfig {
    /// PostgreSQL connection URL. Env var: `DATABASE_URL`.
    pub database_url: String,
    /// GeoLite2-City MMDB file. Env var: `GEO_DATABASE_PATH`.
    #[serde(default = "default_geo_database_path")]
    pub geo_database_path: String,
    /// Identifier candidates tried before giving up (default 20). Env var: `RID_MAX_ATTEMPTS`.
    #[serde(default = "default_rid_max_attempts")]
    pub rid_max_attempts: u32,
    /// Env var: `LOG_FORMAT` (`json` or `pretty`).
    #[serde(default)]
    pub log_format: LogFormat,
}

impl Config for ResultsConfig {}

fn default_geo_database_path() -> String {
    "static/db/geolite2-city.mmdb".to_owned()
}

fn default_rid_max_attempts() -> u32 {
    DEFAULT_RID_MAX_ATTEMPTS
}
