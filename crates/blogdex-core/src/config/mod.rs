use crate::error::Result;

mod env;
mod search;
mod source;

pub use search::{SearchConfig, TelemetryConfig};
pub use source::{
    BucketLocation, DEFAULT_BUCKET, DEFAULT_DEV_INDEX_URL, DEFAULT_INDEX_KEY, Environment,
    IndexSourceConfig,
};

/// Runtime configuration read from `BLOGDEX_*` environment variables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppConfig {
    pub source: IndexSourceConfig,
    pub search: SearchConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            source: IndexSourceConfig::from_env()?,
            search: SearchConfig::from_env(),
            telemetry: TelemetryConfig::from_env(),
        })
    }
}
