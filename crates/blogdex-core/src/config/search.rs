use std::path::PathBuf;
use std::time::Duration;

use super::env::{parse_percentage, read_env_flag, read_env_u64, read_non_empty_env};

const ENV_STRICT_QUERY: &str = "BLOGDEX_STRICT_QUERY";
const ENV_CACHE_TTL_SECS: &str = "BLOGDEX_CACHE_TTL_SECS";
const ENV_ANALYTICS_SAMPLE_RATE: &str = "BLOGDEX_ANALYTICS_SAMPLE_RATE";
const ENV_ANALYTICS_PATH: &str = "BLOGDEX_ANALYTICS_PATH";

const DEFAULT_ANALYTICS_SAMPLE_RATE: u8 = 100;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchConfig {
    /// Reject requests without `q` instead of running a tag-only search.
    pub strict_query: bool,
    /// Zero keeps the fetch-per-request behaviour.
    pub cache_ttl: Duration,
}

impl SearchConfig {
    pub(super) fn from_env() -> Self {
        Self {
            strict_query: read_env_flag(ENV_STRICT_QUERY),
            cache_ttl: Duration::from_secs(read_env_u64(ENV_CACHE_TTL_SECS, 0, 0)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    pub sample_rate: u8,
    pub jsonl_path: Option<PathBuf>,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_ANALYTICS_SAMPLE_RATE,
            jsonl_path: None,
        }
    }
}

impl TelemetryConfig {
    pub(super) fn from_env() -> Self {
        Self {
            sample_rate: parse_percentage(
                std::env::var(ENV_ANALYTICS_SAMPLE_RATE).ok().as_deref(),
                DEFAULT_ANALYTICS_SAMPLE_RATE,
            ),
            jsonl_path: read_non_empty_env(ENV_ANALYTICS_PATH).map(PathBuf::from),
        }
    }
}
