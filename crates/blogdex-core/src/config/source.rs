use std::path::PathBuf;
use std::time::Duration;

use crate::error::{Result, SearchError};

use super::env::{read_env_or, read_env_u64};

const ENV_ENVIRONMENT: &str = "BLOGDEX_ENVIRONMENT";
const ENV_DEV_INDEX_URL: &str = "BLOGDEX_DEV_INDEX_URL";
const ENV_BUCKET: &str = "BLOGDEX_BUCKET";
const ENV_INDEX_KEY: &str = "BLOGDEX_INDEX_KEY";
const ENV_FETCH_TIMEOUT_MS: &str = "BLOGDEX_FETCH_TIMEOUT_MS";

pub const DEFAULT_DEV_INDEX_URL: &str = "http://localhost:4321/search-index.json";
pub const DEFAULT_BUCKET: &str = "./public";
pub const DEFAULT_INDEX_KEY: &str = "search-index.json";
const DEFAULT_FETCH_TIMEOUT_MS: u64 = 5_000;

/// Deployment environment; decides where the index artifact is read from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Environment {
    Development,
    #[default]
    Production,
}

impl Environment {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
        }
    }

    pub fn parse(raw: Option<&str>) -> Result<Self> {
        let normalized = raw.map(|value| value.trim().to_ascii_lowercase());
        match normalized.as_deref() {
            None | Some("" | "production") => Ok(Self::Production),
            Some("development") => Ok(Self::Development),
            Some(other) => Err(SearchError::Validation(format!(
                "invalid {ENV_ENVIRONMENT}: {other} (expected development|production)"
            ))),
        }
    }
}

/// Durable storage holding published artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BucketLocation {
    Directory(PathBuf),
    Http(String),
}

impl BucketLocation {
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            Self::Http(trimmed.trim_end_matches('/').to_string())
        } else {
            Self::Directory(PathBuf::from(trimmed))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexSourceConfig {
    pub environment: Environment,
    pub dev_index_url: String,
    pub bucket: BucketLocation,
    pub index_key: String,
    pub fetch_timeout: Duration,
}

impl IndexSourceConfig {
    pub(super) fn from_env() -> Result<Self> {
        let fetch_timeout_ms = read_env_u64(ENV_FETCH_TIMEOUT_MS, DEFAULT_FETCH_TIMEOUT_MS, 1);
        Ok(Self {
            environment: Environment::parse(std::env::var(ENV_ENVIRONMENT).ok().as_deref())?,
            dev_index_url: read_env_or(ENV_DEV_INDEX_URL, DEFAULT_DEV_INDEX_URL),
            bucket: BucketLocation::parse(&read_env_or(ENV_BUCKET, DEFAULT_BUCKET)),
            index_key: read_env_or(ENV_INDEX_KEY, DEFAULT_INDEX_KEY),
            fetch_timeout: Duration::from_millis(fetch_timeout_ms),
        })
    }

    /// Serve a single artifact file from disk regardless of environment.
    #[must_use]
    pub fn for_file(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let key = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| DEFAULT_INDEX_KEY.to_string());
        let dir = path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .map_or_else(|| PathBuf::from("."), PathBuf::from);
        Self {
            environment: Environment::Production,
            bucket: BucketLocation::Directory(dir),
            index_key: key,
            ..Self::default()
        }
    }
}

impl Default for IndexSourceConfig {
    fn default() -> Self {
        Self {
            environment: Environment::Production,
            dev_index_url: DEFAULT_DEV_INDEX_URL.to_string(),
            bucket: BucketLocation::Directory(PathBuf::from(DEFAULT_BUCKET)),
            index_key: DEFAULT_INDEX_KEY.to_string(),
            fetch_timeout: Duration::from_millis(DEFAULT_FETCH_TIMEOUT_MS),
        }
    }
}
