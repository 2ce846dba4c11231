use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::{BucketLocation, Environment, IndexSourceConfig};
use crate::error::{Result, SearchError};
use crate::models::SearchIndex;

use super::artifact::decode_artifact;
use super::store::{FsObjectStore, HttpObjectStore, ObjectStore, bounded_client};

/// Anything that can hand out the current index snapshot.
pub trait IndexProvider: Send + Sync {
    fn load_index(&self) -> Result<Arc<SearchIndex>>;
}

/// Where the artifact is read from.
#[derive(Debug, Clone)]
pub enum IndexSource {
    /// The content pipeline's local development server.
    DevServer { url: String },
    /// A published object in durable storage.
    Bucket {
        store: Arc<dyn ObjectStore>,
        key: String,
    },
}

impl IndexSource {
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::DevServer { url } => url.clone(),
            Self::Bucket { store, key } => store.describe(key),
        }
    }
}

/// Fetches and decodes the artifact on every call.
#[derive(Debug, Clone)]
pub struct IndexLoader {
    source: IndexSource,
    timeout: Duration,
}

impl IndexLoader {
    #[must_use]
    pub fn new(source: IndexSource, timeout: Duration) -> Self {
        Self { source, timeout }
    }

    /// Pick the source from the deployment environment: development reads
    /// the local dev server, everything else reads the bucket.
    #[must_use]
    pub fn from_config(config: &IndexSourceConfig) -> Self {
        let source = match config.environment {
            Environment::Development => IndexSource::DevServer {
                url: config.dev_index_url.clone(),
            },
            Environment::Production => {
                let store: Arc<dyn ObjectStore> = match &config.bucket {
                    BucketLocation::Directory(root) => Arc::new(FsObjectStore::new(root.clone())),
                    BucketLocation::Http(base_url) => {
                        Arc::new(HttpObjectStore::new(base_url, config.fetch_timeout))
                    }
                };
                IndexSource::Bucket {
                    store,
                    key: config.index_key.clone(),
                }
            }
        };
        Self::new(source, config.fetch_timeout)
    }

    #[must_use]
    pub fn source(&self) -> &IndexSource {
        &self.source
    }

    pub fn load(&self) -> Result<SearchIndex> {
        let started = Instant::now();
        let bytes = self.fetch()?;
        let index = decode_artifact(&bytes)?;
        tracing::debug!(
            source = %self.source.describe(),
            bytes = bytes.len(),
            articles = index.articles.len(),
            keywords = index.keyword_index.len(),
            elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
            "search index loaded"
        );
        Ok(index)
    }

    fn fetch(&self) -> Result<Vec<u8>> {
        match &self.source {
            IndexSource::DevServer { url } => fetch_dev_server(url, self.timeout),
            IndexSource::Bucket { store, key } => store.get(key)?.ok_or_else(|| {
                SearchError::IndexUnavailable(format!(
                    "search index not found in bucket: {}",
                    store.describe(key)
                ))
            }),
        }
    }
}

impl IndexProvider for IndexLoader {
    fn load_index(&self) -> Result<Arc<SearchIndex>> {
        self.load().map(Arc::new)
    }
}

fn fetch_dev_server(url: &str, timeout: Duration) -> Result<Vec<u8>> {
    let response = bounded_client(timeout)?.get(url).send().map_err(|err| {
        SearchError::IndexUnavailable(format!("failed to load search index from {url}: {err}"))
    })?;
    let status = response.status();
    if !status.is_success() {
        return Err(SearchError::IndexUnavailable(format!(
            "failed to load search index from {url}: {status}"
        )));
    }
    let bytes = response.bytes().map_err(|err| {
        SearchError::IndexUnavailable(format!("failed to read search index from {url}: {err}"))
    })?;
    Ok(bytes.to_vec())
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use super::*;

    const ARTIFACT: &str = r#"{
        "index": { "rust": ["intro-rust"] },
        "keywords": ["rust"],
        "tagIndex": { "rust": ["intro-rust"] },
        "articles": {
            "intro-rust": {
                "title": "Intro to Rust",
                "description": "First steps",
                "tags": ["rust"],
                "date": "2025-02-01"
            }
        },
        "tags": ["rust"],
        "metadata": {
            "total_articles": 1,
            "total_keywords": 1,
            "total_tags": 1,
            "generated_at": "2025-02-02T00:00:00Z"
        }
    }"#;

    fn bucket_config(root: PathBuf) -> IndexSourceConfig {
        IndexSourceConfig {
            bucket: BucketLocation::Directory(root),
            ..IndexSourceConfig::default()
        }
    }

    #[test]
    fn loads_artifact_from_directory_bucket() {
        let temp = tempfile::tempdir().expect("tempdir");
        fs::write(temp.path().join("search-index.json"), ARTIFACT).expect("seed artifact");

        let loader = IndexLoader::from_config(&bucket_config(temp.path().to_path_buf()));
        let index = loader.load().expect("load");
        assert_eq!(index.articles.len(), 1);
        assert_eq!(index.metadata.generated_at, "2025-02-02T00:00:00Z");
    }

    #[test]
    fn missing_bucket_entry_is_unavailable() {
        let temp = tempfile::tempdir().expect("tempdir");
        let loader = IndexLoader::from_config(&bucket_config(temp.path().to_path_buf()));
        let err = loader.load().expect_err("must fail");
        assert!(matches!(err, SearchError::IndexUnavailable(_)), "{err}");
    }

    #[test]
    fn corrupt_bucket_entry_is_malformed() {
        let temp = tempfile::tempdir().expect("tempdir");
        fs::write(temp.path().join("search-index.json"), "{\"index\": 3}").expect("seed");
        let loader = IndexLoader::from_config(&bucket_config(temp.path().to_path_buf()));
        let err = loader.load_index().expect_err("must fail");
        assert!(matches!(err, SearchError::IndexMalformed(_)), "{err}");
    }

    #[test]
    fn development_environment_reads_dev_server() {
        let config = IndexSourceConfig {
            environment: Environment::Development,
            dev_index_url: "http://127.0.0.1:9/search-index.json".to_string(),
            fetch_timeout: Duration::from_millis(500),
            ..IndexSourceConfig::default()
        };
        let loader = IndexLoader::from_config(&config);
        assert!(matches!(loader.source(), IndexSource::DevServer { .. }));

        let err = loader.load().expect_err("discard port");
        assert!(matches!(err, SearchError::IndexUnavailable(_)), "{err}");
    }
}
