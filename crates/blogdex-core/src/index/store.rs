use std::fmt::Debug;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::Client;

use crate::error::{Result, SearchError};

/// Read-only view of the durable storage the content pipeline publishes to.
pub trait ObjectStore: Debug + Send + Sync {
    /// Fetch an object body. A missing key is `Ok(None)`, not an error.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Human-readable location for logs and error messages.
    fn describe(&self, key: &str) -> String;
}

/// A directory acting as a bucket; keys are relative file paths inside it.
#[derive(Debug, Clone)]
pub struct FsObjectStore {
    root: PathBuf,
}

impl FsObjectStore {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn object_path(&self, key: &str) -> Result<PathBuf> {
        let relative = Path::new(key);
        let escapes = relative
            .components()
            .any(|component| !matches!(component, Component::Normal(_)));
        if key.trim().is_empty() || escapes {
            return Err(SearchError::Validation(format!(
                "object key must be a relative path inside the bucket: {key}"
            )));
        }
        Ok(self.root.join(relative))
    }
}

impl ObjectStore for FsObjectStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.object_path(key)?;
        match std::fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(SearchError::IndexUnavailable(format!(
                "failed to read {}: {err}",
                path.display()
            ))),
        }
    }

    fn describe(&self, key: &str) -> String {
        self.root.join(key).display().to_string()
    }
}

/// A bucket exposed over HTTP; objects live at `{base_url}/{key}`.
///
/// The blocking client is built per fetch and dropped on the calling thread.
#[derive(Debug, Clone)]
pub struct HttpObjectStore {
    base_url: String,
    timeout: Duration,
}

impl HttpObjectStore {
    #[must_use]
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        }
    }

    fn object_url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url, key.trim_start_matches('/'))
    }
}

impl ObjectStore for HttpObjectStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let url = self.object_url(key);
        let response = bounded_client(self.timeout)?
            .get(&url)
            .send()
            .map_err(|err| SearchError::IndexUnavailable(format!("GET {url} failed: {err}")))?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(SearchError::IndexUnavailable(format!(
                "GET {url} returned {status}"
            )));
        }
        let bytes = response.bytes().map_err(|err| {
            SearchError::IndexUnavailable(format!("reading body of {url} failed: {err}"))
        })?;
        Ok(Some(bytes.to_vec()))
    }

    fn describe(&self, key: &str) -> String {
        self.object_url(key)
    }
}

pub(crate) fn bounded_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|err| SearchError::Internal(format!("failed to build HTTP client: {err}")))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn fs_store_reads_existing_objects_and_reports_missing_ones() {
        let temp = tempfile::tempdir().expect("tempdir");
        fs::write(temp.path().join("search-index.json"), b"{}").expect("seed object");
        let store = FsObjectStore::new(temp.path());

        assert_eq!(
            store.get("search-index.json").expect("read"),
            Some(b"{}".to_vec())
        );
        assert_eq!(store.get("missing.json").expect("read missing"), None);
    }

    #[test]
    fn fs_store_rejects_keys_escaping_the_bucket() {
        let temp = tempfile::tempdir().expect("tempdir");
        let store = FsObjectStore::new(temp.path());
        for key in ["../secret.json", "/etc/passwd", "", "a/../../b"] {
            let err = store.get(key).expect_err("must reject");
            assert!(matches!(err, SearchError::Validation(_)), "key {key:?}");
        }
    }

    #[test]
    fn http_store_builds_object_urls() {
        let store = HttpObjectStore::new("https://cdn.example.com/bucket/", Duration::from_secs(1));
        assert_eq!(
            store.describe("/search-index.json"),
            "https://cdn.example.com/bucket/search-index.json"
        );
    }

    #[test]
    fn http_store_maps_connection_failures_to_unavailable() {
        let store = HttpObjectStore::new("http://127.0.0.1:9", Duration::from_millis(500));
        let err = store.get("search-index.json").expect_err("must fail");
        assert!(matches!(err, SearchError::IndexUnavailable(_)));
    }
}
