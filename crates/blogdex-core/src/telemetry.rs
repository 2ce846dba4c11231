use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::{SecondsFormat, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::TelemetryConfig;
use crate::error::{Result, SearchError};
use crate::models::{ResultCountBucket, SearchRequest, SearchTiming};

/// One sampled search, as written to the analytics sink.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchEvent {
    pub event_id: String,
    pub recorded_at: String,
    pub query: String,
    /// Normalized tags joined with `,`.
    pub tags: String,
    pub timing: SearchTiming,
    pub result_count: usize,
    pub bucket: ResultCountBucket,
    /// Stable `"0"`..`"3"` key of `bucket` for aggregation.
    pub bucket_index: String,
}

impl SearchEvent {
    #[must_use]
    pub fn new(request: &SearchRequest, timing: SearchTiming, result_count: usize) -> Self {
        let bucket = ResultCountBucket::from_count(result_count);
        Self {
            event_id: Uuid::new_v4().to_string(),
            recorded_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            query: request.query.clone(),
            tags: request.tags.join(","),
            timing,
            result_count,
            bucket,
            bucket_index: bucket.as_index().to_string(),
        }
    }
}

pub trait TelemetrySink: Send + Sync {
    fn emit(&self, event: &SearchEvent) -> Result<()>;
}

/// Emits events as structured `tracing` records under the `blogdex::analytics` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl TelemetrySink for TracingSink {
    fn emit(&self, event: &SearchEvent) -> Result<()> {
        tracing::info!(
            target: "blogdex::analytics",
            event_id = %event.event_id,
            query = %event.query,
            tags = %event.tags,
            index_fetch_ms = event.timing.index_fetch,
            tag_filter_ms = event.timing.tag_filter,
            text_search_ms = event.timing.text_search,
            post_filter_ms = event.timing.post_filter,
            total_ms = event.timing.total,
            result_count = event.result_count,
            bucket = event.bucket.as_index(),
            "search event"
        );
        Ok(())
    }
}

/// Appends one JSON object per line to a local file.
#[derive(Debug)]
pub struct JsonlSink {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonlSink {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TelemetrySink for JsonlSink {
    fn emit(&self, event: &SearchEvent) -> Result<()> {
        let mut line = serde_json::to_string(event)?;
        line.push('\n');

        let _guard = self
            .lock
            .lock()
            .map_err(|_| SearchError::Internal("analytics sink lock poisoned".to_string()))?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(line.as_bytes())?;
        Ok(())
    }
}

/// Sampled analytics front-end. Emission failures are logged and swallowed.
#[derive(Clone)]
pub struct Telemetry {
    sink: Arc<dyn TelemetrySink>,
    sample_rate: u8,
}

impl fmt::Debug for Telemetry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Telemetry")
            .field("sample_rate", &self.sample_rate)
            .finish_non_exhaustive()
    }
}

impl Telemetry {
    #[must_use]
    pub fn new(sink: Arc<dyn TelemetrySink>, sample_rate: u8) -> Self {
        Self {
            sink,
            sample_rate: sample_rate.min(100),
        }
    }

    /// JSONL sink when a path is configured, otherwise tracing records.
    #[must_use]
    pub fn from_config(config: &TelemetryConfig) -> Self {
        let sink: Arc<dyn TelemetrySink> = match &config.jsonl_path {
            Some(path) => Arc::new(JsonlSink::new(path.clone())),
            None => Arc::new(TracingSink),
        };
        Self::new(sink, config.sample_rate)
    }

    #[must_use]
    pub fn disabled() -> Self {
        Self::new(Arc::new(TracingSink), 0)
    }

    #[must_use]
    pub const fn sample_rate(&self) -> u8 {
        self.sample_rate
    }

    /// `roll` is a uniform draw from `[0, 100)`.
    #[must_use]
    pub fn should_sample_with(&self, roll: f64) -> bool {
        match self.sample_rate {
            0 => false,
            100 => true,
            rate => roll < f64::from(rate),
        }
    }

    pub fn record(&self, request: &SearchRequest, timing: SearchTiming, result_count: usize) {
        let roll = rand::thread_rng().gen_range(0.0..100.0);
        if !self.should_sample_with(roll) {
            return;
        }
        let event = SearchEvent::new(request, timing, result_count);
        if let Err(err) = self.sink.emit(&event) {
            tracing::warn!(error = %err, "failed to emit search analytics event");
        }
    }
}
