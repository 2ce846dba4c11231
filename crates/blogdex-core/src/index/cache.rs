use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use crate::error::Result;
use crate::models::SearchIndex;

use super::loader::IndexProvider;

#[derive(Debug)]
struct CachedSnapshot {
    index: Arc<SearchIndex>,
    fetched_at: Instant,
}

/// Time-bounded cache in front of another provider.
///
/// Within `ttl` the last snapshot is served without fetching. After that the
/// inner provider is asked again; the snapshot is only replaced when the
/// fetched artifact carries a different `generated_at`, so unchanged
/// artifacts keep sharing one allocation. Fetch errors are returned as-is.
pub struct CachedIndexProvider<P> {
    inner: P,
    ttl: Duration,
    snapshot: RwLock<Option<CachedSnapshot>>,
}

impl<P: IndexProvider> CachedIndexProvider<P> {
    #[must_use]
    pub fn new(inner: P, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            snapshot: RwLock::new(None),
        }
    }

    fn fresh(&self, now: Instant) -> Option<Arc<SearchIndex>> {
        let guard = self.snapshot.read().ok()?;
        let snapshot = guard.as_ref()?;
        (now.duration_since(snapshot.fetched_at) < self.ttl).then(|| Arc::clone(&snapshot.index))
    }
}

impl<P: IndexProvider> IndexProvider for CachedIndexProvider<P> {
    fn load_index(&self) -> Result<Arc<SearchIndex>> {
        let now = Instant::now();
        if let Some(index) = self.fresh(now) {
            return Ok(index);
        }

        let fetched = self.inner.load_index()?;
        let mut guard = match self.snapshot.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let index = match guard.as_ref() {
            Some(current)
                if current.index.metadata.generated_at == fetched.metadata.generated_at =>
            {
                Arc::clone(&current.index)
            }
            _ => {
                tracing::info!(
                    generated_at = %fetched.metadata.generated_at,
                    "search index snapshot replaced"
                );
                fetched
            }
        };
        *guard = Some(CachedSnapshot {
            index: Arc::clone(&index),
            fetched_at: now,
        });
        Ok(index)
    }
}
