use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use crate::config::AppConfig;
use crate::error::{Result, SearchError};
use crate::index::{CachedIndexProvider, IndexLoader, IndexProvider};
use crate::models::{SearchResponse, SearchTiming};
use crate::response::format_response;
use crate::retrieval::{plan_query, search_with_timing};
use crate::telemetry::Telemetry;

pub const MISSING_QUERY_MESSAGE: &str = "Missing query parameter. Use ?q=your-search-term";

/// One request: load the index, plan, search, format, record analytics.
#[derive(Clone)]
pub struct SearchService {
    provider: Arc<dyn IndexProvider>,
    telemetry: Telemetry,
    strict_query: bool,
}

impl fmt::Debug for SearchService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchService")
            .field("telemetry", &self.telemetry)
            .field("strict_query", &self.strict_query)
            .finish_non_exhaustive()
    }
}

impl SearchService {
    #[must_use]
    pub fn new(provider: Arc<dyn IndexProvider>, telemetry: Telemetry) -> Self {
        Self {
            provider,
            telemetry,
            strict_query: false,
        }
    }

    #[must_use]
    pub fn with_strict_query(mut self, strict_query: bool) -> Self {
        self.strict_query = strict_query;
        self
    }

    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        let loader = IndexLoader::from_config(&config.source);
        tracing::info!(
            environment = config.source.environment.as_str(),
            source = %loader.source().describe(),
            cache_ttl_secs = config.search.cache_ttl.as_secs(),
            "search index source configured"
        );
        let provider: Arc<dyn IndexProvider> = if config.search.cache_ttl.is_zero() {
            Arc::new(loader)
        } else {
            Arc::new(CachedIndexProvider::new(loader, config.search.cache_ttl))
        };
        Self::new(provider, Telemetry::from_config(&config.telemetry))
            .with_strict_query(config.search.strict_query)
    }

    pub fn execute(
        &self,
        raw_query: Option<&str>,
        raw_tags: Option<&str>,
    ) -> Result<SearchResponse> {
        let missing_query = raw_query.is_none_or(|query| query.trim().is_empty());
        if self.strict_query && missing_query {
            return Err(SearchError::InvalidRequest(
                MISSING_QUERY_MESSAGE.to_string(),
            ));
        }

        let started = Instant::now();
        let index = self.provider.load_index()?;
        let index_fetch = elapsed_ms(started);

        let request = plan_query(raw_query, raw_tags);
        let (results, phases) = search_with_timing(&index, &request.terms, &request.tags);
        let response = format_response(&index, &request, results);

        let timing = SearchTiming {
            index_fetch,
            tag_filter: phases.tag_filter,
            text_search: phases.text_search,
            post_filter: phases.post_filter,
            total: elapsed_ms(started),
        };
        tracing::info!(
            query = %request.query,
            tags = %request.tags.join(","),
            count = response.count,
            index_fetch_ms = timing.index_fetch,
            total_ms = timing.total,
            "search completed"
        );
        self.telemetry.record(&request, timing, response.count);
        Ok(response)
    }
}

fn elapsed_ms(started: Instant) -> f64 {
    started.elapsed().as_secs_f64() * 1000.0
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use crate::models::{ArticleMeta, SearchIndex};

    use super::*;

    struct StaticProvider(Arc<SearchIndex>);

    impl IndexProvider for StaticProvider {
        fn load_index(&self) -> Result<Arc<SearchIndex>> {
            Ok(Arc::clone(&self.0))
        }
    }

    struct BrokenProvider;

    impl IndexProvider for BrokenProvider {
        fn load_index(&self) -> Result<Arc<SearchIndex>> {
            Err(SearchError::IndexUnavailable("bucket offline".to_string()))
        }
    }

    fn service() -> SearchService {
        let mut articles = HashMap::new();
        articles.insert(
            "astro-islands".to_string(),
            ArticleMeta {
                title: "Astro Islands".to_string(),
                description: "Partial hydration".to_string(),
                tags: vec!["web".to_string()],
                date: "2025-03-01".to_string(),
            },
        );
        let slugs = vec!["astro-islands".to_string()];
        let index = SearchIndex {
            keyword_index: HashMap::from([("islands".to_string(), slugs.clone())]),
            sorted_keywords: Some(vec!["islands".to_string()]),
            tag_index: HashMap::from([("web".to_string(), slugs)]),
            articles,
            tags: vec!["web".to_string()],
            ..SearchIndex::default()
        };
        let provider = Arc::new(StaticProvider(Arc::new(index)));
        SearchService::new(provider, Telemetry::disabled())
    }

    #[test]
    fn execute_returns_formatted_response() {
        let response = service().execute(Some("isl"), Some("WEB")).expect("search");
        assert_eq!(response.count, 1);
        assert_eq!(response.tags, Some(vec!["web".to_string()]));
        assert_eq!(response.results[0].relevance, 2);
        assert_eq!(response.available_tags, vec!["web"]);
    }

    #[test]
    fn strict_mode_rejects_missing_query() {
        let err = service()
            .with_strict_query(true)
            .execute(None, Some("web"))
            .expect_err("missing q");
        assert!(err.is_client_error());
        assert_eq!(err.to_payload().error, MISSING_QUERY_MESSAGE);

        let blank = service()
            .with_strict_query(true)
            .execute(Some("  "), None)
            .expect_err("blank q");
        assert!(blank.is_client_error());
    }

    #[test]
    fn lenient_mode_runs_tag_only_search() {
        let response = service().execute(None, Some("web")).expect("tag search");
        assert_eq!(response.query, None);
        assert_eq!(response.count, 1);
    }

    #[test]
    fn provider_errors_propagate() {
        let service = SearchService::new(Arc::new(BrokenProvider), Telemetry::disabled());
        let err = service.execute(Some("rust"), None).expect_err("offline");
        assert!(matches!(err, SearchError::IndexUnavailable(_)));
        assert!(!err.is_client_error());
    }
}
