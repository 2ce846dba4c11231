use std::collections::{HashMap, HashSet};
use std::ops::Range;
use std::time::Instant;

use crate::index::sorted_keys;
use crate::models::{SearchIndex, SearchResult};

/// How query terms are matched against index keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchPolicy {
    /// Keyword starts with the term; binary search over the sorted keyword list.
    Prefix,
    /// Keyword and term contain one another; linear scan over all keywords.
    Substring,
}

impl MatchPolicy {
    /// Prefix matching whenever the artifact ships a sorted keyword list.
    #[must_use]
    pub fn for_index(index: &SearchIndex) -> Self {
        if index.has_sorted_keywords() {
            Self::Prefix
        } else {
            Self::Substring
        }
    }
}

/// Milliseconds spent in each engine phase.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PhaseTiming {
    pub tag_filter: f64,
    pub text_search: f64,
    pub post_filter: f64,
}

/// Run a search and return results ranked by relevance.
#[must_use]
pub fn search(index: &SearchIndex, terms: &[String], tags: &[String]) -> Vec<SearchResult> {
    search_with_timing(index, terms, tags).0
}

pub fn search_with_timing(
    index: &SearchIndex,
    terms: &[String],
    tags: &[String],
) -> (Vec<SearchResult>, PhaseTiming) {
    let mut timing = PhaseTiming::default();
    let mut results = ResultSet::default();
    let tag_filtered = !tags.is_empty();

    let started = Instant::now();
    if tag_filtered {
        seed_tag_matches(index, tags, &mut results);
    }
    timing.tag_filter = elapsed_ms(started);

    let started = Instant::now();
    if !terms.is_empty() {
        match_terms(index, terms, tag_filtered, &mut results);
    }
    timing.text_search = elapsed_ms(started);

    let started = Instant::now();
    let mut ranked = results.into_vec();
    if tag_filtered && !terms.is_empty() {
        ranked.retain(|result| !result.matched_keywords.is_empty());
    }
    rank(&mut ranked);
    timing.post_filter = elapsed_ms(started);

    (ranked, timing)
}

/// Half-open range of `keywords` whose entries may start with `prefix`.
///
/// `keywords` must be sorted. The lower bound is the first entry `>= prefix`,
/// the upper bound the first entry `>=` the prefix with its last character
/// incremented. Callers re-check each entry with `starts_with`.
#[must_use]
pub fn prefix_range(keywords: &[String], prefix: &str) -> Range<usize> {
    let start = keywords.partition_point(|keyword| keyword.as_str() < prefix);
    let end = match prefix_successor(prefix) {
        Some(successor) => {
            let rest = &keywords[start..];
            start + rest.partition_point(|keyword| keyword.as_str() < successor.as_str())
        }
        None => keywords.len(),
    };
    start..end
}

fn prefix_successor(prefix: &str) -> Option<String> {
    let mut chars = prefix.chars().collect::<Vec<_>>();
    while let Some(last) = chars.pop() {
        if let Some(next) = next_char(last) {
            chars.push(next);
            return Some(chars.into_iter().collect());
        }
    }
    None
}

fn next_char(c: char) -> Option<char> {
    match c {
        char::MAX => None,
        '\u{D7FF}' => Some('\u{E000}'),
        _ => char::from_u32(u32::from(c) + 1),
    }
}

#[must_use]
pub fn substring_match(term: &str, keyword: &str) -> bool {
    keyword == term || keyword.contains(term) || term.contains(keyword)
}

#[derive(Debug, Default)]
struct ResultSet {
    positions: HashMap<String, usize>,
    results: Vec<SearchResult>,
    skipped: usize,
}

impl ResultSet {
    fn get_mut(&mut self, slug: &str) -> Option<&mut SearchResult> {
        let position = *self.positions.get(slug)?;
        self.results.get_mut(position)
    }

    fn insert(&mut self, result: SearchResult) {
        self.positions
            .insert(result.slug.clone(), self.results.len());
        self.results.push(result);
    }

    fn into_vec(self) -> Vec<SearchResult> {
        if self.skipped > 0 {
            tracing::debug!(
                skipped = self.skipped,
                "referenced slugs missing from article metadata"
            );
        }
        self.results
    }
}

/// Seed results with articles carrying every requested tag.
fn seed_tag_matches(index: &SearchIndex, tags: &[String], results: &mut ResultSet) {
    let mut seen = HashSet::new();
    let unique = tags
        .iter()
        .map(|tag| tag.to_lowercase())
        .filter(|tag| seen.insert(tag.clone()))
        .collect::<Vec<_>>();
    let Some((first, rest)) = unique.split_first() else {
        return;
    };

    let others = rest
        .iter()
        .map(|tag| {
            index
                .tag_slugs(tag)
                .iter()
                .map(String::as_str)
                .collect::<HashSet<_>>()
        })
        .collect::<Vec<_>>();

    let base_relevance = unique.len();
    for slug in index.tag_slugs(first) {
        if results.positions.contains_key(slug.as_str())
            || !others.iter().all(|slugs| slugs.contains(slug.as_str()))
        {
            continue;
        }
        match index.article(slug) {
            Some(article) => {
                results.insert(SearchResult::from_article(slug, article, base_relevance));
            }
            None => results.skipped += 1,
        }
    }
}

fn match_terms(index: &SearchIndex, terms: &[String], restrict: bool, results: &mut ResultSet) {
    let sorted = index.sorted_keywords.as_deref();
    match (MatchPolicy::for_index(index), sorted) {
        (MatchPolicy::Prefix, Some(sorted)) => {
            for term in terms {
                for keyword in &sorted[prefix_range(sorted, term)] {
                    if keyword.starts_with(term.as_str()) {
                        apply_keyword(index, keyword, restrict, results);
                    }
                }
            }
        }
        _ => {
            let keywords = sorted_keys(&index.keyword_index);
            for term in terms {
                for keyword in &keywords {
                    if substring_match(term, keyword) {
                        apply_keyword(index, keyword, restrict, results);
                    }
                }
            }
        }
    }
}

/// Credit every article listed under `keyword`. Relevance grows by one per
/// distinct keyword, so a keyword reached through several terms counts once.
/// With `restrict`, only articles already in `results` are credited.
fn apply_keyword(index: &SearchIndex, keyword: &str, restrict: bool, results: &mut ResultSet) {
    for slug in index.keyword_slugs(keyword) {
        if let Some(existing) = results.get_mut(slug) {
            if existing.record_keyword(keyword) {
                existing.relevance += 1;
            }
            continue;
        }
        if restrict {
            continue;
        }
        match index.article(slug) {
            Some(article) => {
                let mut result = SearchResult::from_article(slug, article, 1);
                result.record_keyword(keyword);
                results.insert(result);
            }
            None => results.skipped += 1,
        }
    }
}

/// Relevance descending, then newest first, then slug.
fn rank(results: &mut [SearchResult]) {
    results.sort_by(|a, b| {
        b.relevance
            .cmp(&a.relevance)
            .then_with(|| b.date.cmp(&a.date))
            .then_with(|| a.slug.cmp(&b.slug))
    });
}

fn elapsed_ms(started: Instant) -> f64 {
    started.elapsed().as_secs_f64() * 1000.0
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use crate::models::ArticleMeta;

    use super::*;

    fn article(title: &str, tags: &[&str], date: &str) -> ArticleMeta {
        ArticleMeta {
            title: title.to_string(),
            description: format!("About {title}"),
            tags: tags.iter().map(ToString::to_string).collect(),
            date: date.to_string(),
        }
    }

    fn slugs(values: &[&str]) -> Vec<String> {
        values.iter().map(ToString::to_string).collect()
    }

    fn fixture_index() -> SearchIndex {
        let mut articles = HashMap::new();
        articles.insert("a".to_string(), article("Alpha", &["x", "y"], "2025-01-01"));
        articles.insert("b".to_string(), article("Beta", &["x"], "2025-02-01"));
        articles.insert("c".to_string(), article("Gamma", &["y"], "2025-03-01"));

        let mut keyword_index = HashMap::new();
        keyword_index.insert("car".to_string(), slugs(&["a", "b"]));
        keyword_index.insert("cat".to_string(), slugs(&["a"]));
        keyword_index.insert("dog".to_string(), slugs(&["b", "c"]));
        keyword_index.insert("rust".to_string(), slugs(&["c", "ghost"]));

        let mut tag_index = HashMap::new();
        tag_index.insert("x".to_string(), slugs(&["a", "b"]));
        tag_index.insert("y".to_string(), slugs(&["a", "c"]));

        let mut sorted = keyword_index.keys().cloned().collect::<Vec<_>>();
        sorted.sort();

        SearchIndex {
            keyword_index,
            sorted_keywords: Some(sorted),
            tag_index,
            articles,
            tags: slugs(&["x", "y"]),
            ..SearchIndex::default()
        }
    }

    fn result_slugs(results: &[SearchResult]) -> Vec<&str> {
        results.iter().map(|result| result.slug.as_str()).collect()
    }

    #[test]
    fn prefix_range_covers_exactly_matching_keywords() {
        let mut keywords = slugs(&["cat", "car", "dog"]);
        keywords.sort();
        let range = prefix_range(&keywords, "ca");
        assert_eq!(&keywords[range], &["car".to_string(), "cat".to_string()]);

        assert!(prefix_range(&keywords, "zebra").is_empty());
        assert_eq!(prefix_range(&keywords, "dog"), 2..3);
        assert_eq!(prefix_range(&[], "ca"), 0..0);
    }

    #[test]
    fn prefix_successor_carries_past_max_char() {
        assert_eq!(prefix_successor("ca").as_deref(), Some("cb"));
        assert_eq!(prefix_successor("a\u{10FFFF}").as_deref(), Some("b"));
        assert_eq!(prefix_successor("\u{10FFFF}"), None);
        assert_eq!(prefix_successor("\u{D7FF}").as_deref(), Some("\u{E000}"));
    }

    #[test]
    fn empty_request_returns_nothing() {
        assert!(search(&fixture_index(), &[], &[]).is_empty());
    }

    #[test]
    fn tags_intersect_instead_of_union() {
        let results = search(&fixture_index(), &[], &slugs(&["x", "y"]));
        assert_eq!(result_slugs(&results), vec!["a"]);
        assert_eq!(results[0].relevance, 2);
        assert!(results[0].matched_keywords.is_empty());
    }

    #[test]
    fn unknown_tag_empties_the_intersection() {
        assert!(search(&fixture_index(), &[], &slugs(&["x", "nope"])).is_empty());
    }

    #[test]
    fn duplicate_tags_are_folded_before_scoring() {
        let results = search(&fixture_index(), &[], &slugs(&["x", "X", "x"]));
        assert_eq!(result_slugs(&results), vec!["b", "a"]);
        assert!(results.iter().all(|result| result.relevance == 1));
    }

    #[test]
    fn keyword_relevance_counts_distinct_keywords() {
        let results = search(&fixture_index(), &slugs(&["ca"]), &[]);
        assert_eq!(result_slugs(&results), vec!["a", "b"]);
        assert_eq!(results[0].relevance, 2);
        assert_eq!(results[0].matched_keywords, vec!["car", "cat"]);
        assert_eq!(results[1].relevance, 1);

        let repeated = search(&fixture_index(), &slugs(&["car", "car", "ca"]), &[]);
        let a = repeated
            .iter()
            .find(|result| result.slug == "a")
            .expect("a matches");
        assert_eq!(a.relevance, 2);
        assert_eq!(a.matched_keywords, vec!["car", "cat"]);
    }

    #[test]
    fn keywords_only_augment_tag_matches() {
        let results = search(&fixture_index(), &slugs(&["dog", "car"]), &slugs(&["x"]));
        assert_eq!(result_slugs(&results), vec!["b", "a"]);
        assert_eq!(results[0].relevance, 3);
        assert_eq!(results[0].matched_keywords, vec!["dog", "car"]);
        assert_eq!(results[1].relevance, 2);
        assert!(results.iter().all(|r| !r.matched_keywords.is_empty()));
    }

    #[test]
    fn combined_filters_drop_tag_matches_without_keyword_hits() {
        let results = search(&fixture_index(), &slugs(&["dog"]), &slugs(&["y"]));
        assert_eq!(result_slugs(&results), vec!["c"]);
    }

    #[test]
    fn missing_keyword_yields_empty_results() {
        assert!(search(&fixture_index(), &slugs(&["astro"]), &[]).is_empty());
    }

    #[test]
    fn dangling_slugs_are_skipped() {
        let results = search(&fixture_index(), &slugs(&["rust"]), &[]);
        assert_eq!(result_slugs(&results), vec!["c"]);
    }

    #[test]
    fn ranking_is_non_increasing_with_date_then_slug_ties() {
        let results = search(&fixture_index(), &slugs(&["car", "cat", "dog"]), &[]);
        assert!(
            results
                .windows(2)
                .all(|pair| pair[0].relevance >= pair[1].relevance)
        );
        assert_eq!(result_slugs(&results), vec!["b", "a", "c"]);
        assert_eq!(results[1].relevance, 2);
        assert_eq!(results[2].relevance, 1);
    }

    #[test]
    fn substring_fallback_matches_both_directions() {
        let mut index = fixture_index();
        index.sorted_keywords = None;
        assert_eq!(MatchPolicy::for_index(&index), MatchPolicy::Substring);

        let contained = search(&index, &slugs(&["og"]), &[]);
        assert_eq!(result_slugs(&contained), vec!["c", "b"]);

        let containing = search(&index, &slugs(&["cats"]), &[]);
        assert_eq!(result_slugs(&containing), vec!["a"]);
        assert_eq!(containing[0].matched_keywords, vec!["cat"]);
    }

    #[test]
    fn timing_is_reported_for_each_phase() {
        let (_, timing) = search_with_timing(&fixture_index(), &slugs(&["ca"]), &slugs(&["x"]));
        assert!(timing.tag_filter >= 0.0);
        assert!(timing.text_search >= 0.0);
        assert!(timing.post_filter >= 0.0);
    }
}
