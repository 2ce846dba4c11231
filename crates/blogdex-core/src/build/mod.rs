//! Produces the search artifact from a directory of markdown articles.
//!
//! Layout: `<articles_dir>/<slug>/index.md`, each with a YAML frontmatter
//! header. The output is the current published format.

mod frontmatter;
mod keywords;

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use chrono::{SecondsFormat, Utc};
use walkdir::WalkDir;

use crate::error::{Result, SearchError};
use crate::index::{derive_tag_index, sorted_keys};
use crate::models::{ArticleMeta, IndexMetadata, SearchIndex};

pub use frontmatter::{Frontmatter, split_frontmatter};
pub use keywords::{
    MIN_WORD_LENGTH, TOP_KEYWORDS_COUNT, article_keywords, content_words, extract_text,
    is_stopword, title_words, top_keywords,
};

const ARTICLE_FILE_NAME: &str = "index.md";

/// Build an artifact from every `*/index.md` under `articles_dir`.
///
/// Articles whose frontmatter does not parse are skipped with a warning.
pub fn build_index(articles_dir: &Path) -> Result<SearchIndex> {
    if !articles_dir.is_dir() {
        return Err(SearchError::Validation(format!(
            "articles directory not found: {}",
            articles_dir.display()
        )));
    }

    let mut keyword_index = HashMap::<String, Vec<String>>::new();
    let mut articles = HashMap::new();

    for entry in WalkDir::new(articles_dir)
        .min_depth(2)
        .max_depth(2)
        .follow_links(false)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| SearchError::Validation(e.to_string()))?;
        if !entry.file_type().is_file() || entry.file_name() != ARTICLE_FILE_NAME {
            continue;
        }
        let Some(slug) = entry
            .path()
            .parent()
            .and_then(Path::file_name)
            .map(|name| name.to_string_lossy().to_string())
        else {
            continue;
        };

        let content = fs::read_to_string(entry.path())?;
        let (frontmatter, body) = match split_frontmatter(&content) {
            Ok(parsed) => parsed,
            Err(err) => {
                tracing::warn!(slug = %slug, error = %err, "skipping article");
                continue;
            }
        };

        let keywords = article_keywords(&frontmatter.tags, &frontmatter.title, body);
        tracing::debug!(slug = %slug, keywords = keywords.len(), "article indexed");
        for keyword in keywords {
            keyword_index.entry(keyword).or_default().push(slug.clone());
        }
        articles.insert(
            slug,
            ArticleMeta {
                title: frontmatter.title,
                description: frontmatter.description,
                tags: frontmatter.tags,
                date: frontmatter.date,
            },
        );
    }

    let (tag_index, tags) = derive_tag_index(&articles);
    let sorted_keywords = sorted_keys(&keyword_index);
    let metadata = IndexMetadata {
        total_articles: articles.len(),
        total_keywords: keyword_index.len(),
        total_tags: tags.len(),
        generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
    };

    Ok(SearchIndex {
        keyword_index,
        sorted_keywords: Some(sorted_keywords),
        tag_index,
        articles,
        tags,
        metadata,
    })
}

/// Write the artifact as pretty JSON, creating parent directories.
pub fn write_artifact(index: &SearchIndex, out: &Path) -> Result<()> {
    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut payload = serde_json::to_vec_pretty(index)?;
    payload.push(b'\n');
    fs::write(out, payload)?;
    Ok(())
}
