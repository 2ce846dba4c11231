use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use blogdex_core::build::{build_index, write_artifact};
use blogdex_core::config::IndexSourceConfig;
use blogdex_core::index::IndexLoader;
use blogdex_core::{AppConfig, SearchIndex, SearchService};

use crate::cli::Commands;

mod support;
mod web;


use self::support::print_json;
use self::web::{WebServeOptions, serve};

/// `RUST_LOG` wins; otherwise the verbosity flags pick the level.
pub(crate) fn init_logging(verbose: bool, quiet: bool) {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if quiet {
        EnvFilter::new("warn")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

pub(crate) fn run(command: Commands) -> Result<()> {
    match command {
        Commands::BuildIndex(args) => {
            let summary = run_build_index(&args.articles, &args.out)?;
            print_json(&summary)?;
        }
        Commands::Search(args) => {
            let config = resolve_config(args.index.as_deref())?;
            let response = SearchService::from_config(&config)
                .execute(args.query.as_deref(), args.tags.as_deref())
                .context("search failed")?;
            print_json(&response)?;
        }
        Commands::Inspect(args) => {
            let config = resolve_config(args.index.as_deref())?;
            let loader = IndexLoader::from_config(&config.source);
            let index = loader.load().context("failed to load search index")?;
            print_json(&IndexSummary::new(&loader.source().describe(), &index))?;
        }
        Commands::Web(args) => {
            let config = resolve_config(args.index.as_deref())?;
            serve(
                &config,
                WebServeOptions {
                    host: &args.host,
                    port: args.port,
                },
            )?;
        }
    }
    Ok(())
}

/// Environment configuration, with the index source pinned to `index` when given.
fn resolve_config(index: Option<&Path>) -> Result<AppConfig> {
    let mut config = AppConfig::from_env().context("invalid BLOGDEX_* configuration")?;
    if let Some(path) = index {
        config.source = IndexSourceConfig::for_file(path);
    }
    Ok(config)
}

fn run_build_index(articles: &Path, out: &Path) -> Result<IndexSummary> {
    let index = build_index(articles)
        .with_context(|| format!("failed to build index from {}", articles.display()))?;
    write_artifact(&index, out)
        .with_context(|| format!("failed to write index to {}", out.display()))?;
    tracing::info!(
        out = %out.display(),
        articles = index.metadata.total_articles,
        keywords = index.metadata.total_keywords,
        "search index written"
    );
    Ok(IndexSummary::new(&out.display().to_string(), &index))
}

#[derive(Debug, Serialize)]
struct IndexSummary {
    source: String,
    format: &'static str,
    generated_at: String,
    total_articles: usize,
    total_keywords: usize,
    total_tags: usize,
    tags: Vec<String>,
}

impl IndexSummary {
    fn new(source: &str, index: &SearchIndex) -> Self {
        Self {
            source: source.to_string(),
            format: if index.has_sorted_keywords() {
                "current"
            } else {
                "legacy"
            },
            generated_at: index.metadata.generated_at.clone(),
            total_articles: index.articles.len(),
            total_keywords: index.keyword_index.len(),
            total_tags: index.tags.len(),
            tags: index.tags.clone(),
        }
    }
}
