// Public fallible APIs in this crate share one error contract (`SearchError`).
#![allow(
    clippy::missing_errors_doc,
    reason = "crate-wide fallible API uses one explicit error type"
)]

#[cfg(feature = "index-builder")]
pub mod build;
pub mod config;
pub mod error;
pub mod index;
pub mod models;
pub mod response;
pub mod retrieval;
pub mod service;
pub mod telemetry;

pub use config::AppConfig;
pub use error::{Result, SearchError};
pub use index::{IndexLoader, IndexProvider, decode_artifact};
pub use models::{SearchIndex, SearchResponse, SearchResult};
pub use retrieval::{plan_query, search};
pub use service::SearchService;
