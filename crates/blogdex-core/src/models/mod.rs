mod index;
mod search;

pub use index::{ArticleMeta, IndexMetadata, SearchIndex};
pub use search::{ResultCountBucket, SearchRequest, SearchResponse, SearchResult, SearchTiming};
