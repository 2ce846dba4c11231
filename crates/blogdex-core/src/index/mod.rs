//! Index artifact decoding and retrieval.
//!
//! The artifact is produced outside this crate, published to a bucket or
//! served by the content pipeline's dev server, and treated as read-only.

mod artifact;
mod cache;
mod loader;
mod store;

pub use artifact::decode_artifact;
pub(crate) use artifact::{derive_tag_index, sorted_keys};
pub use cache::CachedIndexProvider;
pub use loader::{IndexLoader, IndexProvider, IndexSource};
pub use store::{FsObjectStore, HttpObjectStore, ObjectStore};
