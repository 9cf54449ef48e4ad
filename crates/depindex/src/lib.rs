//! A queryable range-overlap index over npm-style package manifests.
//!
//! [`DepIndex`] is the embedded-API facade: [`DepIndex::store`] accepts
//! a manifest and [`DepIndex::query`] answers "who depends on X within
//! range R" without scanning every dependent. Everything underneath —
//! the packed version codec, the range normalizer, the key schema — is
//! re-exported from `depindex-core` and `depindex-range` for callers
//! that need to work with the lower-level pieces directly.

mod cache;
mod config;
pub mod error;
mod reader;
mod writer;
mod writer_mutex;

pub use cache::LatestVersionCache;
pub use config::IndexConfig;
pub use error::{QueryError, QueryResult, WriteError, WriteResult};
pub use reader::{QueryOptions, Reader};
pub use writer::{LatestIndexEntry, Writer};
pub use writer_mutex::WriterMutex;

use depindex_core::Manifest;
use depindex_store::Store;
use std::sync::Arc;
use tokio_stream::wrappers::ReceiverStream;

/// The long-lived handle embedders construct once and pass to every
/// operation (`spec.md` §9: the cache and mutex are modeled as owned
/// fields of this handle, not implicit globals).
pub struct DepIndex {
    writer: Writer,
    reader: Reader,
}

impl DepIndex {
    /// Builds a new index over `store`, with cache behavior governed by
    /// `config`.
    pub fn new(store: Arc<dyn Store>, config: IndexConfig) -> Self {
        let cache = Arc::new(LatestVersionCache::new(&config));
        let mutex = Arc::new(WriterMutex::new());
        Self {
            writer: Writer::new(Arc::clone(&store), cache, Arc::clone(&mutex)),
            reader: Reader::new(store, mutex),
        }
    }

    /// `spec.md` §4.4's `store(manifest)`.
    pub async fn store(&self, manifest: &Manifest) -> WriteResult<()> {
        self.writer.store(manifest).await
    }

    /// `spec.md` §4.5's `query(name, range, opts)`.
    pub fn query(
        &self,
        name: &str,
        range: &str,
        opts: QueryOptions,
    ) -> QueryResult<ReceiverStream<QueryResult<Manifest>>> {
        self.reader.query(name, range, opts)
    }
}
