//! Error taxonomy for the Writer and Reader/Query Engine.
//!
//! Split into a write-side and a read-side enum rather than one
//! workspace-wide type, each carrying `#[from]` conversions from the
//! crates underneath it.

use thiserror::Error;

/// Errors surfaced from [`crate::DepIndex::store`].
#[derive(Error, Debug)]
pub enum WriteError {
    #[error("store error: {0}")]
    Store(#[from] depindex_store::StoreError),
}

/// Errors surfaced from [`crate::DepIndex::query`].
///
/// An unparseable range on a *stored* dependency is never an error
/// here: the Writer drops that single dependency silently and the
/// manifest is still written (`spec.md` §4.4, §7's `UnparseableStoredRange`).
#[derive(Error, Debug)]
pub enum QueryError {
    /// The query range parses to a disjunction, to an unsupported
    /// comparator shape, or to more than two comparators.
    #[error("invalid query range: {0}")]
    InvalidQueryRange(#[from] depindex_range::RangeError),

    #[error("store error: {0}")]
    Store(#[from] depindex_store::StoreError),

    /// A candidate manifest's JSON failed to decode from the store.
    #[error("corrupt stored manifest for '{name}': {source}")]
    CorruptManifest {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    /// A scanned index key's tail could not be decoded into a dependent
    /// name (and, for per-version scans, a version string).
    #[error("corrupt index key: {0}")]
    CorruptKey(#[from] depindex_core::CoreError),

    /// Raised by the lazy-cleanup protocol when its own delete fails;
    /// propagated through the query's stream per `spec.md` §7.
    #[error("lazy-cleanup delete failed: {source}")]
    Cleanup {
        #[source]
        source: depindex_store::StoreError,
    },
}

pub type WriteResult<T> = std::result::Result<T, WriteError>;
pub type QueryResult<T> = std::result::Result<T, QueryError>;
