//! The Reader / Query Engine: a prefixed forward scan, an in-memory
//! overlap filter, per-candidate manifest resolution, and the
//! lazy-cleanup protocol for stale latest-index entries
//! (`spec.md` §4.5–§4.5.1).

use crate::error::{QueryError, QueryResult};
use crate::writer::LatestIndexEntry;
use crate::writer_mutex::WriterMutex;
use depindex_core::{key, DependencyKind, Manifest};
use depindex_range::comparator::parse_range;
use depindex_range::{normalize_query, overlap, EncodedRange, QueryBounds};
use depindex_store::Store;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

/// Options accepted by [`Reader::query`] (`spec.md` §4.5's option table).
#[derive(Debug, Clone, Default)]
pub struct QueryOptions {
    /// Scan the per-version index instead of the latest-only index.
    pub all: bool,
    /// Use the `devDependencies` index family instead of `dependencies`.
    pub dev_dependencies: bool,
    /// Resume cursor: start strictly after this dependent name.
    pub gt: Option<String>,
    /// Upper bound on raw scan emissions, applied before filtering.
    pub limit: Option<usize>,
}

impl QueryOptions {
    fn kind(&self) -> DependencyKind {
        if self.dev_dependencies {
            DependencyKind::DevDependency
        } else {
            DependencyKind::Dependency
        }
    }
}

/// Channel depth for the producer-consumer pipeline between the scan
/// task and the stream a caller iterates. Small and fixed: the
/// producer's scan is already bounded by `opts.limit` or the prefix's
/// natural size, so this only needs to smooth scheduling, not buffer
/// an unbounded backlog.
const CHANNEL_CAPACITY: usize = 32;

pub struct Reader {
    store: Arc<dyn Store>,
    mutex: Arc<WriterMutex>,
}

impl Reader {
    pub fn new(store: Arc<dyn Store>, mutex: Arc<WriterMutex>) -> Self {
        Self { store, mutex }
    }

    /// Runs `spec.md` §4.5's `query(name, range, opts)`.
    ///
    /// Range normalization (step 1) happens synchronously before the
    /// scan starts, so an `InvalidQueryRange` is returned directly
    /// rather than as the stream's first item.
    pub fn query(
        &self,
        name: &str,
        range: &str,
        opts: QueryOptions,
    ) -> QueryResult<ReceiverStream<QueryResult<Manifest>>> {
        let expr = parse_range(range).map_err(QueryError::InvalidQueryRange)?;
        let bounds = normalize_query(&expr).map_err(QueryError::InvalidQueryRange)?;

        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        let store = Arc::clone(&self.store);
        let mutex = Arc::clone(&self.mutex);
        let name = name.to_string();

        tokio::spawn(async move {
            if let Err(err) = run_scan(&store, &mutex, &name, &bounds, &opts, &tx).await {
                let _ = tx.send(Err(err)).await;
            }
        });

        Ok(ReceiverStream::new(rx))
    }
}

async fn run_scan(
    store: &Arc<dyn Store>,
    mutex: &Arc<WriterMutex>,
    name: &str,
    bounds: &QueryBounds,
    opts: &QueryOptions,
    tx: &mpsc::Sender<QueryResult<Manifest>>,
) -> QueryResult<()> {
    let kind = opts.kind();
    let prefix = key::index_scan_prefix(opts.all, kind, name);
    let (lower, upper) = key::scan_bounds(&prefix, opts.gt.as_deref());

    let mut entries = store.scan(&lower, &upper).await.map_err(QueryError::Store)?;
    if let Some(limit) = opts.limit {
        entries.truncate(limit);
    }

    for (raw_key, raw_value) in entries {
        let tail = &raw_key[prefix.len()..];

        if opts.all {
            let (dependent, version) = key::split_per_version_tail(tail)?;
            let encoded: EncodedRange = serde_json::from_slice(&raw_value)
                .map_err(|source| QueryError::CorruptManifest {
                    name: dependent.clone(),
                    source,
                })?;

            if !bounds.wildcard && !overlap(bounds, &encoded) {
                continue;
            }

            let Some(manifest_bytes) = store
                .get(&key::manifest_key(&dependent, &version))
                .await
                .map_err(QueryError::Store)?
            else {
                continue;
            };
            let manifest: Manifest = serde_json::from_slice(&manifest_bytes)
                .map_err(|source| QueryError::CorruptManifest { name: dependent, source })?;

            // Per-version entries never go stale (spec.md §4.5 step 6):
            // emit unconditionally, no re-validation.
            if tx.send(Ok(manifest)).await.is_err() {
                return Ok(());
            }
        } else {
            let dependent = key::split_latest_tail(tail)?;
            let latest_entry: LatestIndexEntry = serde_json::from_slice(&raw_value)
                .map_err(|source| QueryError::CorruptManifest {
                    name: dependent.clone(),
                    source,
                })?;

            if !bounds.wildcard && !overlap(bounds, &latest_entry.sets) {
                continue;
            }

            let Some(manifest_bytes) = store
                .get(&key::latest_manifest_key(&dependent))
                .await
                .map_err(QueryError::Store)?
            else {
                continue;
            };
            let manifest: Manifest = serde_json::from_slice(&manifest_bytes)
                .map_err(|source| QueryError::CorruptManifest { name: dependent.clone(), source })?;

            if manifest.still_declares(kind, name) {
                if tx.send(Ok(manifest)).await.is_err() {
                    return Ok(());
                }
            } else {
                tracing::debug!(
                    dependent = %dependent,
                    dependency = %name,
                    "latest index entry is stale, running cleanup"
                );
                if let Err(err) = cleanup(store, mutex, kind, name, &dependent, &manifest.version).await {
                    tx.send(Err(err)).await.ok();
                }
            }
        }
    }

    Ok(())
}

/// Runs `spec.md` §4.5.1's four-step lazy-cleanup protocol.
///
/// `seen_version` is the version of the live `!pkg-latest!dependent`
/// manifest fetched in step 4 — not the (necessarily older) version
/// recorded on the stale `!index-latest!` entry itself, which by
/// construction never matches the current `!latest-version!` pointer.
async fn cleanup(
    store: &Arc<dyn Store>,
    mutex: &Arc<WriterMutex>,
    kind: DependencyKind,
    dep: &str,
    dependent: &str,
    seen_version: &str,
) -> QueryResult<()> {
    let _guard = mutex.acquire().await;

    let current_version = store
        .get(&key::latest_version_key(dependent))
        .await
        .map_err(QueryError::Store)?
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned());

    if current_version.as_deref() != Some(seen_version) {
        tracing::debug!(dependent, "latest moved again, aborting cleanup");
        return Ok(());
    }

    store
        .del(&key::index_latest_key(kind, dep, dependent))
        .await
        .map_err(|source| QueryError::Cleanup { source })?;
    tracing::debug!(dependent, dependency = dep, "cleaned up stale latest index entry");
    Ok(())
}
