//! The Writer: accepts a manifest, decides whether it is the latest
//! known version, and commits a single atomic batch (`spec.md` §4.4).

use crate::cache::LatestVersionCache;
use crate::error::{WriteError, WriteResult};
use crate::writer_mutex::WriterMutex;
use depindex_core::{key, parse_version_triple, DependencyKind, Manifest};
use depindex_range::{comparator::parse_range, encode_range};
use depindex_store::{Op, Store};
use std::sync::Arc;

pub struct Writer {
    store: Arc<dyn Store>,
    cache: Arc<LatestVersionCache>,
    mutex: Arc<WriterMutex>,
}

impl Writer {
    pub fn new(store: Arc<dyn Store>, cache: Arc<LatestVersionCache>, mutex: Arc<WriterMutex>) -> Self {
        Self { store, cache, mutex }
    }

    /// Runs the five steps of `spec.md` §4.4's `store(manifest)`.
    pub async fn store(&self, manifest: &Manifest) -> WriteResult<()> {
        let _guard = self.mutex.acquire().await;

        let is_latest = self.is_latest(manifest).await?;

        let mut ops = Vec::new();
        self.append_index_ops(&mut ops, manifest, DependencyKind::Dependency, is_latest);
        self.append_index_ops(&mut ops, manifest, DependencyKind::DevDependency, is_latest);

        let manifest_json =
            serde_json::to_vec(manifest).expect("Manifest serialization is infallible");
        ops.push(Op::Put(
            key::manifest_key(&manifest.name, &manifest.version),
            manifest_json.clone(),
        ));

        if is_latest {
            ops.push(Op::Put(key::latest_manifest_key(&manifest.name), manifest_json));
            ops.push(Op::Put(
                key::latest_version_key(&manifest.name),
                manifest.version.clone().into_bytes(),
            ));
        }

        self.store.batch(ops).await.map_err(WriteError::Store)?;
        tracing::debug!(name = %manifest.name, version = %manifest.version, is_latest, "stored manifest");

        if is_latest {
            self.cache.insert(&manifest.name, &manifest.version);
        }

        Ok(())
    }

    /// Step 2: consult the cache, falling back to the store on a miss.
    /// `isLatest = (no current) or (manifest.version > current)`, using
    /// numeric-tuple comparison of the parsed triple rather than a raw
    /// string compare.
    async fn is_latest(&self, manifest: &Manifest) -> WriteResult<bool> {
        let current = match self.cache.get(&manifest.name) {
            Some(v) => Some(v),
            None => self
                .store
                .get(&key::latest_version_key(&manifest.name))
                .await
                .map_err(WriteError::Store)?
                .map(|bytes| String::from_utf8_lossy(&bytes).into_owned()),
        };

        let Some(current) = current else {
            return Ok(true);
        };

        let new_version = parse_version_triple(&manifest.version);
        let current_version = parse_version_triple(&current);
        Ok(match (new_version, current_version) {
            (Ok(new), Ok(current)) => new > current,
            // An unparseable version can't be numerically compared; treat
            // it as not-latest rather than guessing.
            _ => false,
        })
    }

    fn append_index_ops(
        &self,
        ops: &mut Vec<Op>,
        manifest: &Manifest,
        kind: DependencyKind,
        is_latest: bool,
    ) {
        for (dep, range_str) in manifest.dependencies_of(kind) {
            let Ok(expr) = parse_range(range_str) else {
                tracing::debug!(
                    dependent = %manifest.name,
                    dependency = %dep,
                    range = %range_str,
                    "dropping unparseable range from index"
                );
                continue;
            };
            let encoded = encode_range(&expr);
            let encoded_json =
                serde_json::to_vec(&encoded).expect("EncodedRange serialization is infallible");

            ops.push(Op::Put(
                key::index_key(kind, dep, &manifest.name, &manifest.version),
                encoded_json.clone(),
            ));

            if is_latest {
                let latest_entry = LatestIndexEntry {
                    version: manifest.version.clone(),
                    sets: encoded,
                };
                let latest_json = serde_json::to_vec(&latest_entry)
                    .expect("LatestIndexEntry serialization is infallible");
                ops.push(Op::Put(key::index_latest_key(kind, dep, &manifest.name), latest_json));
            }
        }
    }
}

/// The value stored at `!index-latest!<kind>!<dep>!<dependent>`
/// (`spec.md` §3): the dependent's latest version plus its encoded
/// range, so the Reader can re-validate without a second store round
/// trip for the version string alone.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct LatestIndexEntry {
    pub version: String,
    pub sets: depindex_range::EncodedRange,
}
