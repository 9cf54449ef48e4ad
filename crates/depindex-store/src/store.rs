//! The ordered key-value store contract the rest of depindex is built
//! on: point reads, atomic batch writes, and forward range scans over
//! byte-string keys in lexicographic order. A real deployment backs
//! this with something like LevelDB or RocksDB; this crate ships only
//! an in-memory reference implementation ([`InMemoryStore`]).

use crate::error::Result;
use async_trait::async_trait;

/// A single write within a [`Store::batch`] call.
#[derive(Debug, Clone)]
pub enum Op {
    Put(Vec<u8>, Vec<u8>),
    Del(Vec<u8>),
}

/// An ordered key-value store with atomic batch writes.
///
/// Every method takes `&self` rather than `&mut self`: implementations
/// are expected to manage their own interior synchronization, the same
/// way a real embedded database handle is shared and cloned freely
/// across async tasks.
#[async_trait]
pub trait Store: Send + Sync {
    /// Reads a single key. `Ok(None)` means the key is absent, not an
    /// error.
    async fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>>;

    /// Applies every operation in `ops` as a single atomic unit: either
    /// all of them are visible to subsequent reads, or none are.
    async fn batch(&self, ops: Vec<Op>) -> Result<()>;

    /// Deletes a single key. A no-op if the key is already absent.
    async fn del(&self, key: &[u8]) -> Result<()> {
        self.batch(vec![Op::Del(key.to_vec())]).await
    }

    /// Forward range scan over `lower..upper` (upper-exclusive),
    /// returned in key order.
    async fn scan(&self, lower: &[u8], upper: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>>;
}
