//! An in-memory [`Store`] backed by a sorted map, used for tests and as
//! a runnable reference backend.

use crate::error::Result;
use crate::store::{Op, Store};
use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

/// A [`Store`] implementation over a `BTreeMap` guarded by a single
/// `RwLock`. Batches hold the write lock for their whole duration, so
/// every batch is trivially atomic with respect to concurrent readers
/// and other batches.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    inner: RwLock<BTreeMap<Vec<u8>, Vec<u8>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for InMemoryStore {
    async fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        Ok(self.inner.read().await.get(key).cloned())
    }

    async fn batch(&self, ops: Vec<Op>) -> Result<()> {
        let mut map = self.inner.write().await;
        for op in ops {
            match op {
                Op::Put(k, v) => {
                    map.insert(k, v);
                }
                Op::Del(k) => {
                    map.remove(&k);
                }
            }
        }
        Ok(())
    }

    async fn scan(&self, lower: &[u8], upper: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>> {
        let map = self.inner.read().await;
        Ok(map
            .range(lower.to_vec()..upper.to_vec())
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }
}
