//! The single-holder exclusion primitive serializing `store()` and the
//! lazy-cleanup critical section against each other (`spec.md` §4.7).

use tokio::sync::{Mutex, MutexGuard};

/// A thin wrapper around `tokio::sync::Mutex<()>`.
///
/// Kept as its own type rather than a bare `Mutex<()>` field so the
/// places that acquire it (`store()`, cleanup) read as holding a named
/// resource rather than locking an opaque unit value.
#[derive(Debug, Default)]
pub struct WriterMutex {
    inner: Mutex<()>,
}

impl WriterMutex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquires exclusive access, suspending until any other holder
    /// (a `store()` call or a cleanup) releases it.
    pub async fn acquire(&self) -> MutexGuard<'_, ()> {
        self.inner.lock().await
    }
}
