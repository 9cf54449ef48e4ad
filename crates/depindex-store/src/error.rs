use thiserror::Error;

/// Errors a [`crate::Store`] implementation can surface. The in-memory
/// reference store never produces these; they exist for real backends
/// (LevelDB, RocksDB, a remote KV service) that can fail on I/O.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("store backend error: {0}")]
    Backend(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;
