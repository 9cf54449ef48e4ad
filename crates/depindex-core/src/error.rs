use thiserror::Error;

/// Errors shared by every layer that deals with raw manifests, packed
/// versions, or index keys.
///
/// Ecosystem- or store-specific errors live in their own crates and
/// convert into/out of this type at the boundary, the way
/// `deps_npm::NpmError` converts to and from `deps_core::DepsError`.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("invalid version string '{0}': expected a dotted major[.minor[.patch]] triple")]
    InvalidVersion(String),

    #[error("version component overflow while parsing '{0}'")]
    VersionOverflow(String),
}

/// Convenience alias for `Result<T, CoreError>`.
pub type Result<T> = std::result::Result<T, CoreError>;
