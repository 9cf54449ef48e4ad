//! Core abstractions for depindex.
//!
//! This crate provides the foundational types shared by every other
//! depindex crate: the manifest document, the version codec, and the
//! key schema. It performs no I/O and depends on no async runtime.

pub mod error;
pub mod key;
pub mod manifest;
pub mod version;

pub use error::{CoreError, Result};
pub use manifest::{DependencyKind, Manifest};
pub use version::{pack, parse_version_triple, VersionTriple, SENTINEL_MAX, SENTINEL_MIN};
