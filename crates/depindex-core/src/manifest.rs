//! The manifest document accepted by the Writer and returned by queries.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Which dependency section a declared range came from.
///
/// `spec.md` only indexes `dependencies` and `devDependencies` (the
/// `dep`/`dev` key families of §3); `peerDependencies` and
/// `optionalDependencies`, present in the npm ecosystem this corpus is
/// modeled on, are out of scope and never produce index entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DependencyKind {
    #[serde(rename = "dep")]
    Dependency,
    #[serde(rename = "dev")]
    DevDependency,
}

impl DependencyKind {
    /// The key-family token used in every index key (`spec.md` §3's `<kind>`).
    pub const fn as_key_token(self) -> &'static str {
        match self {
            Self::Dependency => "dep",
            Self::DevDependency => "dev",
        }
    }
}

/// A package descriptor: name, version, and its declared dependency
/// ranges. The full document stored verbatim at `!pkg!<name>@<version>`
/// and `!pkg-latest!<name>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub dependencies: BTreeMap<String, String>,
    #[serde(default, rename = "devDependencies")]
    pub dev_dependencies: BTreeMap<String, String>,
}

impl Manifest {
    /// Iterates over every declared range in the given section, paired
    /// with the dependency kind that section represents.
    pub fn dependencies_of(&self, kind: DependencyKind) -> impl Iterator<Item = (&str, &str)> {
        let map = match kind {
            DependencyKind::Dependency => &self.dependencies,
            DependencyKind::DevDependency => &self.dev_dependencies,
        };
        map.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Whether this manifest still declares `name` in the given section,
    /// used by the Reader to re-validate a latest-scan candidate before
    /// triggering lazy cleanup (`spec.md` §4.5 step 5).
    pub fn still_declares(&self, kind: DependencyKind, name: &str) -> bool {
        match kind {
            DependencyKind::Dependency => self.dependencies.contains_key(name),
            DependencyKind::DevDependency => self.dev_dependencies.contains_key(name),
        }
    }
}
