//! The six key families of `spec.md` §3, and the escaping discipline
//! that keeps package names prefix-free against the `!` field
//! separator.
//!
//! Every name fragment embedded in a key is percent-encoded with
//! [`urlencoding`] before being written. `!`, `@`, and `/` (common in
//! scoped npm package names like `@vitest/coverage-v8`) all encode to
//! `%XX` sequences that never collide with a literal separator byte,
//! so splitting a scanned key on `!` is always unambiguous.

use crate::error::{CoreError, Result};
use crate::manifest::DependencyKind;

const SEP: u8 = b'!';
const AT: u8 = b'@';

fn push_encoded(out: &mut Vec<u8>, name: &str) {
    out.extend(urlencoding::encode(name).as_bytes());
}

fn decode(fragment: &str) -> Result<String> {
    urlencoding::decode(fragment)
        .map(|s| s.into_owned())
        .map_err(|_| CoreError::InvalidVersion(fragment.to_string()))
}

/// `!pkg!<name>@<version>`
pub fn manifest_key(name: &str, version: &str) -> Vec<u8> {
    let mut out = b"!pkg!".to_vec();
    push_encoded(&mut out, name);
    out.push(AT);
    out.extend(version.as_bytes());
    out
}

/// `!pkg-latest!<name>`
pub fn latest_manifest_key(name: &str) -> Vec<u8> {
    let mut out = b"!pkg-latest!".to_vec();
    push_encoded(&mut out, name);
    out
}

/// `!latest-version!<name>`
pub fn latest_version_key(name: &str) -> Vec<u8> {
    let mut out = b"!latest-version!".to_vec();
    push_encoded(&mut out, name);
    out
}

/// `!index!<kind>!<dep>!<dependent>@<version>`
pub fn index_key(kind: DependencyKind, dep: &str, dependent: &str, version: &str) -> Vec<u8> {
    let mut out = Vec::new();
    out.push(SEP);
    out.extend(b"index");
    out.push(SEP);
    out.extend(kind.as_key_token().as_bytes());
    out.push(SEP);
    push_encoded(&mut out, dep);
    out.push(SEP);
    push_encoded(&mut out, dependent);
    out.push(AT);
    out.extend(version.as_bytes());
    out
}

/// `!index-latest!<kind>!<dep>!<dependent>`
pub fn index_latest_key(kind: DependencyKind, dep: &str, dependent: &str) -> Vec<u8> {
    let mut out = Vec::new();
    out.push(SEP);
    out.extend(b"index-latest");
    out.push(SEP);
    out.extend(kind.as_key_token().as_bytes());
    out.push(SEP);
    push_encoded(&mut out, dep);
    out.push(SEP);
    push_encoded(&mut out, dependent);
    out
}

/// The byte prefix shared by every per-version or latest index entry for
/// `(kind, dep)`, used to bound a forward scan (`spec.md` §4.5 step 2).
pub fn index_scan_prefix(all: bool, kind: DependencyKind, dep: &str) -> Vec<u8> {
    let mut out = Vec::new();
    out.push(SEP);
    out.extend(if all { &b"index"[..] } else { &b"index-latest"[..] });
    out.push(SEP);
    out.extend(kind.as_key_token().as_bytes());
    out.push(SEP);
    push_encoded(&mut out, dep);
    out.push(SEP);
    out
}

/// Lower/upper scan bounds for `(prefix, opts.gt)`: strictly after
/// `prefix ⧺ gt` (if a resume cursor is given, else the bare prefix),
/// through `prefix ⧺ 0xFF` (`spec.md` §4.5 step 2).
///
/// The lower bound is pushed one sentinel byte past `prefix ⧺ gt`
/// itself, not just built from it: a latest-index key for dependent
/// `gt` is exactly `prefix ⧺ encode(gt)`, which would otherwise equal
/// the lower bound and be re-included by an inclusive-lower-bound
/// scan. `0xFF` sorts after every byte a real key continues with
/// (`@` for a per-version key's version suffix, or nothing at all for
/// a latest key), so appending it excludes every entry for `gt` itself
/// — both per-version and latest — while keeping every dependent that
/// sorts after `gt`.
pub fn scan_bounds(prefix: &[u8], gt: Option<&str>) -> (Vec<u8>, Vec<u8>) {
    let mut lower = prefix.to_vec();
    if let Some(gt) = gt {
        push_encoded(&mut lower, gt);
        lower.push(0xFF);
    }
    let mut upper = prefix.to_vec();
    upper.push(0xFF);
    (lower, upper)
}

/// Splits the tail of a per-version index key (the part after the
/// dep's trailing `!`) into the decoded dependent name and its version
/// string.
pub fn split_per_version_tail(tail: &[u8]) -> Result<(String, String)> {
    let tail = std::str::from_utf8(tail)
        .map_err(|_| CoreError::InvalidVersion("non-utf8 key tail".to_string()))?;
    let (encoded_name, version) = tail
        .rsplit_once('@')
        .ok_or_else(|| CoreError::InvalidVersion(tail.to_string()))?;
    Ok((decode(encoded_name)?, version.to_string()))
}

/// Decodes the tail of a latest index key (the part after the dep's
/// trailing `!`) into the dependent name.
pub fn split_latest_tail(tail: &[u8]) -> Result<String> {
    let tail = std::str::from_utf8(tail)
        .map_err(|_| CoreError::InvalidVersion("non-utf8 key tail".to_string()))?;
    decode(tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manifest_key_roundtrips_scoped_names() {
        let key = manifest_key("@vitest/coverage-v8", "1.0.0");
        assert!(key.starts_with(b"!pkg!"));
        assert!(!key[5..].contains(&SEP));
    }

    #[test]
    fn index_key_has_no_stray_separators_in_name_fragments() {
        let key = index_key(DependencyKind::Dependency, "a!b", "c!d", "1.0.0");
        // Every literal '!' in the key must be one of exactly 3 structural
        // separators (after "index", after kind, after dep) plus the one
        // before "index" itself, none of them from the escaped names.
        let structural = key.iter().filter(|&&b| b == SEP).count();
        assert_eq!(structural, 4);
    }

    #[test]
    fn split_per_version_tail_recovers_name_and_version() {
        let key = index_key(DependencyKind::Dependency, "b", "a", "1.0.0");
        let prefix = index_scan_prefix(true, DependencyKind::Dependency, "b");
        let tail = &key[prefix.len()..];
        let (name, version) = split_per_version_tail(tail).unwrap();
        assert_eq!(name, "a");
        assert_eq!(version, "1.0.0");
    }

    #[test]
    fn split_latest_tail_recovers_scoped_name() {
        let key = index_latest_key(DependencyKind::DevDependency, "b", "@scope/pkg");
        let prefix = index_scan_prefix(false, DependencyKind::DevDependency, "b");
        let tail = &key[prefix.len()..];
        let name = split_latest_tail(tail).unwrap();
        assert_eq!(name, "@scope/pkg");
    }

    #[test]
    fn scan_bounds_upper_sorts_after_every_entry_under_prefix() {
        let prefix = index_scan_prefix(true, DependencyKind::Dependency, "b");
        let (lower, upper) = scan_bounds(&prefix, None);
        assert_eq!(lower, prefix);
        let entry = index_key(DependencyKind::Dependency, "b", "a", "1.0.0");
        assert!(entry.as_slice() < upper.as_slice());
        assert!(entry.as_slice() >= lower.as_slice());
    }

    #[test]
    fn scan_bounds_with_cursor_excludes_the_cursor_itself() {
        let prefix = index_scan_prefix(true, DependencyKind::Dependency, "b");
        let (lower, _upper) = scan_bounds(&prefix, Some("a"));
        let entry = index_key(DependencyKind::Dependency, "b", "a", "1.0.0");
        assert!(entry.as_slice() > lower.as_slice());
    }

    #[test]
    fn scan_bounds_with_cursor_excludes_an_exact_latest_key_match() {
        // A latest-index key for the cursor's own dependent has no
        // "@version" suffix at all, so it sits exactly at the unadjusted
        // lower bound; an inclusive-lower-bound scan must not re-emit it.
        let prefix = index_scan_prefix(false, DependencyKind::Dependency, "b");
        let (lower, _upper) = scan_bounds(&prefix, Some("a"));
        let entry = index_latest_key(DependencyKind::Dependency, "b", "a");
        assert!(entry.as_slice() < lower.as_slice());
    }
}
