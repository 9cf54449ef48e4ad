//! Parses a textual range expression into a disjunction of conjunctions
//! of comparators (`spec.md` §4.2's input shape).
//!
//! This is a small, purpose-built parser rather than a wrapper around a
//! full npm-semver-range library: the rest of the pipeline needs direct
//! access to each comparator's operator and version, which an opaque
//! "does this version satisfy" range type doesn't expose.

use crate::error::{RangeError, Result};
use depindex_core::VersionTriple;

/// A comparator's operator. `Unset` represents the empty/`*`/`x`
/// wildcard — "matches everything" (`spec.md` §4.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Unset,
    Eq,
    Lt,
    Le,
    Gt,
    Ge,
}

impl Op {
    pub const fn is_lower(self) -> bool {
        matches!(self, Self::Gt | Self::Ge)
    }

    pub const fn is_upper(self) -> bool {
        matches!(self, Self::Lt | Self::Le)
    }
}

/// An (operator, version) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Comparator {
    pub op: Op,
    pub version: VersionTriple,
}

impl Comparator {
    const fn unset() -> Self {
        Self {
            op: Op::Unset,
            version: VersionTriple::new(0, 0, 0),
        }
    }
}

/// A conjunction (AND) of comparators.
pub type Conjunction = Vec<Comparator>;

/// A disjunction (OR) of conjunctions — the full parse of a range
/// expression.
pub type RangeExpr = Vec<Conjunction>;

/// A version with only its leading components specified, as it appears
/// inside caret/tilde/hyphen/bare range forms (`"1"`, `"1.2"`,
/// `"1.2.3"`, `"1.2.x"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Partial {
    Major(u64),
    MajorMinor(u64, u64),
    Full(u64, u64, u64),
}

fn parse_partial(token: &str) -> Result<Partial> {
    let core = token
        .split(['-', '+'])
        .next()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| RangeError::Unparseable(token.to_string()))?;

    let parts: Vec<&str> = core.split('.').collect();
    let parse_num = |s: &str| -> Result<u64> {
        s.parse::<u64>()
            .map_err(|_| RangeError::Unparseable(token.to_string()))
    };
    let is_wild = |s: &str| matches!(s, "x" | "X" | "*");

    if parts.is_empty() || is_wild(parts[0]) {
        return Ok(Partial::Major(0));
    }
    let major = parse_num(parts[0])?;
    if parts.len() < 2 || is_wild(parts[1]) {
        return Ok(Partial::Major(major));
    }
    let minor = parse_num(parts[1])?;
    if parts.len() < 3 || is_wild(parts[2]) {
        return Ok(Partial::MajorMinor(major, minor));
    }
    let patch = parse_num(parts[2])?;
    Ok(Partial::Full(major, minor, patch))
}

const fn partial_floor(p: Partial) -> VersionTriple {
    match p {
        Partial::Full(ma, mi, pa) => VersionTriple::new(ma, mi, pa),
        Partial::MajorMinor(ma, mi) => VersionTriple::new(ma, mi, 0),
        Partial::Major(ma) => VersionTriple::new(ma, 0, 0),
    }
}

fn bare_range(p: Partial) -> Conjunction {
    match p {
        Partial::Full(ma, mi, pa) => vec![Comparator {
            op: Op::Eq,
            version: VersionTriple::new(ma, mi, pa),
        }],
        Partial::MajorMinor(ma, mi) => vec![
            Comparator {
                op: Op::Ge,
                version: VersionTriple::new(ma, mi, 0),
            },
            Comparator {
                op: Op::Lt,
                version: VersionTriple::new(ma, mi + 1, 0),
            },
        ],
        Partial::Major(ma) => vec![
            Comparator {
                op: Op::Ge,
                version: VersionTriple::new(ma, 0, 0),
            },
            Comparator {
                op: Op::Lt,
                version: VersionTriple::new(ma + 1, 0, 0),
            },
        ],
    }
}

/// `^1.2.3 := >=1.2.3 <2.0.0`; `^0.2.3 := >=0.2.3 <0.3.0`;
/// `^0.0.3 := >=0.0.3 <0.0.4` — caret keeps whichever leading nonzero
/// component fixed.
fn caret_range(p: Partial) -> Conjunction {
    let (ma, mi, pa) = match p {
        Partial::Full(a, b, c) => (a, b, c),
        Partial::MajorMinor(a, b) => (a, b, 0),
        Partial::Major(a) => (a, 0, 0),
    };
    let upper = if ma > 0 {
        VersionTriple::new(ma + 1, 0, 0)
    } else if mi > 0 {
        VersionTriple::new(0, mi + 1, 0)
    } else {
        VersionTriple::new(0, 0, pa + 1)
    };
    vec![
        Comparator {
            op: Op::Ge,
            version: VersionTriple::new(ma, mi, pa),
        },
        Comparator {
            op: Op::Lt,
            version: upper,
        },
    ]
}

/// `~1.2.3 := >=1.2.3 <1.3.0`; `~1.2 := >=1.2.0 <1.3.0`;
/// `~1 := >=1.0.0 <2.0.0` — tilde allows patch-level changes if a
/// minor version is specified, otherwise minor-level changes.
fn tilde_range(p: Partial) -> Conjunction {
    let lower = partial_floor(p);
    let upper = match p {
        Partial::Major(ma) => VersionTriple::new(ma + 1, 0, 0),
        Partial::MajorMinor(ma, mi) | Partial::Full(ma, mi, _) => VersionTriple::new(ma, mi + 1, 0),
    };
    vec![
        Comparator {
            op: Op::Ge,
            version: lower,
        },
        Comparator {
            op: Op::Lt,
            version: upper,
        },
    ]
}

fn parse_hyphen(lo: &str, hi: &str) -> Result<Conjunction> {
    let lower = partial_floor(parse_partial(lo)?);
    let upper = match parse_partial(hi)? {
        Partial::Full(a, b, c) => VersionTriple::new(a, b, c).inc_patch(),
        Partial::MajorMinor(a, b) => VersionTriple::new(a, b + 1, 0),
        Partial::Major(a) => VersionTriple::new(a + 1, 0, 0),
    };
    Ok(vec![
        Comparator {
            op: Op::Ge,
            version: lower,
        },
        Comparator {
            op: Op::Lt,
            version: upper,
        },
    ])
}

/// Splits `"1.2.3 - 2.3.4"` into its two sides, if `input` is a hyphen
/// range. Requires surrounding whitespace around the hyphen so that a
/// prerelease tag like `1.2.3-alpha` is never mistaken for one.
fn split_hyphen(input: &str) -> Option<(&str, &str)> {
    input.split_once(" - ")
}

fn parse_single(token: &str) -> Result<Conjunction> {
    if let Some(rest) = token.strip_prefix('^') {
        return Ok(caret_range(parse_partial(rest)?));
    }
    if let Some(rest) = token.strip_prefix('~') {
        return Ok(tilde_range(parse_partial(rest)?));
    }
    for (prefix, op) in [
        (">=", Op::Ge),
        ("<=", Op::Le),
        (">", Op::Gt),
        ("<", Op::Lt),
        ("=", Op::Eq),
    ] {
        if let Some(rest) = token.strip_prefix(prefix) {
            let version = partial_floor(parse_partial(rest)?);
            return Ok(vec![Comparator { op, version }]);
        }
    }
    Ok(bare_range(parse_partial(token)?))
}

fn parse_conjunction(input: &str) -> Result<Conjunction> {
    let input = input.trim();
    if input.is_empty() || matches!(input, "*" | "x" | "X") {
        return Ok(vec![Comparator::unset()]);
    }
    if let Some((lo, hi)) = split_hyphen(input) {
        return parse_hyphen(lo.trim(), hi.trim());
    }
    let mut out = Vec::new();
    for token in input.split_whitespace() {
        out.extend(parse_single(token)?);
    }
    if out.is_empty() {
        return Err(RangeError::Unparseable(input.to_string()));
    }
    Ok(out)
}

/// Parses a range expression into a disjunction of conjunctions.
///
/// `spec.md` §4.2's input shape. The write side may preserve any number
/// of disjunction groups; the read side (`crate::normalize::normalize_query`)
/// rejects anything but exactly one.
pub fn parse_range(input: &str) -> Result<RangeExpr> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(vec![vec![Comparator::unset()]]);
    }
    input.split("||").map(parse_conjunction).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(ma: u64, mi: u64, pa: u64) -> VersionTriple {
        VersionTriple::new(ma, mi, pa)
    }

    #[test]
    fn parses_wildcard_forms() {
        for input in ["", "*", "x"] {
            let expr = parse_range(input).unwrap();
            assert_eq!(expr.len(), 1);
            assert_eq!(expr[0].len(), 1);
            assert_eq!(expr[0][0].op, Op::Unset);
        }
    }

    #[test]
    fn parses_bare_full_version_as_equality() {
        let expr = parse_range("1.2.3").unwrap();
        assert_eq!(expr, vec![vec![Comparator { op: Op::Eq, version: v(1, 2, 3) }]]);
    }

    #[test]
    fn parses_bare_partial_versions_as_ranges() {
        let expr = parse_range("1.2").unwrap();
        assert_eq!(
            expr,
            vec![vec![
                Comparator { op: Op::Ge, version: v(1, 2, 0) },
                Comparator { op: Op::Lt, version: v(1, 3, 0) },
            ]]
        );
    }

    #[test]
    fn parses_caret_ranges() {
        assert_eq!(
            parse_range("^1.2.3").unwrap()[0],
            vec![
                Comparator { op: Op::Ge, version: v(1, 2, 3) },
                Comparator { op: Op::Lt, version: v(2, 0, 0) },
            ]
        );
        assert_eq!(
            parse_range("^0.2.3").unwrap()[0],
            vec![
                Comparator { op: Op::Ge, version: v(0, 2, 3) },
                Comparator { op: Op::Lt, version: v(0, 3, 0) },
            ]
        );
        assert_eq!(
            parse_range("^0.0.3").unwrap()[0],
            vec![
                Comparator { op: Op::Ge, version: v(0, 0, 3) },
                Comparator { op: Op::Lt, version: v(0, 0, 4) },
            ]
        );
    }

    #[test]
    fn parses_tilde_ranges() {
        assert_eq!(
            parse_range("~1.2.3").unwrap()[0],
            vec![
                Comparator { op: Op::Ge, version: v(1, 2, 3) },
                Comparator { op: Op::Lt, version: v(1, 3, 0) },
            ]
        );
        assert_eq!(
            parse_range("~1").unwrap()[0],
            vec![
                Comparator { op: Op::Ge, version: v(1, 0, 0) },
                Comparator { op: Op::Lt, version: v(2, 0, 0) },
            ]
        );
    }

    #[test]
    fn parses_explicit_comparators() {
        assert_eq!(
            parse_range(">=1.2.0").unwrap()[0],
            vec![Comparator { op: Op::Ge, version: v(1, 2, 0) }]
        );
        assert_eq!(
            parse_range(">=1.2.0 <2.0.0").unwrap()[0],
            vec![
                Comparator { op: Op::Ge, version: v(1, 2, 0) },
                Comparator { op: Op::Lt, version: v(2, 0, 0) },
            ]
        );
    }

    #[test]
    fn parses_hyphen_ranges() {
        assert_eq!(
            parse_range("1.2.3 - 2.3.4").unwrap()[0],
            vec![
                Comparator { op: Op::Ge, version: v(1, 2, 3) },
                Comparator { op: Op::Lt, version: v(2, 3, 5) },
            ]
        );
        assert_eq!(
            parse_range("1.2.3 - 2.3").unwrap()[0],
            vec![
                Comparator { op: Op::Ge, version: v(1, 2, 3) },
                Comparator { op: Op::Lt, version: v(2, 4, 0) },
            ]
        );
    }

    #[test]
    fn parses_disjunctions() {
        let expr = parse_range("1.0.0 || 2.0.0").unwrap();
        assert_eq!(expr.len(), 2);
        assert_eq!(expr[0], vec![Comparator { op: Op::Eq, version: v(1, 0, 0) }]);
        assert_eq!(expr[1], vec![Comparator { op: Op::Eq, version: v(2, 0, 0) }]);
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_range("not-a-range").is_err());
        assert!(parse_range("^").is_err());
    }
}
