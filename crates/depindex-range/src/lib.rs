//! Semver range parsing, packed-bound encoding, and overlap testing.
//!
//! [`comparator::parse_range`] turns a textual range expression into a
//! disjunction of comparator conjunctions. [`normalize::encode_range`]
//! encodes one for storage (lossy but always safe); [`normalize::normalize_query`]
//! encodes one for querying (exact, single-arm only).
//! [`normalize::overlap`] tests a query's bounds against a stored range.

pub mod comparator;
pub mod error;
pub mod normalize;

pub use comparator::{Comparator, Op, RangeExpr};
pub use error::{RangeError, Result};
pub use normalize::{encode_range, normalize_query, overlap, EncodedGroup, EncodedRange, QueryBounds};
