use thiserror::Error;

/// Errors raised while parsing a range expression or normalizing a
/// query range.
///
/// Write-side parse failures ([`Unparseable`](RangeError::Unparseable))
/// are not fatal to the caller: `spec.md` §4.4 has the Writer catch
/// them and silently drop just that one dependency. The query-shape
/// errors are fatal to a `query()` call (`spec.md` §7's
/// `InvalidQueryRange`).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RangeError {
    #[error("unparseable range expression: {0}")]
    Unparseable(String),

    #[error("query range must not contain a disjunction ('||')")]
    DisjunctiveQuery,

    #[error("query range conjunction must have at most two comparators, got {0}")]
    TooManyComparators(usize),

    #[error(
        "a two-comparator query range must be a lower bound ('>' or '>=') \
         followed by an upper bound ('<' or '<=')"
    )]
    InvalidTwoComparatorShape,
}

pub type Result<T> = std::result::Result<T, RangeError>;
