//! Error types for query parsing, validation, and translation.

use thiserror::Error;

use crate::field::Field;
use crate::term::Comparison;

/// A problem with a single line of a human query string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    /// A term line has no space after the field name.
    #[error("expected '<field> <comparison> <value>'")]
    MissingComparison,

    /// The field token is not in the field registry.
    #[error("'{0}' is not a queryable field")]
    UnknownField(String),

    /// The text after the field name matches no comparison phrase.
    #[error("unrecognized comparison phrase in '{0}'")]
    UnknownComparison(String),

    /// A numeric field value failed to parse as a number.
    #[error("'{0}' is not a number")]
    InvalidNumber(String),
}

/// Errors produced by the query engine.
///
/// Everything except [`Internal`](Self::Internal) is a user input problem:
/// the offending term is never admitted and the query stays in its
/// last-good state, so the caller can correct the input and retry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QueryError {
    /// A line of a human query string could not be parsed.
    #[error("line {line}: {kind}")]
    Parse {
        /// 1-based line number within the query string.
        line: usize,
        /// What was wrong with the line.
        kind: ParseErrorKind,
    },

    /// The comparison operator is not legal for the field's kind.
    #[error("'{}' is not a valid comparison for {} field '{field}'", comparison.human_phrase(), field.kind())]
    InvalidComparison {
        /// The rejected comparison.
        comparison: Comparison,
        /// The field it was applied to.
        field: Field,
    },

    /// The value's shape does not match the field's kind.
    #[error("values for {} field '{field}' must be {expected}", field.kind())]
    InvalidValue {
        /// The field being compared.
        field: Field,
        /// Description of the accepted value shape.
        expected: &'static str,
    },

    /// A date field value matched none of the accepted date formats.
    #[error("'{0}' is not in an accepted date format (e.g. 2020-01-31 or 01/31/2020)")]
    InvalidDate(String),

    /// Alternative value lists are not representable inside a single
    /// measurement-result element match.
    #[error("field '{0}' does not accept a list of alternatives")]
    ListNotSupported(Field),

    /// A second or later term was appended without an AND/OR connector.
    #[error("a connector (AND/OR) is required between query terms")]
    ConnectorRequired,

    /// The first term of a query was given a connector.
    #[error("the first term of a query takes no connector")]
    UnexpectedConnector,

    /// A match-all (`all contains ""`) term can only stand alone.
    #[error("a term searching for all documents must be the only term in the query")]
    MatchAllExclusive,

    /// A result sub-field other than `value` appeared twice in one
    /// AND-connected group; the element-match body can only hold one
    /// pattern per sub-field.
    #[error("'{0}' may only be constrained once per AND-connected group")]
    DuplicateResultTerm(Field),

    /// A `measurement.results.type` term named something other than
    /// `measurement`, `range`, or `limit`.
    #[error("'{0}' is not a measurement result type (expected measurement, range, or limit)")]
    UnknownResultType(String),

    /// Invariant violation inside the translator. Not a user input error.
    #[error("internal query translation error: {0}")]
    Internal(&'static str),
}
