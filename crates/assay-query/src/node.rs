//! The native query tree produced by translation.
//!
//! [`QueryNode`] is the engine's output boundary: a nested boolean tree of
//! typed predicates, free of any store-specific syntax. String comparisons
//! are tagged patterns, not compiled matchers; the store access layer is
//! responsible for compiling the tree into whatever wire form its backend
//! expects.

use chrono::NaiveDate;
use serde::Serialize;

use assay_record::ResultVariant;

use crate::{
    field::{Field, ResultField},
    term::Number,
};

/// An ordering/equality operator on numbers or dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CompareOp {
    /// Equal.
    Eq,
    /// Less than.
    Lt,
    /// Less than or equal.
    Lte,
    /// Greater than.
    Gt,
    /// Greater than or equal.
    Gte,
}

impl CompareOp {
    /// Short operator name (`eq`, `lt`, ...), as used in wire formats.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Eq => "eq",
            Self::Lt => "lt",
            Self::Lte => "lte",
            Self::Gt => "gt",
            Self::Gte => "gte",
        }
    }
}

/// A string predicate, case-insensitive in all three forms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum StringPattern {
    /// The whole field equals the text.
    Equals(String),
    /// The field contains the text.
    Contains(String),
    /// The field does not equal the text.
    NotContains(String),
}

/// Which entry of a result's value array a constraint targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ValueSlot {
    /// `value.0`: the central value, lower bound, or limit.
    Primary,
    /// `value.1`: the range upper bound.
    Secondary,
}

impl ValueSlot {
    /// The dotted path of this slot within a result entry.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Primary => "value.0",
            Self::Secondary => "value.1",
        }
    }
}

/// One numeric constraint on a result entry's value array.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ValueConstraint {
    /// Which value entry is compared.
    pub slot: ValueSlot,
    /// The comparison operator.
    pub op: CompareOp,
    /// The value compared against.
    pub value: Number,
}

/// The element-match body for one measurement variant.
///
/// A result entry satisfies the predicate when its `type` equals
/// `variant`, every string pattern matches, and every value constraint
/// holds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultPredicate {
    /// The variant this body targets.
    pub variant: ResultVariant,
    /// Predicates on the isotope/unit sub-fields.
    pub fields: Vec<(ResultField, StringPattern)>,
    /// Constraints on the value array, already mapped per variant.
    pub values: Vec<ValueConstraint>,
}

/// A node of the translated query tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum QueryNode {
    /// Matches every document.
    MatchAll,

    /// Full-text search over the store's text index.
    Text {
        /// Space-separated search tokens.
        search: String,
    },

    /// String pattern match on a single field.
    Match {
        /// The field compared.
        field: Field,
        /// The pattern it must (or must not) match.
        pattern: StringPattern,
    },

    /// Numeric comparison on a single field.
    Compare {
        /// The field compared.
        field: Field,
        /// The comparison operator.
        op: CompareOp,
        /// The value compared against.
        value: Number,
    },

    /// Date comparison against the first entry of a date-array field.
    CompareDate {
        /// The date field compared.
        field: Field,
        /// The comparison operator.
        op: CompareOp,
        /// The parsed date value.
        date: NaiveDate,
    },

    /// Element match against the `measurement.results` array: at least one
    /// entry must satisfy one of the per-variant bodies.
    Results(Vec<ResultPredicate>),

    /// All children must match.
    And(Vec<QueryNode>),

    /// At least one child must match.
    Or(Vec<QueryNode>),
}
