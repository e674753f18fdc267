//! Measurement-type expansion of a consolidated result group.
//!
//! Stored results come in three shapes (`measurement`, `range`, `limit`)
//! whose value arrays mean different things, so one numeric constraint in
//! a query expands into a different concrete constraint per shape. A
//! consolidated group therefore becomes up to three element-match bodies,
//! one per compatible variant, OR-ed together by the translator.

use assay_record::ResultVariant;

use crate::{
    error::QueryError,
    field::{Field, ResultField},
    node::{CompareOp, ResultPredicate, StringPattern, ValueConstraint, ValueSlot},
    term::{Comparison, Term, Value},
};

/// Expands a consolidated group of result terms into per-variant
/// element-match bodies.
pub(crate) fn expand_group(terms: &[&Term]) -> Result<Vec<ResultPredicate>, QueryError> {
    let mut fields = Vec::new();
    let mut value_terms = Vec::new();
    let mut pinned = None;

    for term in terms {
        match term.field {
            Field::Result(ResultField::Value) => value_terms.push(*term),
            Field::Result(ResultField::Type) => pinned = Some(parse_pin(term)?),
            Field::Result(sub @ (ResultField::Isotope | ResultField::Unit)) => {
                fields.push((sub, string_pattern(term)?));
            }
            _ => return Err(QueryError::Internal("non-result term in result group")),
        }
    }

    let variants = match pinned {
        Some(variant) => vec![variant],
        None => compatible_variants(&value_terms),
    };

    let mut bodies = Vec::with_capacity(variants.len());
    for variant in variants {
        let mut values = Vec::new();
        for term in &value_terms {
            // Constraints with no meaning for this variant are dropped: a
            // pinned variant narrows the search rather than erroring out.
            if let Some((slot, op)) = slot_op(term.comparison, variant) {
                values.push(ValueConstraint {
                    slot,
                    op,
                    value: match term.value {
                        Value::Num(number) => number,
                        _ => {
                            return Err(QueryError::Internal(
                                "non-numeric value term in result group",
                            ));
                        }
                    },
                });
            }
        }
        bodies.push(ResultPredicate {
            variant,
            fields: fields.clone(),
            values,
        });
    }
    Ok(bodies)
}

/// Parses the variant pinned by a `measurement.results.type` term.
fn parse_pin(term: &Term) -> Result<ResultVariant, QueryError> {
    match &term.value {
        Value::Str(text) => text
            .to_lowercase()
            .parse()
            .map_err(|()| QueryError::UnknownResultType(text.clone())),
        _ => Err(QueryError::Internal("non-string type term in result group")),
    }
}

/// Converts an isotope/unit term's comparison into a string pattern.
fn string_pattern(term: &Term) -> Result<StringPattern, QueryError> {
    let text = match &term.value {
        Value::Str(text) => text.clone(),
        _ => return Err(QueryError::Internal("non-string term in result group")),
    };
    match term.comparison {
        Comparison::Eq => Ok(StringPattern::Equals(text)),
        Comparison::Contains => Ok(StringPattern::Contains(text)),
        Comparison::NotContains => Ok(StringPattern::NotContains(text)),
        _ => Err(QueryError::Internal("ordering comparison on string term")),
    }
}

/// The variants compatible with a set of value comparisons.
///
/// Only the `measurement` shape has a single point value, so equality
/// pins the expansion to it; `limit` has no lower bound, so any
/// greater-than drops it.
fn compatible_variants(value_terms: &[&Term]) -> Vec<ResultVariant> {
    let comparisons: Vec<Comparison> = value_terms.iter().map(|t| t.comparison).collect();
    if comparisons.contains(&Comparison::Eq) {
        vec![ResultVariant::Measurement]
    } else if comparisons.contains(&Comparison::Gt) || comparisons.contains(&Comparison::Gte) {
        vec![ResultVariant::Measurement, ResultVariant::Range]
    } else {
        ResultVariant::ALL.to_vec()
    }
}

/// Which value slot and operator a comparison maps to for a variant.
///
/// For a `range`, "less than X" means the range reaches below X, i.e. its
/// lower bound does; the query tests the slot that decides overlap with
/// the requested side. A `limit` only carries an upper bound, so
/// equality and greater-than have no mapping.
fn slot_op(comparison: Comparison, variant: ResultVariant) -> Option<(ValueSlot, CompareOp)> {
    use CompareOp as Op;
    use ResultVariant as Rv;
    use ValueSlot::{Primary, Secondary};
    match (comparison, variant) {
        (Comparison::Eq, Rv::Measurement) => Some((Primary, Op::Eq)),
        (Comparison::Eq, _) => None,

        (Comparison::Lt, Rv::Measurement) => Some((Primary, Op::Lt)),
        (Comparison::Lt, Rv::Range) => Some((Secondary, Op::Gt)),
        (Comparison::Lt, Rv::Limit) => Some((Primary, Op::Gt)),

        (Comparison::Lte, Rv::Measurement) => Some((Primary, Op::Lte)),
        (Comparison::Lte, Rv::Range) => Some((Secondary, Op::Gte)),
        (Comparison::Lte, Rv::Limit) => Some((Primary, Op::Gte)),

        (Comparison::Gt, Rv::Measurement) => Some((Primary, Op::Gt)),
        (Comparison::Gt, Rv::Range) => Some((Primary, Op::Lt)),
        (Comparison::Gt, Rv::Limit) => None,

        (Comparison::Gte, Rv::Measurement) => Some((Primary, Op::Gte)),
        (Comparison::Gte, Rv::Range) => Some((Primary, Op::Lte)),
        (Comparison::Gte, Rv::Limit) => None,

        (Comparison::Contains | Comparison::NotContains, _) => None,
    }
}
