//! Term validation.
//!
//! Every term goes through [`validate_append`] before entering a query.
//! Checks run in a fixed order and the first failure wins: connector
//! arity, comparison legality for the field's kind, value shape, then the
//! cross-term rules (one pattern per result sub-field per AND group,
//! match-all exclusivity). Validation is pure; the caller decides whether
//! to append.

use assay_record::dates;

use crate::{
    error::QueryError,
    field::{Field, FieldKind, ResultField},
    query::Query,
    term::{Comparison, Connector, Value},
};

/// Validates a prospective append against the query's current state.
pub(crate) fn validate_append(
    query: &Query,
    field: Field,
    comparison: Comparison,
    value: &Value,
    connector: Option<Connector>,
) -> Result<(), QueryError> {
    // 1. Connector arity: none for the first term, required afterwards.
    if query.is_empty() {
        if connector.is_some() {
            return Err(QueryError::UnexpectedConnector);
        }
    } else if connector.is_none() {
        return Err(QueryError::ConnectorRequired);
    }

    // 2. Comparison legality for the field's kind.
    if !field.legal_comparisons().contains(&comparison) {
        return Err(QueryError::InvalidComparison { comparison, field });
    }

    // 3. Value shape.
    match field.kind() {
        FieldKind::Text | FieldKind::String => match value {
            Value::Str(_) => {}
            Value::List(_) if field.is_result() => {
                return Err(QueryError::ListNotSupported(field));
            }
            Value::List(list) if list.is_empty() => {
                return Err(QueryError::InvalidValue {
                    field,
                    expected: "a string or a non-empty list of strings",
                });
            }
            Value::List(_) => {}
            Value::Num(_) => {
                return Err(QueryError::InvalidValue {
                    field,
                    expected: "a string or a list of strings",
                });
            }
        },
        FieldKind::Numeric => {
            if !matches!(value, Value::Num(_)) {
                return Err(QueryError::InvalidValue {
                    field,
                    expected: "a number",
                });
            }
        }
        FieldKind::Date => match value {
            Value::Str(text) => {
                if dates::parse_date(text).is_none() {
                    return Err(QueryError::InvalidDate(text.clone()));
                }
            }
            _ => {
                return Err(QueryError::InvalidValue {
                    field,
                    expected: "a date string",
                });
            }
        },
    }

    // 4. A result sub-field other than `value` may appear only once per
    // AND-connected group: the element-match body holds one pattern per
    // sub-field, so a second term would silently replace the first.
    // Value terms are exempt; their constraints merge per slot.
    if let Field::Result(sub) = field
        && sub != ResultField::Value
        && connector == Some(Connector::And)
    {
        let terms = query.terms();
        let connectors = query.connectors();
        let mut i = terms.len();
        while i > 0 {
            i -= 1;
            if terms[i].field == field {
                return Err(QueryError::DuplicateResultTerm(field));
            }
            if i > 0 && connectors[i - 1] == Connector::Or {
                break;
            }
        }
    }

    // 5. Match-all exclusivity: an `all` term with an empty value stands
    // for "every document" and cannot be combined with anything.
    let has_match_all = query
        .terms()
        .iter()
        .any(|term| term.field == Field::All && term.value.is_empty_str());
    if has_match_all {
        return Err(QueryError::MatchAllExclusive);
    }
    if field == Field::All && value.is_empty_str() && !query.is_empty() {
        return Err(QueryError::MatchAllExclusive);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::Number;

    fn check(
        field: Field,
        comparison: Comparison,
        value: Value,
    ) -> Result<(), QueryError> {
        validate_append(&Query::new(), field, comparison, &value, None)
    }

    #[test]
    fn comparison_legality_is_total() {
        for field in Field::ALL {
            let legal = field.legal_comparisons();
            for comparison in [
                Comparison::Eq,
                Comparison::Contains,
                Comparison::NotContains,
                Comparison::Lt,
                Comparison::Lte,
                Comparison::Gt,
                Comparison::Gte,
            ] {
                let value = match field.kind() {
                    FieldKind::Numeric => Value::Num(Number::Int(1)),
                    FieldKind::Date => Value::Str("2020-01-01".to_string()),
                    _ => Value::Str("x".to_string()),
                };
                let result = check(field, comparison, value);
                if legal.contains(&comparison) {
                    assert!(result.is_ok(), "{field} should accept {comparison:?}");
                } else {
                    assert_eq!(
                        result.unwrap_err(),
                        QueryError::InvalidComparison { comparison, field },
                    );
                }
            }
        }
    }

    #[test]
    fn numeric_field_rejects_strings() {
        use crate::field::ResultField;
        let err = check(
            Field::Result(ResultField::Value),
            Comparison::Lt,
            Value::Str("10".to_string()),
        )
        .unwrap_err();
        assert!(matches!(err, QueryError::InvalidValue { .. }));
    }

    #[test]
    fn string_field_rejects_numbers() {
        let err = check(Field::Grouping, Comparison::Eq, Value::Num(Number::Int(3)))
            .unwrap_err();
        assert!(matches!(err, QueryError::InvalidValue { .. }));
    }

    #[test]
    fn date_field_requires_parseable_string() {
        assert!(check(Field::MeasurementDate, Comparison::Lt, "2020-01-31".into()).is_ok());
        assert_eq!(
            check(Field::MeasurementDate, Comparison::Lt, "someday".into()).unwrap_err(),
            QueryError::InvalidDate("someday".to_string()),
        );
    }

    #[test]
    fn result_fields_reject_lists() {
        use crate::field::ResultField;
        let err = check(
            Field::Result(ResultField::Isotope),
            Comparison::Eq,
            vec!["K-40".to_string(), "U-238".to_string()].into(),
        )
        .unwrap_err();
        assert_eq!(err, QueryError::ListNotSupported(Field::Result(ResultField::Isotope)));
    }

    #[test]
    fn empty_list_rejected() {
        let err = check(Field::Grouping, Comparison::Eq, Value::List(vec![])).unwrap_err();
        assert!(matches!(err, QueryError::InvalidValue { .. }));
    }

    #[test]
    fn duplicate_result_subfield_in_and_group_rejected() {
        let mut query = Query::new();
        query
            .append(
                Field::Result(ResultField::Isotope),
                Comparison::Eq,
                "U-238".into(),
                None,
                false,
            )
            .unwrap();
        let err = validate_append(
            &query,
            Field::Result(ResultField::Isotope),
            Comparison::Eq,
            &"Th-232".into(),
            Some(Connector::And),
        )
        .unwrap_err();
        assert_eq!(
            err,
            QueryError::DuplicateResultTerm(Field::Result(ResultField::Isotope)),
        );
    }

    #[test]
    fn duplicate_result_subfield_allowed_across_or() {
        let mut query = Query::new();
        query
            .append(
                Field::Result(ResultField::Isotope),
                Comparison::Eq,
                "U-238".into(),
                None,
                false,
            )
            .unwrap();
        assert!(
            validate_append(
                &query,
                Field::Result(ResultField::Isotope),
                Comparison::Eq,
                &"Th-232".into(),
                Some(Connector::Or),
            )
            .is_ok()
        );
    }

    #[test]
    fn duplicate_detection_spans_intervening_plain_terms() {
        let mut query = Query::new();
        query
            .append(
                Field::Result(ResultField::Unit),
                Comparison::Eq,
                "ppm".into(),
                None,
                false,
            )
            .unwrap();
        query
            .append(
                Field::Grouping,
                Comparison::Contains,
                "x".into(),
                Some(Connector::And),
                false,
            )
            .unwrap();
        let err = validate_append(
            &query,
            Field::Result(ResultField::Unit),
            Comparison::Eq,
            &"ppb".into(),
            Some(Connector::And),
        )
        .unwrap_err();
        assert_eq!(
            err,
            QueryError::DuplicateResultTerm(Field::Result(ResultField::Unit)),
        );
    }

    #[test]
    fn repeated_value_constraints_still_combine() {
        let mut query = Query::new();
        query
            .append(
                Field::Result(ResultField::Value),
                Comparison::Lt,
                10i64.into(),
                None,
                false,
            )
            .unwrap();
        assert!(
            validate_append(
                &query,
                Field::Result(ResultField::Value),
                Comparison::Gte,
                &5i64.into(),
                Some(Connector::And),
            )
            .is_ok()
        );
    }

    #[test]
    fn nothing_may_follow_match_all() {
        let mut query = Query::new();
        query
            .append(Field::All, Comparison::Contains, "".into(), None, false)
            .unwrap();
        let err = validate_append(
            &query,
            Field::Grouping,
            Comparison::Contains,
            &"x".into(),
            Some(Connector::And),
        )
        .unwrap_err();
        assert_eq!(err, QueryError::MatchAllExclusive);
    }

    #[test]
    fn match_all_may_not_follow_anything() {
        let mut query = Query::new();
        query
            .append(Field::Grouping, Comparison::Contains, "x".into(), None, false)
            .unwrap();
        let err = validate_append(
            &query,
            Field::All,
            Comparison::Contains,
            &"".into(),
            Some(Connector::Or),
        )
        .unwrap_err();
        assert_eq!(err, QueryError::MatchAllExclusive);
    }

    #[test]
    fn nonempty_all_may_combine() {
        let mut query = Query::new();
        query
            .append(Field::All, Comparison::Contains, "copper".into(), None, false)
            .unwrap();
        assert!(
            validate_append(
                &query,
                Field::Grouping,
                Comparison::Contains,
                &"x".into(),
                Some(Connector::And),
            )
            .is_ok()
        );
    }
}
