//! Translation of the term model into the native query tree.
//!
//! Translation runs in three stages: consolidate result terms into
//! clauses, expand each clause into a [`QueryNode`], then assemble the
//! clause nodes back to front so the tree nests to the right:
//! `a AND b OR c` becomes `And(a, Or(b, c))`. Connectors bind by position,
//! not precedence.

use assay_record::dates;

use crate::{
    consolidate::{self, Clause},
    error::QueryError,
    field::{Field, FieldKind},
    node::{CompareOp, QueryNode, StringPattern},
    query::Query,
    term::{Comparison, Connector, Term, Value},
};

/// Translates a query into its native tree. An empty query matches all
/// documents.
pub(crate) fn translate(query: &Query) -> Result<QueryNode, QueryError> {
    if query.is_empty() {
        return Ok(QueryNode::MatchAll);
    }

    let consolidated = consolidate::consolidate(query);
    let mut nodes = consolidated
        .clauses
        .iter()
        .map(clause_node)
        .collect::<Result<Vec<_>, _>>()?;

    // Assemble back to front: the running tree always becomes the second
    // child, producing a right-nested binary tree.
    let mut tree = nodes
        .pop()
        .ok_or(QueryError::Internal("consolidation produced no clauses"))?;
    while let Some(node) = nodes.pop() {
        tree = match consolidated.connectors[nodes.len()] {
            Connector::And => QueryNode::And(vec![node, tree]),
            Connector::Or => QueryNode::Or(vec![node, tree]),
        };
    }
    Ok(tree)
}

/// Translates one consolidated clause.
fn clause_node(clause: &Clause<'_>) -> Result<QueryNode, QueryError> {
    match clause {
        Clause::Results(members) => Ok(QueryNode::Results(crate::expand::expand_group(members)?)),
        Clause::Plain(term) => plain_node(term),
    }
}

/// Translates a single non-result term.
fn plain_node(term: &Term) -> Result<QueryNode, QueryError> {
    match term.field.kind() {
        FieldKind::Text => match &term.value {
            Value::Str(search) if search.is_empty() => Ok(QueryNode::MatchAll),
            Value::Str(search) => Ok(QueryNode::Text {
                search: search.clone(),
            }),
            _ => Err(QueryError::Internal("non-string value on the all field")),
        },
        FieldKind::String => string_node(term),
        FieldKind::Date => date_node(term),
        // The only numeric field lives in the results array, which
        // consolidation always routes into a results clause.
        FieldKind::Numeric => Err(QueryError::Internal("numeric term outside a result group")),
    }
}

/// Translates a plain string term; list values fan out into one match per
/// alternative.
fn string_node(term: &Term) -> Result<QueryNode, QueryError> {
    match &term.value {
        Value::Str(text) => Ok(QueryNode::Match {
            field: term.field,
            pattern: pattern(term.comparison, text)?,
        }),
        Value::List(items) => {
            let matches = items
                .iter()
                .map(|item| {
                    Ok(QueryNode::Match {
                        field: term.field,
                        pattern: pattern(term.comparison, item)?,
                    })
                })
                .collect::<Result<Vec<_>, QueryError>>()?;
            // "none of the alternatives" conjoins; "any of them" disjoins.
            Ok(match term.comparison {
                Comparison::NotContains => QueryNode::And(matches),
                _ => QueryNode::Or(matches),
            })
        }
        Value::Num(_) => Err(QueryError::Internal("numeric value on a string field")),
    }
}

/// Translates a date term, parsing the raw value it was admitted with.
fn date_node(term: &Term) -> Result<QueryNode, QueryError> {
    let Value::Str(text) = &term.value else {
        return Err(QueryError::Internal("non-string value on a date field"));
    };
    let date = dates::parse_date(text)
        .ok_or(QueryError::Internal("unparseable date survived validation"))?;
    Ok(QueryNode::CompareDate {
        field: term.field,
        op: compare_op(term.comparison)?,
        date,
    })
}

/// Converts an ordering comparison to its tree operator.
fn compare_op(comparison: Comparison) -> Result<CompareOp, QueryError> {
    match comparison {
        Comparison::Eq => Ok(CompareOp::Eq),
        Comparison::Lt => Ok(CompareOp::Lt),
        Comparison::Lte => Ok(CompareOp::Lte),
        Comparison::Gt => Ok(CompareOp::Gt),
        Comparison::Gte => Ok(CompareOp::Gte),
        Comparison::Contains | Comparison::NotContains => {
            Err(QueryError::Internal("substring comparison on ordered field"))
        }
    }
}

/// Converts a string comparison and text into a pattern.
fn pattern(comparison: Comparison, text: &str) -> Result<StringPattern, QueryError> {
    match comparison {
        Comparison::Eq => Ok(StringPattern::Equals(text.to_string())),
        Comparison::Contains => Ok(StringPattern::Contains(text.to_string())),
        Comparison::NotContains => Ok(StringPattern::NotContains(text.to_string())),
        _ => Err(QueryError::Internal("ordering comparison on string field")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    use assay_record::ResultVariant;

    #[test]
    fn empty_query_matches_all() {
        assert_eq!(Query::new().translate().unwrap(), QueryNode::MatchAll);
    }

    #[test]
    fn empty_all_term_matches_all() {
        let query = Query::parse("all contains ").unwrap();
        assert_eq!(query.translate().unwrap(), QueryNode::MatchAll);
    }

    #[test]
    fn all_term_becomes_text_search() {
        let query = Query::parse("all contains copper shield").unwrap();
        assert_eq!(
            query.translate().unwrap(),
            QueryNode::Text {
                search: "copper shield".to_string()
            }
        );
    }

    #[test]
    fn single_string_term() {
        let query = Query::parse("grouping contains majorana").unwrap();
        assert_eq!(
            query.translate().unwrap(),
            QueryNode::Match {
                field: Field::Grouping,
                pattern: StringPattern::Contains("majorana".to_string()),
            }
        );
    }

    #[test]
    fn trees_nest_to_the_right() {
        let query = Query::parse(
            "grouping contains one\nAND\nsample.name contains two\nOR\nsample.description contains three",
        )
        .unwrap();
        let one = QueryNode::Match {
            field: Field::Grouping,
            pattern: StringPattern::Contains("one".to_string()),
        };
        let two = QueryNode::Match {
            field: Field::SampleName,
            pattern: StringPattern::Contains("two".to_string()),
        };
        let three = QueryNode::Match {
            field: Field::SampleDescription,
            pattern: StringPattern::Contains("three".to_string()),
        };
        assert_eq!(
            query.translate().unwrap(),
            QueryNode::And(vec![one, QueryNode::Or(vec![two, three])]),
        );
    }

    #[test]
    fn synonym_list_fans_out_as_or() {
        let mut query = Query::new();
        query
            .append(Field::Grouping, Comparison::Contains, "Cu".into(), None, true)
            .unwrap();
        match query.translate().unwrap() {
            QueryNode::Or(children) => {
                assert!(children.len() >= 2);
                assert!(children.iter().all(|child| matches!(
                    child,
                    QueryNode::Match {
                        field: Field::Grouping,
                        pattern: StringPattern::Contains(_),
                    }
                )));
            }
            other => panic!("expected or of matches, got {other:?}"),
        }
    }

    #[test]
    fn notcontains_list_fans_out_as_and() {
        let mut query = Query::new();
        query
            .append(
                Field::SampleName,
                Comparison::NotContains,
                vec!["lead".to_string(), "Pb".to_string()].into(),
                None,
                false,
            )
            .unwrap();
        match query.translate().unwrap() {
            QueryNode::And(children) => assert_eq!(children.len(), 2),
            other => panic!("expected and of matches, got {other:?}"),
        }
    }

    #[test]
    fn date_term_parses_its_value() {
        let query = Query::parse("measurement.date is greater than or equal to 2019/01/01")
            .unwrap();
        assert_eq!(
            query.translate().unwrap(),
            QueryNode::CompareDate {
                field: Field::MeasurementDate,
                op: CompareOp::Gte,
                date: NaiveDate::from_ymd_opt(2019, 1, 1).unwrap(),
            }
        );
    }

    #[test]
    fn result_terms_consolidate_into_element_match() {
        let query = Query::parse(
            "measurement.results.value is less than 10\nAND\nmeasurement.results.value is greater than or equal to 5",
        )
        .unwrap();
        match query.translate().unwrap() {
            QueryNode::Results(bodies) => {
                let variants: Vec<_> = bodies.iter().map(|b| b.variant).collect();
                assert_eq!(variants, vec![ResultVariant::Measurement, ResultVariant::Range]);
                assert!(bodies.iter().all(|b| b.values.len() == 2));
            }
            other => panic!("expected results node, got {other:?}"),
        }
    }

    #[test]
    fn or_separated_result_terms_stay_separate() {
        let query = Query::parse(
            "measurement.results.isotope equals U-238\nOR\nmeasurement.results.isotope equals Th-232",
        )
        .unwrap();
        match query.translate().unwrap() {
            QueryNode::Or(children) => {
                assert_eq!(children.len(), 2);
                assert!(children.iter().all(|c| matches!(c, QueryNode::Results(_))));
            }
            other => panic!("expected or of results nodes, got {other:?}"),
        }
    }

    #[test]
    fn mixed_query_places_group_at_first_result_term() {
        let query = Query::parse(
            "grouping contains one\nOR\nsample.name contains two\nAND\nmeasurement.results.isotope equals K-40\nAND\nmeasurement.results.unit equals ppm",
        )
        .unwrap();
        match query.translate().unwrap() {
            QueryNode::Or(top) => {
                assert_eq!(top.len(), 2);
                match &top[1] {
                    QueryNode::And(inner) => {
                        assert!(matches!(inner[0], QueryNode::Match { .. }));
                        assert!(matches!(inner[1], QueryNode::Results(_)));
                    }
                    other => panic!("expected and, got {other:?}"),
                }
            }
            other => panic!("expected or at the root, got {other:?}"),
        }
    }

    #[test]
    fn bad_type_pin_surfaces_from_translation() {
        let query =
            Query::parse("measurement.results.type equals average").unwrap();
        assert_eq!(
            query.translate().unwrap_err(),
            QueryError::UnknownResultType("average".to_string()),
        );
    }
}
