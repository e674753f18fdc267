//! The term model: an ordered term list with AND/OR sequencing.

use serde::Serialize;

use crate::{
    codec,
    error::QueryError,
    field::{Field, FieldKind},
    node::QueryNode,
    synonyms::SynonymTable,
    term::{Comparison, Connector, Term, Value},
    translate, validate,
};

/// A query under construction: an ordered list of validated terms and the
/// connectors between them.
///
/// The connector at index `i` joins `terms[i]` and `terms[i + 1]`, so a
/// non-empty query always holds exactly one fewer connector than terms.
/// Terms only enter through [`append`](Self::append), which validates
/// before mutating; a failed append leaves the query untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Query {
    /// The admitted terms, in entry order.
    terms: Vec<Term>,
    /// The connectors between adjacent terms.
    connectors: Vec<Connector>,
}

impl Query {
    /// Creates an empty query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a human query string.
    ///
    /// Synonym expansion is not applied: a serialized query re-parses to
    /// the same term model instead of expanding further on every
    /// round-trip.
    pub fn parse(text: &str) -> Result<Self, QueryError> {
        codec::parse(text)
    }

    /// The admitted terms.
    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    /// The connectors between adjacent terms.
    pub fn connectors(&self) -> &[Connector] {
        &self.connectors
    }

    /// Whether the query holds no terms yet.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Validates and appends a term, expanding synonyms from the built-in
    /// table when `include_synonyms` is set.
    ///
    /// The first term takes no connector; every later term requires one.
    pub fn append(
        &mut self,
        field: Field,
        comparison: Comparison,
        value: Value,
        connector: Option<Connector>,
        include_synonyms: bool,
    ) -> Result<(), QueryError> {
        let table = include_synonyms.then(SynonymTable::builtin);
        self.append_with(field, comparison, value, connector, table)
    }

    /// Like [`append`](Self::append), with an explicit synonym table (or
    /// none).
    pub fn append_with(
        &mut self,
        field: Field,
        comparison: Comparison,
        value: Value,
        connector: Option<Connector>,
        synonyms: Option<&SynonymTable>,
    ) -> Result<(), QueryError> {
        validate::validate_append(self, field, comparison, &value, connector)?;

        // Synonyms only apply to scalar values of plain string fields:
        // expanding inside a measurement-result group is not representable
        // as a single element match, and the `all` field searches tokens
        // individually already.
        let value = match (&value, synonyms) {
            (Value::Str(text), Some(table))
                if field.kind() == FieldKind::String && !field.is_result() =>
            {
                match table.lookup(text) {
                    Some(group) => Value::List(group.to_vec()),
                    None => value,
                }
            }
            _ => value,
        };

        if field == Field::All {
            self.append_all(value, connector);
        } else {
            self.terms.push(Term {
                field,
                comparison,
                value,
            });
            if let Some(connector) = connector {
                self.connectors.push(connector);
            }
        }
        Ok(())
    }

    /// Appends an `all` term, merging into an existing one if present.
    ///
    /// The full-text index searches space-separated tokens individually, so
    /// the value is stored as a single space-joined string and a second
    /// `all` term extends it rather than appearing separately.
    fn append_all(&mut self, value: Value, connector: Option<Connector>) {
        let text = match value {
            Value::Str(text) => text,
            Value::List(tokens) => tokens.join(" "),
            // Ruled out by validation; the text index stores strings.
            Value::Num(number) => number.to_string(),
        };

        if let Some(existing) = self.terms.iter_mut().find(|t| t.field == Field::All) {
            if let Value::Str(joined) = &mut existing.value {
                joined.push(' ');
                joined.push_str(&text);
            }
            // The connector is dropped: no new term was added.
        } else {
            self.terms.push(Term {
                field: Field::All,
                comparison: Comparison::Contains,
                value: Value::Str(text),
            });
            if let Some(connector) = connector {
                self.connectors.push(connector);
            }
        }
    }

    /// Serializes the query back to its human string form.
    pub fn to_human_string(&self) -> String {
        codec::serialize(self)
    }

    /// Translates the query into the native query tree.
    ///
    /// An empty query translates to a match-all node.
    pub fn translate(&self) -> Result<QueryNode, QueryError> {
        translate::translate(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::ResultField;

    #[test]
    fn append_maintains_connector_arity() {
        let mut query = Query::new();
        query
            .append(Field::Grouping, Comparison::Contains, "one".into(), None, false)
            .unwrap();
        query
            .append(
                Field::SampleName,
                Comparison::Eq,
                "two".into(),
                Some(Connector::Or),
                false,
            )
            .unwrap();
        assert_eq!(query.terms().len(), 2);
        assert_eq!(query.connectors(), &[Connector::Or]);
    }

    #[test]
    fn first_term_rejects_connector() {
        let mut query = Query::new();
        let err = query
            .append(
                Field::Grouping,
                Comparison::Contains,
                "x".into(),
                Some(Connector::And),
                false,
            )
            .unwrap_err();
        assert_eq!(err, QueryError::UnexpectedConnector);
        assert!(query.is_empty());
    }

    #[test]
    fn later_term_requires_connector() {
        let mut query = Query::new();
        query
            .append(Field::Grouping, Comparison::Contains, "x".into(), None, false)
            .unwrap();
        let err = query
            .append(Field::SampleName, Comparison::Eq, "y".into(), None, false)
            .unwrap_err();
        assert_eq!(err, QueryError::ConnectorRequired);
        assert_eq!(query.terms().len(), 1);
    }

    #[test]
    fn failed_append_leaves_query_untouched() {
        let mut query = Query::new();
        query
            .append(Field::Grouping, Comparison::Contains, "x".into(), None, false)
            .unwrap();
        let before = query.clone();
        let _ = query
            .append(
                Field::Grouping,
                Comparison::Lt,
                "y".into(),
                Some(Connector::And),
                false,
            )
            .unwrap_err();
        assert_eq!(query, before);
    }

    #[test]
    fn synonym_expansion_replaces_scalar_with_group() {
        let mut query = Query::new();
        query
            .append(Field::Grouping, Comparison::Contains, "Cu".into(), None, true)
            .unwrap();
        match &query.terms()[0].value {
            Value::List(group) => assert!(group.contains(&"copper".to_string())),
            other => panic!("expected expanded list, got {other:?}"),
        }
    }

    #[test]
    fn synonym_expansion_skipped_on_result_fields() {
        let mut query = Query::new();
        query
            .append(
                Field::Result(ResultField::Unit),
                Comparison::Eq,
                "ppm".into(),
                None,
                true,
            )
            .unwrap();
        assert_eq!(query.terms()[0].value, Value::Str("ppm".to_string()));
    }

    #[test]
    fn all_terms_merge() {
        let mut query = Query::new();
        query
            .append(Field::All, Comparison::Contains, "copper".into(), None, false)
            .unwrap();
        query
            .append(
                Field::All,
                Comparison::Contains,
                "shield".into(),
                Some(Connector::And),
                false,
            )
            .unwrap();
        assert_eq!(query.terms().len(), 1);
        assert_eq!(query.terms()[0].value, Value::Str("copper shield".to_string()));
        assert!(query.connectors().is_empty());
    }

    #[test]
    fn all_list_value_space_joined() {
        let mut query = Query::new();
        query
            .append(
                Field::All,
                Comparison::Contains,
                vec!["a".to_string(), "b".to_string()].into(),
                None,
                false,
            )
            .unwrap();
        assert_eq!(query.terms()[0].value, Value::Str("a b".to_string()));
    }
}
