//! The human query string codec.
//!
//! A query string is a sequence of lines: either a bare connector (`AND` /
//! `OR`) or a term of the form `<field> <comparison phrase> <value>`. The
//! codec is bidirectional and round-trips: serializing a query and parsing
//! the result yields an equal term model (parsing never re-expands
//! synonyms).
//!
//! ```text
//! grouping contains one
//! OR
//! sample.name does not contain two
//! AND
//! measurement.results.value is less than 10
//! ```
//!
//! Multi-valued strings use a bracketed list syntax, `["copper", "Cu"]`,
//! which distinguishes a list from a search value that contains a comma.

use crate::{
    error::{ParseErrorKind, QueryError},
    field::Field,
    query::Query,
    term::{Comparison, Connector, Term, Value},
};

/// Parses a human query string into a term model.
///
/// Malformed lines are an error, not a silent skip: dropping a line would
/// corrupt round-trip fidelity without the caller noticing.
pub(crate) fn parse(text: &str) -> Result<Query, QueryError> {
    let mut query = Query::new();
    let mut pending: Option<Connector> = None;

    for (index, raw_line) in text.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }
        if let Ok(connector) = line.parse::<Connector>() {
            pending = Some(connector);
            continue;
        }

        let number = index + 1;
        let (field, rest) = split_field(line, number)?;
        let (comparison, value_text) = split_comparison(rest, number)?;
        let value = decode_value(field, value_text, number)?;
        query.append(field, comparison, value, pending.take(), false)?;
    }

    Ok(query)
}

/// Splits the field token (everything up to the first space) off a term
/// line.
fn split_field(line: &str, number: usize) -> Result<(Field, &str), QueryError> {
    let (token, rest) = line.split_once(' ').ok_or(QueryError::Parse {
        line: number,
        kind: ParseErrorKind::MissingComparison,
    })?;
    let field = token.parse().map_err(|kind| QueryError::Parse {
        line: number,
        kind,
    })?;
    Ok((field, rest))
}

/// Matches the leading comparison phrase of the remaining line text.
///
/// Phrases are tried in the fixed table order, most specific first, so
/// "is less than or equal to" wins over "is less than".
fn split_comparison(rest: &str, number: usize) -> Result<(Comparison, &str), QueryError> {
    for (phrase, comparison) in Comparison::HUMAN_PHRASES {
        if rest == phrase {
            return Ok((comparison, ""));
        }
        if let Some(tail) = rest.strip_prefix(phrase)
            && let Some(value_text) = tail.strip_prefix(' ')
        {
            return Ok((comparison, value_text));
        }
    }
    Err(QueryError::Parse {
        line: number,
        kind: ParseErrorKind::UnknownComparison(rest.to_string()),
    })
}

/// Decodes the value text according to the field's kind.
fn decode_value(field: Field, text: &str, number: usize) -> Result<Value, QueryError> {
    Value::parse(field.kind(), text).ok_or(QueryError::Parse {
        line: number,
        kind: ParseErrorKind::InvalidNumber(text.to_string()),
    })
}

/// Serializes a term model back to its human string form.
pub(crate) fn serialize(query: &Query) -> String {
    let mut out = String::new();
    for (i, term) in query.terms().iter().enumerate() {
        if i > 0 {
            out.push('\n');
            out.push_str(&query.connectors()[i - 1].to_string());
            out.push('\n');
        }
        out.push_str(term.field.as_str());
        out.push(' ');
        out.push_str(term.comparison.human_phrase());
        out.push(' ');
        out.push_str(&render_value(term));
    }
    out
}

/// Renders a term's value as it appears in the human string.
fn render_value(term: &Term) -> String {
    match (&term.value, term.field) {
        // The `all` value is stored space-joined; re-split so multi-token
        // searches render with the list syntax.
        (Value::Str(joined), Field::All) => {
            let tokens: Vec<String> = joined.split_whitespace().map(String::from).collect();
            render_list(&tokens)
        }
        (Value::Str(text), _) => text.clone(),
        (Value::List(items), _) => render_list(items),
        (Value::Num(number), _) => number.to_string(),
    }
}

/// Renders a string list: bare element when single, bracketed syntax when
/// multiple, empty when empty.
fn render_list(items: &[String]) -> String {
    match items {
        [] => String::new(),
        [only] => only.clone(),
        _ => format!("[\"{}\"]", items.join("\", \"")),
    }
}
