//! Implementation of `assaydb add`, the query-builder step.

use std::process::ExitCode;

use assay_query::{Comparison, Connector, Field, Query, Value};

/// Appends one term to a query string and prints the extended string.
pub fn run(
    field: &str,
    comparison: &str,
    value: &str,
    query_text: &str,
    or: bool,
    synonyms: bool,
) -> ExitCode {
    let mut query = match Query::parse(query_text) {
        Ok(query) => query,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let field: Field = match field.parse() {
        Ok(field) => field,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };
    let comparison: Comparison = match comparison.parse() {
        Ok(comparison) => comparison,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };
    let Some(value) = Value::parse(field.kind(), value) else {
        eprintln!("error: '{value}' is not a number");
        return ExitCode::FAILURE;
    };

    let connector = if query.is_empty() {
        None
    } else if or {
        Some(Connector::Or)
    } else {
        Some(Connector::And)
    };

    if let Err(e) = query.append(field, comparison, value, connector, synonyms) {
        eprintln!("error: {e}");
        return ExitCode::FAILURE;
    }
    println!("{}", query.to_human_string());
    ExitCode::SUCCESS
}
