//! Implementation of `assaydb translate`.

use std::process::ExitCode;

use assay_query::Query;
use assay_store::compile;

use crate::cli::commands::shared::table;

/// Shows the canonical string, optional term list, and wire filter for a
/// query.
pub fn run(query_text: &str, show_terms: bool) -> ExitCode {
    let query = match Query::parse(query_text) {
        Ok(query) => query,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    println!("{}", query.to_human_string());
    println!();

    if show_terms {
        let mut out = table(vec!["field", "comparison", "value"]);
        for term in query.terms() {
            out.add_row(vec![
                term.field.to_string(),
                term.comparison.to_string(),
                match serde_json::to_string(&term.value) {
                    Ok(text) => text,
                    Err(_) => String::new(),
                },
            ]);
        }
        println!("{out}");
        println!();
    }

    let tree = match query.translate() {
        Ok(tree) => tree,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };
    match serde_json::to_string_pretty(&compile(&tree)) {
        Ok(text) => println!("{text}"),
        Err(e) => {
            eprintln!("error: failed to render filter: {e}");
            return ExitCode::FAILURE;
        }
    }
    ExitCode::SUCCESS
}
