//! Implementation of `assaydb search`.

use std::{path::Path, process::ExitCode};

use serde_json::Value;

use assay_query::Query;

use crate::cli::{
    commands::shared::{doc_str, doc_version, table},
    store_file,
};

/// Parses a query, runs it against the store, and prints the matches.
pub fn run(query_text: &str, json: bool, store_dir: &Path) -> ExitCode {
    let query = match Query::parse(query_text) {
        Ok(query) => query,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let store = match store_file::open(store_dir) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("error: failed to open store: {e}");
            return ExitCode::FAILURE;
        }
    };

    let docs = match store.search(&query) {
        Ok(docs) => docs,
        Err(e) => {
            eprintln!("error: search failed: {e}");
            return ExitCode::FAILURE;
        }
    };

    if json {
        match serde_json::to_string_pretty(&docs) {
            Ok(text) => println!("{text}"),
            Err(e) => {
                eprintln!("error: failed to render results: {e}");
                return ExitCode::FAILURE;
            }
        }
        return ExitCode::SUCCESS;
    }

    if docs.is_empty() {
        println!("No matching records.");
        return ExitCode::SUCCESS;
    }

    let mut out = table(vec!["id", "ver", "grouping", "sample", "results"]);
    for doc in &docs {
        out.add_row(vec![
            doc_str(doc, "/_id").to_string(),
            doc_version(doc).to_string(),
            doc_str(doc, "/grouping").to_string(),
            doc_str(doc, "/sample/name").to_string(),
            summarize_results(doc),
        ]);
    }
    println!("{out}");
    println!("{} matching record(s)", docs.len());
    ExitCode::SUCCESS
}

/// One-line summary of a document's measurement results.
fn summarize_results(doc: &Value) -> String {
    let Some(results) = doc
        .pointer("/measurement/results")
        .and_then(Value::as_array)
    else {
        return String::new();
    };
    results
        .iter()
        .map(|result| {
            format!(
                "{} {} ({})",
                doc_str(result, "/isotope"),
                doc_str(result, "/unit"),
                doc_str(result, "/type"),
            )
        })
        .collect::<Vec<_>>()
        .join(", ")
}
