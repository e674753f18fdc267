//! Implementation of `assaydb history`.

use std::{path::Path, process::ExitCode};

use crate::cli::{
    commands::shared::{doc_str, doc_version, table},
    store_file,
};

/// Prints the archived version chain of a live document, newest first.
pub fn run(id: &str, store_dir: &Path) -> ExitCode {
    let store = match store_file::open(store_dir) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("error: failed to open store: {e}");
            return ExitCode::FAILURE;
        }
    };
    let chain = match store.history(id) {
        Ok(chain) => chain,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    if chain.is_empty() {
        println!("No archived versions.");
        return ExitCode::SUCCESS;
    }

    let mut out = table(vec!["ver", "id", "grouping", "sample"]);
    for doc in &chain {
        out.add_row(vec![
            doc_version(doc).to_string(),
            doc_str(doc, "/_id").to_string(),
            doc_str(doc, "/grouping").to_string(),
            doc_str(doc, "/sample/name").to_string(),
        ]);
    }
    println!("{out}");
    ExitCode::SUCCESS
}
