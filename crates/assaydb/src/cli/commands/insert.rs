//! Implementation of `assaydb insert`.

use std::{fs, path::Path, process::ExitCode};

use assay_record::AssayRecord;

use crate::cli::store_file;

/// Validates a record file and inserts it as a version-1 document.
pub fn run(file: &Path, store_dir: &Path) -> ExitCode {
    let text = match fs::read_to_string(file) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("error: failed to read {}: {e}", file.display());
            return ExitCode::FAILURE;
        }
    };
    let record: AssayRecord = match serde_json::from_str(&text) {
        Ok(record) => record,
        Err(e) => {
            eprintln!("error: {} is not a valid record: {e}", file.display());
            return ExitCode::FAILURE;
        }
    };

    let mut store = match store_file::open(store_dir) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("error: failed to open store: {e}");
            return ExitCode::FAILURE;
        }
    };
    let id = match store.insert(&record) {
        Ok(id) => id,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = store_file::save(store_dir, store) {
        eprintln!("error: failed to write store: {e}");
        return ExitCode::FAILURE;
    }
    println!("{id}");
    ExitCode::SUCCESS
}
