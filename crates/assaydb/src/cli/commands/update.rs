//! Implementation of `assaydb update`.

use std::{path::Path, process::ExitCode};

use serde_json::Value;

use assay_record::MeasurementResult;
use assay_store::UpdateRequest;

use crate::cli::store_file;

/// Applies field updates and result edits, writing a new version of the
/// document.
pub fn run(
    id: &str,
    set: &[String],
    add_results: &[String],
    remove_results: &[usize],
    store_dir: &Path,
) -> ExitCode {
    let mut request = UpdateRequest {
        remove_results: remove_results.to_vec(),
        ..UpdateRequest::default()
    };

    for pair in set {
        let Some((path, raw)) = pair.split_once('=') else {
            eprintln!("error: --set takes path=value, got '{pair}'");
            return ExitCode::FAILURE;
        };
        // JSON where it parses, a plain string otherwise, so quoting is
        // only needed for numbers, arrays, and the like.
        let value = serde_json::from_str(raw).unwrap_or(Value::String(raw.to_string()));
        request.set.push((path.to_string(), value));
    }

    for raw in add_results {
        let result: MeasurementResult = match serde_json::from_str(raw) {
            Ok(result) => result,
            Err(e) => {
                eprintln!("error: invalid measurement result: {e}");
                return ExitCode::FAILURE;
            }
        };
        request.add_results.push(result);
    }

    if request.is_empty() {
        eprintln!("error: nothing to update");
        return ExitCode::FAILURE;
    }

    let mut store = match store_file::open(store_dir) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("error: failed to open store: {e}");
            return ExitCode::FAILURE;
        }
    };
    let new_id = match store.update(id, &request) {
        Ok(new_id) => new_id,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = store_file::save(store_dir, store) {
        eprintln!("error: failed to write store: {e}");
        return ExitCode::FAILURE;
    }
    println!("{new_id}");
    ExitCode::SUCCESS
}
