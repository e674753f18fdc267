//! Implementation of `assaydb fields`.

use std::process::ExitCode;

use assay_query::Field;

use crate::cli::commands::shared::table;

/// Prints the field registry with kinds and legal comparisons.
pub fn run() -> ExitCode {
    let mut out = table(vec!["field", "kind", "comparisons"]);
    for field in Field::ALL {
        let comparisons = field
            .legal_comparisons()
            .iter()
            .map(|comparison| comparison.human_phrase())
            .collect::<Vec<_>>()
            .join(", ");
        out.add_row(vec![
            field.to_string(),
            field.kind().to_string(),
            comparisons,
        ]);
    }
    println!("{out}");
    ExitCode::SUCCESS
}
