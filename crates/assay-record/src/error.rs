//! Error types for record validation.

use thiserror::Error;

/// Errors that can occur when validating an assay record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    /// An isotope name is not in the isotope catalog.
    #[error(
        "'{0}' is not a recognized isotope; isotopes must be written as <element symbol>-<mass number>, e.g. K-40"
    )]
    UnknownIsotope(String),

    /// A unit name is not in the unit catalog.
    #[error("'{0}' is not a recognized measurement unit")]
    UnknownUnit(String),

    /// A measurement result value array has too many entries.
    #[error("measurement result value arrays hold at most 3 numbers, got {0}")]
    TooManyValues(usize),

    /// A date string does not match any accepted format.
    #[error("'{0}' is not in an accepted date format (e.g. 2020-01-31 or 01/31/2020)")]
    BadDate(String),

    /// The record type marker is not "assay".
    #[error("record type must be 'assay', got '{0}'")]
    BadRecordType(String),
}
