//! Assay record document model for assaydb.
//!
//! This crate defines the shape of a radiopurity assay record as stored in
//! the document database, along with the pieces of schema knowledge that the
//! rest of the workspace shares:
//!
//! - The record structure itself ([`AssayRecord`] and its nested sections)
//! - The measurement result sub-document ([`MeasurementResult`]) and its
//!   three shapes ([`ResultVariant`]: point measurement, bounded range,
//!   upper limit)
//! - The accepted date formats ([`dates`]) used both for record fields and
//!   for date values entered in queries
//! - The isotope and unit catalogs ([`catalog`]) that measurement results
//!   are validated against
//!
//! # Example
//!
//! ```
//! use assay_record::{MeasurementResult, ResultVariant};
//!
//! let result = MeasurementResult {
//!     isotope: "K-40".to_string(),
//!     variant: ResultVariant::Measurement,
//!     unit: "ppm".to_string(),
//!     value: vec![0.3, 0.1],
//! };
//! assert!(result.validate().is_ok());
//! ```

#![warn(missing_docs)]

pub mod catalog;
pub mod dates;
mod error;
mod record;
mod result;

pub use error::RecordError;
pub use record::{AssayRecord, Contact, DataSource, DataSourceInput, Measurement, Sample};
pub use result::{MeasurementResult, ResultVariant};
