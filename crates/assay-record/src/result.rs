//! The measurement result sub-document.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{RecordError, catalog};

/// The shape of a measurement result's value array.
///
/// A result is one of three kinds, distinguished by the `type` field of the
/// stored sub-document. The meaning of the `value` array entries depends on
/// the kind:
///
/// - `measurement`: `value[0]` is the central value, `value[1]` an optional
///   symmetric error, `value[2]` an optional asymmetric error component.
/// - `range`: `value[0]` is the lower bound, `value[1]` the upper bound,
///   `value[2]` an optional confidence level.
/// - `limit`: `value[0]` is the upper limit, `value[1]` an optional
///   confidence level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultVariant {
    /// A point measurement with optional error components.
    Measurement,
    /// A bounded lower/upper range.
    Range,
    /// An upper limit with no lower bound.
    Limit,
}

impl ResultVariant {
    /// All variants, in the order queries enumerate them.
    pub const ALL: [Self; 3] = [Self::Measurement, Self::Range, Self::Limit];

    /// The stored `type` field value for this variant.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Measurement => "measurement",
            Self::Range => "range",
            Self::Limit => "limit",
        }
    }
}

impl fmt::Display for ResultVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResultVariant {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "measurement" => Ok(Self::Measurement),
            "range" => Ok(Self::Range),
            "limit" => Ok(Self::Limit),
            _ => Err(()),
        }
    }
}

/// One entry of a record's `measurement.results` array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementResult {
    /// Isotope the result concerns, e.g. `K-40`.
    pub isotope: String,
    /// Which of the three result shapes this is.
    #[serde(rename = "type")]
    pub variant: ResultVariant,
    /// Measurement unit, e.g. `ppm` or `mBq/kg`.
    pub unit: String,
    /// Value array; meaning of entries depends on `variant`.
    pub value: Vec<f64>,
}

impl MeasurementResult {
    /// Checks the isotope and unit against the catalogs and the value array
    /// arity. The variant itself is enforced by deserialization.
    pub fn validate(&self) -> Result<(), RecordError> {
        if !catalog::is_isotope(&self.isotope) {
            return Err(RecordError::UnknownIsotope(self.isotope.clone()));
        }
        if !catalog::is_unit(&self.unit) {
            return Err(RecordError::UnknownUnit(self.unit.clone()));
        }
        if self.value.len() > 3 {
            return Err(RecordError::TooManyValues(self.value.len()));
        }
        Ok(())
    }
}
