//! The fixed field registry.
//!
//! Queries may only compare against the fields listed here; the registry
//! must match the document schema of the store exactly. Fields under the
//! repeated `measurement.results` array are a dedicated variant
//! ([`Field::Result`]) because the translator treats them specially: terms
//! against them are consolidated into element-match groups rather than
//! translated independently.

use std::{fmt, str::FromStr};

use serde::Serialize;

use crate::{error::ParseErrorKind, term::Comparison};

/// Value kind of a field, which decides the legal comparisons and value
/// shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FieldKind {
    /// The `all` pseudo-field, searched via the store's text index.
    Text,
    /// Plain string field.
    String,
    /// Numeric field (only `measurement.results.value`).
    Numeric,
    /// Date field, stored as a date array; queries compare the first entry.
    Date,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Text => "full-text",
            Self::String => "string",
            Self::Numeric => "numeric",
            Self::Date => "date",
        };
        f.write_str(name)
    }
}

/// A sub-field of one `measurement.results` array entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ResultField {
    /// The isotope name (string).
    Isotope,
    /// The result shape (`measurement`, `range`, or `limit`).
    Type,
    /// The measurement unit (string).
    Unit,
    /// The numeric value array.
    Value,
}

impl ResultField {
    /// The key of this sub-field inside a result entry.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Isotope => "isotope",
            Self::Type => "type",
            Self::Unit => "unit",
            Self::Value => "value",
        }
    }
}

/// A queryable field: one of the fixed dotted paths of the record schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Field {
    /// Pseudo-field searching the full-text index across the record.
    All,
    /// Experiment name or similar grouping label.
    Grouping,
    /// `sample.name`
    SampleName,
    /// `sample.description`
    SampleDescription,
    /// `sample.source`
    SampleSource,
    /// `sample.id`
    SampleId,
    /// `sample.owner.name`
    SampleOwnerName,
    /// `sample.owner.contact`
    SampleOwnerContact,
    /// A sub-field of the repeated `measurement.results` array.
    Result(ResultField),
    /// `measurement.practitioner.name`
    PractitionerName,
    /// `measurement.practitioner.contact`
    PractitionerContact,
    /// `measurement.technique`
    Technique,
    /// `measurement.institution`
    Institution,
    /// `measurement.date`
    MeasurementDate,
    /// `measurement.description`
    MeasurementDescription,
    /// `measurement.requestor.name`
    RequestorName,
    /// `measurement.requestor.contact`
    RequestorContact,
    /// `data_source.reference`
    Reference,
    /// `data_source.input.name`
    InputName,
    /// `data_source.input.contact`
    InputContact,
    /// `data_source.input.date`
    InputDate,
    /// `data_source.input.notes`
    InputNotes,
}

impl Field {
    /// Every field in the registry, in display order.
    pub const ALL: [Self; 25] = [
        Self::All,
        Self::Grouping,
        Self::SampleName,
        Self::SampleDescription,
        Self::SampleSource,
        Self::SampleId,
        Self::SampleOwnerName,
        Self::SampleOwnerContact,
        Self::Result(ResultField::Isotope),
        Self::Result(ResultField::Type),
        Self::Result(ResultField::Unit),
        Self::Result(ResultField::Value),
        Self::PractitionerName,
        Self::PractitionerContact,
        Self::Technique,
        Self::Institution,
        Self::MeasurementDate,
        Self::MeasurementDescription,
        Self::RequestorName,
        Self::RequestorContact,
        Self::Reference,
        Self::InputName,
        Self::InputContact,
        Self::InputDate,
        Self::InputNotes,
    ];

    /// The dotted path of this field as written in queries and stored
    /// documents.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Grouping => "grouping",
            Self::SampleName => "sample.name",
            Self::SampleDescription => "sample.description",
            Self::SampleSource => "sample.source",
            Self::SampleId => "sample.id",
            Self::SampleOwnerName => "sample.owner.name",
            Self::SampleOwnerContact => "sample.owner.contact",
            Self::Result(ResultField::Isotope) => "measurement.results.isotope",
            Self::Result(ResultField::Type) => "measurement.results.type",
            Self::Result(ResultField::Unit) => "measurement.results.unit",
            Self::Result(ResultField::Value) => "measurement.results.value",
            Self::PractitionerName => "measurement.practitioner.name",
            Self::PractitionerContact => "measurement.practitioner.contact",
            Self::Technique => "measurement.technique",
            Self::Institution => "measurement.institution",
            Self::MeasurementDate => "measurement.date",
            Self::MeasurementDescription => "measurement.description",
            Self::RequestorName => "measurement.requestor.name",
            Self::RequestorContact => "measurement.requestor.contact",
            Self::Reference => "data_source.reference",
            Self::InputName => "data_source.input.name",
            Self::InputContact => "data_source.input.contact",
            Self::InputDate => "data_source.input.date",
            Self::InputNotes => "data_source.input.notes",
        }
    }

    /// The value kind of this field.
    pub fn kind(self) -> FieldKind {
        match self {
            Self::All => FieldKind::Text,
            Self::Result(ResultField::Value) => FieldKind::Numeric,
            Self::MeasurementDate | Self::InputDate => FieldKind::Date,
            _ => FieldKind::String,
        }
    }

    /// Whether this field lives inside the `measurement.results` array.
    pub fn is_result(self) -> bool {
        matches!(self, Self::Result(_))
    }

    /// The comparisons that are legal for this field's kind.
    pub fn legal_comparisons(self) -> &'static [Comparison] {
        match self.kind() {
            FieldKind::Text | FieldKind::String => {
                &[Comparison::Eq, Comparison::Contains, Comparison::NotContains]
            }
            FieldKind::Numeric | FieldKind::Date => &[
                Comparison::Eq,
                Comparison::Lt,
                Comparison::Lte,
                Comparison::Gt,
                Comparison::Gte,
            ],
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Field {
    type Err = ParseErrorKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| ParseErrorKind::UnknownField(s.to_string()))
    }
}
