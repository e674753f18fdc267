//! The assay record document.

use serde::{Deserialize, Serialize};

use crate::{MeasurementResult, RecordError, dates};

/// Schema version written into newly created records.
const SPECIFICATION: &str = "3.00";

/// A name/contact pair (sample owner, practitioner, requestor, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    /// Person or group name.
    #[serde(default)]
    pub name: String,
    /// Email address or telephone number.
    #[serde(default)]
    pub contact: String,
}

/// The `sample` section of a record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sample {
    /// Concise sample description.
    #[serde(default)]
    pub name: String,
    /// Detailed sample description.
    #[serde(default)]
    pub description: String,
    /// Where the sample came from.
    #[serde(default)]
    pub source: String,
    /// Identification number.
    #[serde(default)]
    pub id: String,
    /// Who owns the sample.
    #[serde(default)]
    pub owner: Contact,
}

/// The `measurement` section of a record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    /// Detailed description of the measurement.
    #[serde(default)]
    pub description: String,
    /// Who coordinated the measurement.
    #[serde(default)]
    pub requestor: Contact,
    /// Who performed the measurement.
    #[serde(default)]
    pub practitioner: Contact,
    /// Measurement technique name.
    #[serde(default)]
    pub technique: String,
    /// Institution where the measurement was performed.
    #[serde(default)]
    pub institution: String,
    /// Measurement date(s); at most two entries (start, end), canonicalized
    /// to ISO form on insert.
    #[serde(default)]
    pub date: Vec<String>,
    /// The measurement results themselves.
    #[serde(default)]
    pub results: Vec<MeasurementResult>,
}

/// The `data_source.input` section of a record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSourceInput {
    /// Input simplifications and assumptions.
    #[serde(default)]
    pub notes: String,
    /// Date(s) of data entry, canonicalized to ISO form on insert.
    #[serde(default)]
    pub date: Vec<String>,
    /// Name of the person who performed data input.
    #[serde(default)]
    pub name: String,
    /// Contact of the person who performed data input.
    #[serde(default)]
    pub contact: String,
}

/// The `data_source` section of a record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSource {
    /// Where the data came from (publication, private communication, ...).
    #[serde(default)]
    pub reference: String,
    /// How the data got into the database.
    #[serde(default)]
    pub input: DataSourceInput,
}

/// A complete assay record as stored in the document database.
///
/// The underscore-prefixed bookkeeping fields (`_id`, `_version`,
/// `_parent_id`) are managed by the store layer: `_version` starts at 1 and
/// increments on every update, with the superseded document kept in the
/// archive and `_parent_id` pointing at the document it replaced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssayRecord {
    /// Store-assigned document id, absent until first insert.
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Version number, starting at 1.
    #[serde(rename = "_version", default = "default_version")]
    pub version: u32,
    /// Id of the document this version superseded; empty for version 1.
    #[serde(rename = "_parent_id", default)]
    pub parent_id: String,
    /// Schema version the record was written against.
    #[serde(default = "default_specification")]
    pub specification: String,
    /// Record type marker; always `assay`.
    #[serde(rename = "type", default = "default_record_type")]
    pub record_type: String,
    /// Experiment name or similar grouping label.
    #[serde(default)]
    pub grouping: String,
    /// The sample that was assayed.
    #[serde(default)]
    pub sample: Sample,
    /// The measurement performed on it.
    #[serde(default)]
    pub measurement: Measurement,
    /// Provenance of the data.
    #[serde(default)]
    pub data_source: DataSource,
}

/// Serde default for `_version`.
fn default_version() -> u32 {
    1
}

/// Serde default for `specification`.
fn default_specification() -> String {
    SPECIFICATION.to_string()
}

/// Serde default for the record type marker.
fn default_record_type() -> String {
    "assay".to_string()
}

impl Default for AssayRecord {
    fn default() -> Self {
        Self {
            id: None,
            version: 1,
            parent_id: String::new(),
            specification: SPECIFICATION.to_string(),
            record_type: "assay".to_string(),
            grouping: String::new(),
            sample: Sample::default(),
            measurement: Measurement::default(),
            data_source: DataSource::default(),
        }
    }
}

impl AssayRecord {
    /// Validates the record: type marker, every measurement result, and
    /// every date string.
    pub fn validate(&self) -> Result<(), RecordError> {
        if self.record_type != "assay" {
            return Err(RecordError::BadRecordType(self.record_type.clone()));
        }
        for result in &self.measurement.results {
            result.validate()?;
        }
        for date in self
            .measurement
            .date
            .iter()
            .chain(self.data_source.input.date.iter())
        {
            if dates::parse_date(date).is_none() {
                return Err(RecordError::BadDate(date.clone()));
            }
        }
        Ok(())
    }

    /// Rewrites all date strings into canonical ISO form.
    ///
    /// Call after [`validate`](Self::validate); unparseable dates are left
    /// untouched.
    pub fn canonicalize_dates(&mut self) {
        for date in self
            .measurement
            .date
            .iter_mut()
            .chain(self.data_source.input.date.iter_mut())
        {
            if let Some(iso) = dates::canonicalize(date) {
                *date = iso;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::ResultVariant;

    fn sample_record() -> AssayRecord {
        AssayRecord {
            grouping: "MAJORANA".to_string(),
            sample: Sample {
                name: "copper block".to_string(),
                description: "electroformed copper".to_string(),
                ..Sample::default()
            },
            measurement: Measurement {
                date: vec!["2020/01/31".to_string()],
                results: vec![MeasurementResult {
                    isotope: "Th-232".to_string(),
                    variant: ResultVariant::Limit,
                    unit: "ppt".to_string(),
                    value: vec![0.5, 90.0],
                }],
                ..Measurement::default()
            },
            ..AssayRecord::default()
        }
    }

    #[test]
    fn new_record_defaults() {
        let record = AssayRecord::default();
        assert_eq!(record.version, 1);
        assert_eq!(record.parent_id, "");
        assert_eq!(record.record_type, "assay");
        assert!(record.id.is_none());
    }

    #[test]
    fn valid_record_passes() {
        assert!(sample_record().validate().is_ok());
    }

    #[test]
    fn bad_date_rejected() {
        let mut record = sample_record();
        record.data_source.input.date = vec!["someday".to_string()];
        assert!(matches!(
            record.validate().unwrap_err(),
            RecordError::BadDate(_)
        ));
    }

    #[test]
    fn bad_result_rejected() {
        let mut record = sample_record();
        record.measurement.results[0].unit = "furlongs".to_string();
        assert!(record.validate().is_err());
    }

    #[test]
    fn canonicalize_rewrites_dates() {
        let mut record = sample_record();
        record.canonicalize_dates();
        assert_eq!(record.measurement.date, vec!["2020-01-31".to_string()]);
    }

    #[test]
    fn deserializes_stored_form() {
        let doc = json!({
            "_id": "abc123",
            "_version": 2,
            "_parent_id": "abc122",
            "specification": "3.00",
            "type": "assay",
            "grouping": "DUNE",
            "sample": {"name": "steel", "description": "", "source": "", "id": ""},
            "measurement": {
                "results": [
                    {"isotope": "U-238", "type": "measurement", "unit": "ppb", "value": [1.2, 0.1]}
                ]
            },
            "data_source": {"reference": "internal"}
        });
        let record: AssayRecord = serde_json::from_value(doc).unwrap();
        assert_eq!(record.version, 2);
        assert_eq!(record.id.as_deref(), Some("abc123"));
        assert_eq!(record.measurement.results[0].variant, ResultVariant::Measurement);
        assert!(record.validate().is_ok());
    }

    #[test]
    fn id_skipped_when_absent() {
        let value = serde_json::to_value(AssayRecord::default()).unwrap();
        assert!(value.get("_id").is_none());
        assert_eq!(value["_version"], json!(1));
    }
}
