//! The store handle and its versioned mutation operations.

use std::collections::HashSet;

use serde_json::{Value, json};
use tracing::{debug, info};

use assay_query::Query;
use assay_record::{AssayRecord, MeasurementResult, dates};

use crate::{backend::Backend, compile, error::StoreError};

/// The edits one update applies to a document.
///
/// All three parts are applied to a copy of the current version, in this
/// order: field updates, result additions, result removals. Removal
/// indices refer to the results array *after* additions and are validated
/// against it.
#[derive(Debug, Default)]
pub struct UpdateRequest {
    /// Dotted-path field updates, e.g. `("sample.name", json!("copper"))`.
    /// Paths ending in `date` take date strings, which are canonicalized.
    pub set: Vec<(String, Value)>,
    /// New measurement results to append.
    pub add_results: Vec<MeasurementResult>,
    /// Indices of measurement results to remove.
    pub remove_results: Vec<usize>,
}

impl UpdateRequest {
    /// Whether the request changes anything.
    pub fn is_empty(&self) -> bool {
        self.set.is_empty() && self.add_results.is_empty() && self.remove_results.is_empty()
    }
}

/// A handle to a versioned assay record store.
///
/// Updates never destroy data: each update writes a fresh document with a
/// bumped `_version` and a `_parent_id` pointing at the version it
/// replaced, and moves the old version to the archive. Searches only see
/// the live collection.
#[derive(Debug)]
pub struct Store<B> {
    backend: B,
}

impl<B: Backend> Store<B> {
    /// Creates a store over a backend.
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Consumes the store, returning its backend (for persistence).
    pub fn into_backend(self) -> B {
        self.backend
    }

    /// Runs a query against the live collection.
    pub fn search(&self, query: &Query) -> Result<Vec<Value>, StoreError> {
        let filter = compile::compile(&query.translate()?);
        debug!(%filter, "running search");
        let found = self.backend.find(&filter)?;
        debug!(count = found.len(), "search finished");
        Ok(found)
    }

    /// Fetches a live document by id.
    pub fn get_by_id(&self, id: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.backend.find(&id_filter(id))?.into_iter().next())
    }

    /// The archived ancestry of a live document, newest first.
    ///
    /// Follows the `_parent_id` chain through the archive, starting from
    /// the live document's parent. The walk stops at the first repeated
    /// id, so a hand-edited store with a cyclic chain cannot loop.
    pub fn history(&self, id: &str) -> Result<Vec<Value>, StoreError> {
        let mut chain = Vec::new();
        let mut seen = HashSet::from([id.to_string()]);
        let mut current = self
            .get_by_id(id)?
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        loop {
            let parent_id = match current.get("_parent_id").and_then(Value::as_str) {
                Some(parent_id) if !parent_id.is_empty() => parent_id.to_string(),
                _ => break,
            };
            if !seen.insert(parent_id.clone()) {
                break;
            }
            let Some(parent) = self
                .backend
                .find_archived(&id_filter(&parent_id))?
                .into_iter()
                .next()
            else {
                break;
            };
            current = parent.clone();
            chain.push(parent);
        }
        Ok(chain)
    }

    /// Validates and inserts a new record as version 1, returning its id.
    pub fn insert(&mut self, record: &AssayRecord) -> Result<String, StoreError> {
        record.validate()?;
        let mut record = record.clone();
        record.canonicalize_dates();
        record.id = None;
        record.version = 1;
        record.parent_id = String::new();

        let id = self.backend.insert(serde_json::to_value(&record)?)?;
        info!(%id, "inserted assay record");
        Ok(id)
    }

    /// Applies an update to a live document, writing a new version and
    /// archiving the old one. Returns the new version's id.
    pub fn update(&mut self, id: &str, request: &UpdateRequest) -> Result<String, StoreError> {
        let parent = self
            .get_by_id(id)?
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        let mut new_doc = parent.clone();
        let fields = new_doc
            .as_object_mut()
            .ok_or(StoreError::Corrupt("document is not an object"))?;
        fields.remove("_id");
        let version = fields.get("_version").and_then(Value::as_u64).unwrap_or(1);
        fields.insert("_version".to_string(), json!(version + 1));
        fields.insert("_parent_id".to_string(), json!(id));

        for (path, value) in &request.set {
            apply_set(&mut new_doc, path, value.clone())?;
        }
        apply_result_edits(&mut new_doc, request)?;

        // The updated document must still be a valid record.
        let record: AssayRecord = serde_json::from_value(new_doc.clone())?;
        record.validate()?;

        let new_id = self.backend.insert(new_doc)?;
        let parent = self
            .backend
            .remove(id)?
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        self.backend.archive(parent)?;
        info!(parent = id, %new_id, version = version + 1, "updated assay record");
        Ok(new_id)
    }

    /// Removes a document from the live collection, archiving it without a
    /// replacement version.
    pub fn retire(&mut self, id: &str) -> Result<(), StoreError> {
        let doc = self
            .backend
            .remove(id)?
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        self.backend.archive(doc)?;
        info!(%id, "retired assay record");
        Ok(())
    }
}

/// The wire filter matching one document id.
fn id_filter(id: &str) -> Value {
    json!({"_id": id})
}

/// Sets a dotted-path field to a value.
///
/// Numeric segments index into arrays; values for paths ending in `date`
/// are canonicalized to ISO date strings first.
fn apply_set(doc: &mut Value, path: &str, value: Value) -> Result<(), StoreError> {
    let value = if path.ends_with("date") {
        let rendered = value.to_string();
        canonicalize_date_value(value)
            .ok_or_else(|| StoreError::Record(assay_record::RecordError::BadDate(rendered)))?
    } else {
        value
    };

    let mut segments = path.split('.').peekable();
    let mut cursor = doc;
    while let Some(segment) = segments.next() {
        let last = segments.peek().is_none();
        match cursor {
            Value::Object(map) => {
                if last {
                    map.insert(segment.to_string(), value);
                    return Ok(());
                }
                cursor = map
                    .get_mut(segment)
                    .ok_or_else(|| StoreError::BadUpdatePath(path.to_string()))?;
            }
            Value::Array(items) => {
                let index: usize = segment
                    .parse()
                    .map_err(|_| StoreError::BadUpdatePath(path.to_string()))?;
                let slot = items
                    .get_mut(index)
                    .ok_or_else(|| StoreError::BadUpdatePath(path.to_string()))?;
                if last {
                    *slot = value;
                    return Ok(());
                }
                cursor = slot;
            }
            _ => return Err(StoreError::BadUpdatePath(path.to_string())),
        }
    }
    Err(StoreError::BadUpdatePath(path.to_string()))
}

/// Rewrites a date update value (a string or an array of strings) into
/// canonical ISO form.
fn canonicalize_date_value(value: Value) -> Option<Value> {
    match value {
        Value::String(text) => dates::canonicalize(&text).map(Value::from),
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::String(text) => dates::canonicalize(&text).map(Value::from),
                _ => None,
            })
            .collect::<Option<Vec<Value>>>()
            .map(Value::from),
        _ => None,
    }
}

/// Appends and removes measurement results on the document being updated.
fn apply_result_edits(doc: &mut Value, request: &UpdateRequest) -> Result<(), StoreError> {
    let results = doc
        .pointer_mut("/measurement/results")
        .and_then(Value::as_array_mut)
        .ok_or(StoreError::Corrupt("document has no measurement results array"))?;

    for result in &request.add_results {
        result.validate()?;
        results.push(serde_json::to_value(result)?);
    }

    let len = results.len();
    let mut indices = request.remove_results.clone();
    indices.sort_unstable();
    indices.dedup();
    if let Some(&index) = indices.iter().find(|&&index| index >= len) {
        return Err(StoreError::RemoveIndexOutOfBounds { index, len });
    }
    // Remove back to front so earlier removals don't shift later indices.
    for index in indices.into_iter().rev() {
        results.remove(index);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;
    use assay_record::{Measurement, ResultVariant, Sample};

    fn record() -> AssayRecord {
        AssayRecord {
            grouping: "MAJORANA".to_string(),
            sample: Sample {
                name: "copper block".to_string(),
                ..Sample::default()
            },
            measurement: Measurement {
                date: vec!["01/31/2020".to_string()],
                results: vec![MeasurementResult {
                    isotope: "U-238".to_string(),
                    variant: ResultVariant::Measurement,
                    unit: "ppb".to_string(),
                    value: vec![1.2, 0.1],
                }],
                ..Measurement::default()
            },
            ..AssayRecord::default()
        }
    }

    fn store() -> Store<MemoryBackend> {
        Store::new(MemoryBackend::new())
    }

    #[test]
    fn insert_canonicalizes_and_versions() {
        let mut store = store();
        let id = store.insert(&record()).unwrap();
        let doc = store.get_by_id(&id).unwrap().unwrap();
        assert_eq!(doc["_version"], json!(1));
        assert_eq!(doc["_parent_id"], json!(""));
        assert_eq!(doc["measurement"]["date"], json!(["2020-01-31"]));
    }

    #[test]
    fn insert_rejects_invalid_records() {
        let mut bad = record();
        bad.measurement.results[0].unit = "furlongs".to_string();
        assert!(matches!(
            store().insert(&bad).unwrap_err(),
            StoreError::Record(_)
        ));
    }

    #[test]
    fn search_round_trip() {
        let mut store = store();
        store.insert(&record()).unwrap();
        let query = Query::parse("grouping contains majorana").unwrap();
        assert_eq!(store.search(&query).unwrap().len(), 1);
        let none = Query::parse("grouping contains dune").unwrap();
        assert!(store.search(&none).unwrap().is_empty());
    }

    #[test]
    fn search_finds_consolidated_results() {
        let mut store = store();
        store.insert(&record()).unwrap();
        let query = Query::parse(
            "measurement.results.isotope equals U-238\nAND\nmeasurement.results.value is less than 2",
        )
        .unwrap();
        assert_eq!(store.search(&query).unwrap().len(), 1);
    }

    #[test]
    fn update_bumps_version_and_archives_parent() {
        let mut store = store();
        let id = store.insert(&record()).unwrap();
        let request = UpdateRequest {
            set: vec![("sample.name".to_string(), json!("steel plate"))],
            ..UpdateRequest::default()
        };
        let new_id = store.update(&id, &request).unwrap();
        assert_ne!(new_id, id);

        // the old version is gone from the live collection
        assert!(store.get_by_id(&id).unwrap().is_none());
        let doc = store.get_by_id(&new_id).unwrap().unwrap();
        assert_eq!(doc["_version"], json!(2));
        assert_eq!(doc["_parent_id"], json!(id));
        assert_eq!(doc["sample"]["name"], json!("steel plate"));

        // and reachable through the history chain
        let history = store.history(&new_id).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0]["_id"], json!(id));
        assert_eq!(history[0]["sample"]["name"], json!("copper block"));
    }

    #[test]
    fn update_adds_and_removes_results() {
        let mut store = store();
        let id = store.insert(&record()).unwrap();
        let request = UpdateRequest {
            add_results: vec![MeasurementResult {
                isotope: "Th-232".to_string(),
                variant: ResultVariant::Limit,
                unit: "ppt".to_string(),
                value: vec![0.5],
            }],
            remove_results: vec![0],
            ..UpdateRequest::default()
        };
        let new_id = store.update(&id, &request).unwrap();
        let doc = store.get_by_id(&new_id).unwrap().unwrap();
        let results = doc["measurement"]["results"].as_array().unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0]["isotope"], json!("Th-232"));
    }

    #[test]
    fn update_rejects_out_of_bounds_removal() {
        let mut store = store();
        let id = store.insert(&record()).unwrap();
        let request = UpdateRequest {
            remove_results: vec![3],
            ..UpdateRequest::default()
        };
        assert!(matches!(
            store.update(&id, &request).unwrap_err(),
            StoreError::RemoveIndexOutOfBounds { index: 3, len: 1 },
        ));
        // failed update leaves the live document in place
        assert!(store.get_by_id(&id).unwrap().is_some());
    }

    #[test]
    fn update_canonicalizes_date_sets() {
        let mut store = store();
        let id = store.insert(&record()).unwrap();
        let request = UpdateRequest {
            set: vec![("measurement.date".to_string(), json!(["02/01/2021"]))],
            ..UpdateRequest::default()
        };
        let new_id = store.update(&id, &request).unwrap();
        let doc = store.get_by_id(&new_id).unwrap().unwrap();
        assert_eq!(doc["measurement"]["date"], json!(["2021-02-01"]));
    }

    #[test]
    fn update_rejects_documents_that_no_longer_validate() {
        let mut store = store();
        let id = store.insert(&record()).unwrap();
        let request = UpdateRequest {
            set: vec![("grouping".to_string(), json!(12345))],
            ..UpdateRequest::default()
        };
        // a numeric grouping fails record deserialization
        assert!(matches!(
            store.update(&id, &request).unwrap_err(),
            StoreError::Serde(_)
        ));
    }

    #[test]
    fn update_missing_document_fails() {
        let mut store = store();
        assert!(matches!(
            store.update("nope", &UpdateRequest::default()).unwrap_err(),
            StoreError::NotFound(_)
        ));
    }

    #[test]
    fn retire_archives_without_replacement() {
        let mut store = store();
        let id = store.insert(&record()).unwrap();
        store.retire(&id).unwrap();
        assert!(store.get_by_id(&id).unwrap().is_none());
        assert!(store.search(&Query::new()).unwrap().is_empty());
    }

    #[test]
    fn history_stops_on_cyclic_parent_chains() {
        // a hand-edited store file can point parents at each other
        let live = vec![json!({"_id": "a1", "_version": 3, "_parent_id": "b2"})];
        let archived = vec![
            json!({"_id": "b2", "_version": 2, "_parent_id": "c3"}),
            json!({"_id": "c3", "_version": 1, "_parent_id": "b2"}),
        ];
        let store = Store::new(MemoryBackend::with_documents(live, archived));
        let history = store.history("a1").unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0]["_id"], json!("b2"));
        assert_eq!(history[1]["_id"], json!("c3"));
    }

    #[test]
    fn chained_updates_build_history() {
        let mut store = store();
        let v1 = store.insert(&record()).unwrap();
        let set = |name: &str| UpdateRequest {
            set: vec![("sample.name".to_string(), json!(name))],
            ..UpdateRequest::default()
        };
        let v2 = store.update(&v1, &set("second")).unwrap();
        let v3 = store.update(&v2, &set("third")).unwrap();

        let doc = store.get_by_id(&v3).unwrap().unwrap();
        assert_eq!(doc["_version"], json!(3));

        let history = store.history(&v3).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0]["_id"], json!(v2));
        assert_eq!(history[1]["_id"], json!(v1));

        // searches only ever see the newest version
        let query = Query::parse("grouping contains majorana").unwrap();
        assert_eq!(store.search(&query).unwrap().len(), 1);
    }
}
