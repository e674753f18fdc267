//! Storage backends.
//!
//! A backend holds two collections of JSON documents: the live collection
//! that searches run against, and an archive of superseded versions. The
//! store layer drives all versioning logic; a backend only needs to find,
//! insert, remove, and archive documents.

use serde_json::{Value, json};

use crate::{error::StoreError, eval};

/// Document storage underneath a [`Store`](crate::Store).
pub trait Backend {
    /// Live documents matching a wire filter.
    fn find(&self, filter: &Value) -> Result<Vec<Value>, StoreError>;

    /// Archived documents matching a wire filter.
    fn find_archived(&self, filter: &Value) -> Result<Vec<Value>, StoreError>;

    /// Inserts a live document, assigning an `_id` if it has none, and
    /// returns the document's id.
    fn insert(&mut self, doc: Value) -> Result<String, StoreError>;

    /// Removes a live document by id, returning it if it existed.
    fn remove(&mut self, id: &str) -> Result<Option<Value>, StoreError>;

    /// Adds a document to the archive, keeping its `_id`.
    fn archive(&mut self, doc: Value) -> Result<(), StoreError>;
}

/// An in-memory backend, used by tests and the CLI demo store.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    live: Vec<Value>,
    archived: Vec<Value>,
    next_id: u64,
}

impl MemoryBackend {
    /// Creates an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a backend from existing live and archived documents.
    ///
    /// The id counter continues past any numeric ids already present, so
    /// newly inserted documents never collide.
    pub fn with_documents(live: Vec<Value>, archived: Vec<Value>) -> Self {
        let next_id = live
            .iter()
            .chain(archived.iter())
            .filter_map(doc_id)
            .filter_map(|id| u64::from_str_radix(id, 16).ok())
            .max()
            .map_or(0, |max| max + 1);
        Self {
            live,
            archived,
            next_id,
        }
    }

    /// The live documents, for persistence.
    pub fn live(&self) -> &[Value] {
        &self.live
    }

    /// The archived documents, for persistence.
    pub fn archived(&self) -> &[Value] {
        &self.archived
    }
}

/// The `_id` of a document, if present.
fn doc_id(doc: &Value) -> Option<&str> {
    doc.get("_id").and_then(Value::as_str)
}

impl Backend for MemoryBackend {
    fn find(&self, filter: &Value) -> Result<Vec<Value>, StoreError> {
        Ok(self
            .live
            .iter()
            .filter(|doc| eval::matches(filter, doc))
            .cloned()
            .collect())
    }

    fn find_archived(&self, filter: &Value) -> Result<Vec<Value>, StoreError> {
        Ok(self
            .archived
            .iter()
            .filter(|doc| eval::matches(filter, doc))
            .cloned()
            .collect())
    }

    fn insert(&mut self, mut doc: Value) -> Result<String, StoreError> {
        let id = match doc_id(&doc) {
            Some(id) => id.to_string(),
            None => {
                let id = format!("{:024x}", self.next_id);
                self.next_id += 1;
                doc.as_object_mut()
                    .ok_or(StoreError::Corrupt("document is not an object"))?
                    .insert("_id".to_string(), json!(id));
                id
            }
        };
        self.live.push(doc);
        Ok(id)
    }

    fn remove(&mut self, id: &str) -> Result<Option<Value>, StoreError> {
        let position = self.live.iter().position(|doc| doc_id(doc) == Some(id));
        Ok(position.map(|index| self.live.remove(index)))
    }

    fn archive(&mut self, doc: Value) -> Result<(), StoreError> {
        self.archived.push(doc);
        Ok(())
    }
}
