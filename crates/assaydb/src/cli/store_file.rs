//! JSON-lines persistence for the demo store directory.
//!
//! A store directory holds two files, `live.jsonl` and `archive.jsonl`,
//! one document per line. The whole store is loaded into a
//! [`MemoryBackend`], operated on, and written back, which keeps the CLI
//! usable without a running document database.

use std::{fs, path::Path};

use serde_json::Value;

use assay_store::{MemoryBackend, Store, StoreError};

/// The live collection file within a store directory.
const LIVE_FILE: &str = "live.jsonl";

/// The archive file within a store directory.
const ARCHIVE_FILE: &str = "archive.jsonl";

/// Opens a store directory, loading its documents. A missing directory or
/// file loads as empty.
pub fn open(dir: &Path) -> Result<Store<MemoryBackend>, StoreError> {
    let live = read_docs(&dir.join(LIVE_FILE))?;
    let archived = read_docs(&dir.join(ARCHIVE_FILE))?;
    Ok(Store::new(MemoryBackend::with_documents(live, archived)))
}

/// Writes a store's documents back to its directory.
pub fn save(dir: &Path, store: Store<MemoryBackend>) -> Result<(), StoreError> {
    fs::create_dir_all(dir)?;
    let backend = store.into_backend();
    write_docs(&dir.join(LIVE_FILE), backend.live())?;
    write_docs(&dir.join(ARCHIVE_FILE), backend.archived())
}

/// Reads one document per line.
fn read_docs(path: &Path) -> Result<Vec<Value>, StoreError> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    fs::read_to_string(path)?
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| Ok(serde_json::from_str(line)?))
        .collect()
}

/// Writes one document per line.
fn write_docs(path: &Path, docs: &[Value]) -> Result<(), StoreError> {
    let mut out = String::new();
    for doc in docs {
        out.push_str(&serde_json::to_string(doc)?);
        out.push('\n');
    }
    fs::write(path, out)?;
    Ok(())
}
