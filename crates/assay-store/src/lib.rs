//! Store access layer for assaydb.
//!
//! This crate sits between the query engine and actual document storage:
//!
//! - [`compile`] turns a translated query tree into the store's wire form,
//!   a Mongo-style JSON filter document.
//! - [`Store`] is an explicit handle over a [`Backend`], providing search
//!   plus the versioned mutation operations: inserts create version 1 of a
//!   record, updates write a fresh document with a bumped `_version` and
//!   move the superseded version into an archive, and searches only ever
//!   see the live collection.
//! - [`MemoryBackend`] is an in-memory backend that evaluates wire filters
//!   directly; tests and the CLI demo store run on it.

#![warn(missing_docs)]

mod backend;
mod compile;
mod error;
mod eval;
mod store;

pub use backend::{Backend, MemoryBackend};
pub use compile::compile;
pub use error::StoreError;
pub use store::{Store, UpdateRequest};
