//! Query building and translation for assay record searches.
//!
//! Queries exist in three forms and this crate converts between them:
//!
//! - **Human string**: a line-oriented text form, e.g.
//!   `grouping contains copper`, with `AND`/`OR` connector lines between
//!   terms. Parsed and re-emitted by the codec.
//! - **Term model**: the validated, editable form — an ordered list of
//!   `(field, comparison, value)` terms and the connectors joining them.
//!   This is [`Query`], the type callers build against.
//! - **Query tree**: the translated form, a nested boolean tree of typed
//!   predicates ([`QueryNode`]) ready for a store access layer to compile
//!   into its wire format.
//!
//! Terms against the repeated `measurement.results` array get special
//! treatment during translation: AND-connected result terms are
//! consolidated into a single element match, and numeric value constraints
//! expand per measurement shape (`measurement`, `range`, `limit`).
//!
//! # Example
//!
//! ```
//! use assay_query::Query;
//!
//! let query = Query::parse("grouping contains copper\nAND\nmeasurement.results.value is less than 10")?;
//! let tree = query.translate()?;
//! # Ok::<(), assay_query::QueryError>(())
//! ```

#![warn(missing_docs)]

mod codec;
mod consolidate;
mod error;
mod expand;
mod field;
mod node;
mod query;
mod synonyms;
mod term;
mod translate;
mod validate;

pub use error::{ParseErrorKind, QueryError};
pub use field::{Field, FieldKind, ResultField};
pub use node::{
    CompareOp, QueryNode, ResultPredicate, StringPattern, ValueConstraint, ValueSlot,
};
pub use query::Query;
pub use synonyms::SynonymTable;
pub use term::{Comparison, Connector, Number, Term, Value};
