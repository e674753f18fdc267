//! Implementations of the `assaydb` subcommands.

pub mod add;
pub mod fields;
pub mod history;
pub mod insert;
pub mod search;
pub mod shared;
pub mod translate;
pub mod update;
