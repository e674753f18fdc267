//! CLI support for the `assaydb` binary.

pub mod args;
pub mod commands;
pub mod store_file;
