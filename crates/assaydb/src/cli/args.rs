//! Clap argument definitions for the `assaydb` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Top-level CLI options.
#[derive(Parser)]
#[command(name = "assaydb")]
#[command(about = "Search and maintain radiopurity assay record stores")]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Flags shared by commands that open a store directory.
#[derive(Args, Debug, Clone)]
pub struct StoreArgs {
    /// Store directory (JSON-lines files; created on first insert)
    #[arg(short = 's', long = "store", default_value = "assaydb-store")]
    pub store: PathBuf,
}

/// Supported `assaydb` subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Run a query against the store
    Search {
        /// Human query string (newline-separated terms and AND/OR lines)
        query: String,

        /// Output matching documents as JSON instead of a table
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        /// Store location.
        store: StoreArgs,
    },

    /// Show how a query string translates, without searching
    Translate {
        /// Human query string
        query: String,

        /// Also print the parsed term list
        #[arg(long)]
        terms: bool,
    },

    /// Append a term to a query string and print the result
    Add {
        /// Field to compare, e.g. grouping or measurement.results.value
        field: String,

        /// Comparison phrase, e.g. "contains" or "is less than"
        comparison: String,

        /// Value to compare against
        value: String,

        /// Existing query string to extend (empty to start a new query)
        #[arg(short = 'q', long, default_value = "")]
        query: String,

        /// Join with OR instead of AND
        #[arg(long)]
        or: bool,

        /// Expand the value through the synonym table
        #[arg(long)]
        synonyms: bool,
    },

    /// List the queryable fields with their kinds and comparisons
    Fields,

    /// Validate a record file and insert it as a new version-1 document
    Insert {
        /// Path to a JSON assay record
        file: PathBuf,

        #[command(flatten)]
        /// Store location.
        store: StoreArgs,
    },

    /// Write a new version of a document, archiving the old one
    Update {
        /// Id of the live document to update
        id: String,

        /// Field update as path=json, e.g. sample.name='"copper"'
        /// (may be repeated)
        #[arg(long = "set", value_name = "PATH=JSON")]
        set: Vec<String>,

        /// JSON measurement result to append (may be repeated)
        #[arg(long = "add-result", value_name = "JSON")]
        add_results: Vec<String>,

        /// Index of a measurement result to remove (may be repeated)
        #[arg(long = "remove-result", value_name = "INDEX")]
        remove_results: Vec<usize>,

        #[command(flatten)]
        /// Store location.
        store: StoreArgs,
    },

    /// Show the archived version history of a document
    History {
        /// Id of the live document
        id: String,

        #[command(flatten)]
        /// Store location.
        store: StoreArgs,
    },
}
