//! Error types shared across the loader and the HTTP layer.

use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;

/// Failure to turn the CSV file into a [`crate::models::ClimateTable`].
///
/// Both variants are fatal for the load: the server keeps running but shows
/// the message on every page instead of charts.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Data file not found: {}. Make sure the CSV file is next to the dashboard or pass --data.", .0.display())]
    FileNotFound(PathBuf),

    #[error("Failed to read data file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid data file: {0}")]
    DataFormat(#[from] DataFormatError),
}

/// The CSV does not match the expected daily climate layout.
#[derive(Debug, Error)]
pub enum DataFormatError {
    #[error("missing required column '{0}'")]
    MissingColumn(String),

    #[error("line {line}: cannot parse date '{value}' (expected YYYY-MM-DD)")]
    InvalidDate { line: usize, value: String },

    #[error("line {line}: column '{column}' has non-numeric value '{value}'")]
    InvalidNumber {
        line: usize,
        column: String,
        value: String,
    },

    #[error("line {line}: duplicate date {date}")]
    DuplicateDate { line: usize, date: NaiveDate },

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
}
