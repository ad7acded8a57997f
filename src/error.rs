//! Error types for the lead dashboard library.
//!
//! Binaries wrap these in `anyhow` for propagation.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DashboardError>;

#[derive(Error, Debug)]
pub enum DashboardError {
    /// A required column is absent from the uploaded data
    #[error("missing required column '{column}'")]
    MissingColumn { column: &'static str },

    /// The content cannot be parsed as tabular data
    #[error("malformed lead file: {0}")]
    MalformedFile(String),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unknown lead field '{0}'")]
    UnknownField(String),

    #[error("hierarchy path must name at least one field")]
    EmptyHierarchyPath,

    #[error("invalid dashboard config: {0}")]
    Config(String),
}

impl From<csv::Error> for DashboardError {
    fn from(e: csv::Error) -> Self {
        DashboardError::MalformedFile(e.to_string())
    }
}
