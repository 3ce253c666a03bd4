//! Error type for the loading paths.
//!
//! Classification itself never fails; only reading configuration, suffix
//! lists and databases from disk can.

use std::path::PathBuf;

/// Error type for loading configuration and reference data.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid public suffix list: {0}")]
    SuffixList(String),
    #[error("Invalid referrer database: {0}")]
    Database(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Read a file to a string, attaching the path to any I/O error.
pub fn read_to_string(path: &std::path::Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })
}
