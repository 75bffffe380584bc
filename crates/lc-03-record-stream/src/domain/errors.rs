//! # Record Stream Errors

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecordStreamError {
    /// The record could not be serialized for hashing or writing.
    #[error("Record encoding failed: {0}")]
    Encode(String),

    /// A record file could not be created or written.
    #[error("Record file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
