use std::path::PathBuf;

use thiserror::Error;

/// Failures raised while reading the match and delivery sources.
///
/// All variants are fatal for a load: the caller gets either both tables or
/// none of them.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("data unavailable: cannot read {path}: {source}")]
    DataUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed date {raw:?} for match {match_id}")]
    MalformedDate { match_id: u64, raw: String },

    #[error("malformed record in {path} (line {line}): {reason}")]
    MalformedRecord {
        path: PathBuf,
        line: u64,
        reason: String,
    },
}

impl DataError {
    pub fn is_unavailable(&self) -> bool {
        matches!(self, DataError::DataUnavailable { .. })
    }
}
