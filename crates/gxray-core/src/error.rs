//! Error types surfaced by the core.
//!
//! Only [`CaptureError`] ever reaches the user as a failure. [`FetchError`] is
//! carried inside a result slot so a single bad transaction degrades instead of
//! aborting the run.

use std::path::PathBuf;
use thiserror::Error;

/// The capture container could not be used at all.
#[derive(Debug, Error)]
pub enum CaptureError {
    /// Reading the capture file failed.
    #[error("read HAR file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The input is not JSON.
    #[error("parse HAR JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// The input is JSON but has no `log.entries` array.
    #[error("not a HAR file: missing log.entries array")]
    MissingEntries,
}

/// Why a snippet could not be produced for one transaction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Curl reported an error (timeout, connection, TLS, ...).
    #[error("transport: {0}")]
    Transport(String),
    /// The service answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    Status { status: u32, body: String },
    /// The worker task running the request did not complete.
    #[error("worker: {0}")]
    Worker(String),
}

impl FetchError {
    /// HTTP status for diagnostics, if the service answered at all.
    pub fn status(&self) -> Option<u32> {
        match self {
            FetchError::Status { status, .. } => Some(*status),
            FetchError::Transport(_) | FetchError::Worker(_) => None,
        }
    }
}
