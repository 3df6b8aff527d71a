//! Snippet fetch pipeline.
//!
//! Runs the translator over an ordered list of transactions with a bounded
//! number of concurrent workers:
//! normalize → run → (per transaction) batch correlation → translate.
//!
//! Failures stay in their slot: a transport error, an error status or a
//! malformed batch body degrades that one result and the run carries on.

mod assemble;
mod cancel;
mod progress;
mod workers;

use crate::batch::BatchPair;
use crate::translate::SnippetOutcome;

pub use cancel::CancelToken;
pub use progress::ProgressUpdate;
pub use workers::{run, RunHandle, RunReport};

/// Concurrent snippet requests when nothing else is configured.
pub const DEFAULT_CONCURRENCY: usize = 5;

/// Snippet for one sub-request of a batch envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchSnippet {
    pub id: String,
    pub method: String,
    /// URL as written in the envelope (relative).
    pub url: String,
    pub snippet: SnippetOutcome,
}

/// Everything shown for one transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct SnippetResult {
    /// `METHOD URL`.
    pub request_line: String,
    pub method: String,
    pub url: String,
    pub request_body: String,
    /// Response body, base64 already decoded.
    pub response_body: String,
    pub snippet: SnippetOutcome,
    /// Sub-request/sub-response pairs; empty unless a batch envelope.
    pub batch_pairs: Vec<BatchPair>,
    /// One entry per sub-request, in request order.
    pub batch_snippets: Vec<BatchSnippet>,
}

impl SnippetResult {
    pub fn code(&self) -> Option<&str> {
        self.snippet.code()
    }

    pub fn is_batch(&self) -> bool {
        !self.batch_pairs.is_empty()
    }
}
