//! Worker pool: a fixed number of workers claim transactions from one cursor.
//!
//! Each slot is written once, by the worker that claimed its index, so the
//! output order is the input order whatever the completion order. Slot writes
//! and progress emission share one lock so updates arrive in increasing order.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::capture::Transaction;
use crate::error::FetchError;
use crate::language::SnippetLanguage;
use crate::translate::Translator;

use super::assemble::assemble;
use super::cancel::CancelToken;
use super::progress::ProgressUpdate;
use super::SnippetResult;

struct Shared {
    transactions: Arc<[Transaction]>,
    slots: Vec<OnceLock<Arc<SnippetResult>>>,
    cursor: AtomicUsize,
    completed: Mutex<usize>,
    progress_tx: mpsc::UnboundedSender<ProgressUpdate>,
    cancel: CancelToken,
}

impl Shared {
    /// Next unclaimed index, or `None` when cancelled or exhausted.
    fn claim(&self) -> Option<usize> {
        if self.cancel.is_cancelled() {
            return None;
        }
        let index = self.cursor.fetch_add(1, Ordering::SeqCst);
        (index < self.transactions.len()).then_some(index)
    }

    fn snapshot(&self) -> Vec<Arc<SnippetResult>> {
        self.slots
            .iter()
            .filter_map(|slot| slot.get().cloned())
            .collect()
    }

    /// Fills slot `index` and emits progress. The lock makes the slot write,
    /// the count and the snapshot one step.
    fn complete(&self, index: usize, result: SnippetResult) {
        let mut completed = self
            .completed
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if self.slots[index].set(Arc::new(result)).is_err() {
            tracing::warn!(index, "slot already filled; result dropped");
            return;
        }
        *completed += 1;
        let update = ProgressUpdate {
            completed: *completed,
            total: self.transactions.len(),
            snapshot: self.snapshot(),
        };
        // Receiver may be gone; progress is best-effort.
        let _ = self.progress_tx.send(update);
    }
}

/// Final state of a run.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// One slot per input transaction, in input order. `None` only for
    /// transactions never claimed because the run was cancelled.
    pub slots: Vec<Option<Arc<SnippetResult>>>,
    pub cancelled: bool,
}

impl RunReport {
    /// Filled slots in input order.
    pub fn results(&self) -> impl Iterator<Item = &Arc<SnippetResult>> {
        self.slots.iter().flatten()
    }

    pub fn completed(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }
}

/// Handle to an in-flight run.
///
/// Dropping the handle without [`RunHandle::wait`] aborts the workers at
/// their next await point; prefer `cancel()` followed by `wait()`.
pub struct RunHandle {
    shared: Arc<Shared>,
    workers: JoinSet<()>,
    progress_rx: Option<mpsc::UnboundedReceiver<ProgressUpdate>>,
}

impl std::fmt::Debug for RunHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunHandle")
            .field("total", &self.total())
            .field("cancelled", &self.shared.cancel.is_cancelled())
            .finish_non_exhaustive()
    }
}

impl RunHandle {
    /// Token that stops the run from claiming more work.
    pub fn cancel_token(&self) -> CancelToken {
        self.shared.cancel.clone()
    }

    pub fn cancel(&self) {
        self.shared.cancel.cancel();
    }

    pub fn total(&self) -> usize {
        self.shared.transactions.len()
    }

    /// Progress stream. Closes when the run has finished and its report was
    /// taken with [`RunHandle::wait`]. Can be taken once.
    pub fn take_progress(&mut self) -> Option<mpsc::UnboundedReceiver<ProgressUpdate>> {
        self.progress_rx.take()
    }

    /// Waits for every worker to stop and returns the slots.
    pub async fn wait(mut self) -> RunReport {
        while let Some(joined) = self.workers.join_next().await {
            if let Err(e) = joined {
                tracing::warn!(error = %e, "snippet worker task ended abnormally");
            }
        }
        let slots = self
            .shared
            .slots
            .iter()
            .map(|slot| slot.get().cloned())
            .collect();
        RunReport {
            slots,
            cancelled: self.shared.cancel.is_cancelled(),
        }
    }
}

async fn worker(shared: Arc<Shared>, translator: Arc<Translator>, language: SnippetLanguage) {
    while let Some(index) = shared.claim() {
        let joined = tokio::task::spawn_blocking({
            let shared = Arc::clone(&shared);
            let translator = Arc::clone(&translator);
            move || assemble(&translator, language, &shared.transactions[index])
        })
        .await;
        let result = joined.unwrap_or_else(|e| {
            tracing::warn!(index, error = %e, "snippet generation task failed");
            SnippetResult::failed(&shared.transactions[index], FetchError::Worker(e.to_string()))
        });
        shared.complete(index, result);
    }
}

/// Starts a run over `transactions` with `concurrency` workers (at least one).
///
/// Must be called from within a tokio runtime.
pub fn run(
    transactions: Arc<[Transaction]>,
    language: SnippetLanguage,
    concurrency: usize,
    translator: Arc<Translator>,
) -> RunHandle {
    let concurrency = concurrency.max(1);
    let (progress_tx, progress_rx) = mpsc::unbounded_channel();
    let slots = (0..transactions.len()).map(|_| OnceLock::new()).collect();
    let total = transactions.len();
    let shared = Arc::new(Shared {
        transactions,
        slots,
        cursor: AtomicUsize::new(0),
        completed: Mutex::new(0),
        progress_tx,
        cancel: CancelToken::new(),
    });

    tracing::info!(total, concurrency, %language, "starting snippet run");
    let mut workers = JoinSet::new();
    for _ in 0..concurrency {
        workers.spawn(worker(
            Arc::clone(&shared),
            Arc::clone(&translator),
            language,
        ));
    }

    RunHandle {
        shared,
        workers,
        progress_rx: Some(progress_rx),
    }
}
