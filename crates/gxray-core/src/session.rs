//! Session: the one place that owns the selected language and mode, the
//! loaded capture, its relevant transactions and the in-flight run.
//!
//! Changing the mode re-filters the loaded capture; starting a run cancels
//! and drains the previous one so two runs never write to the same view.

use std::fmt;
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::capture::{self, Capture, Transaction};
use crate::domains::Mode;
use crate::language::SnippetLanguage;
use crate::pipeline::{self, CancelToken, ProgressUpdate, RunHandle, RunReport};
use crate::translate::Translator;

/// The relevant set is empty for the current mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmptySelection {
    pub mode: Mode,
}

impl fmt::Display for EmptySelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.mode {
            Mode::Standard => f.write_str(
                "No Microsoft Graph API calls found in this HAR file. \
                 Try enabling extended mode to see more API calls.",
            ),
            Mode::Extended => f.write_str("No matching API calls found in this HAR file."),
        }
    }
}

impl std::error::Error for EmptySelection {}

#[derive(Debug)]
pub struct Session {
    translator: Arc<Translator>,
    concurrency: usize,
    language: SnippetLanguage,
    mode: Mode,
    capture: Option<Capture>,
    relevant: Arc<[Transaction]>,
    active: Option<RunHandle>,
}

impl Session {
    pub fn new(
        translator: Arc<Translator>,
        concurrency: usize,
        language: SnippetLanguage,
        mode: Mode,
    ) -> Self {
        Self {
            translator,
            concurrency: concurrency.max(1),
            language,
            mode,
            capture: None,
            relevant: Arc::from(Vec::<Transaction>::new()),
            active: None,
        }
    }

    pub fn language(&self) -> SnippetLanguage {
        self.language
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    pub fn capture(&self) -> Option<&Capture> {
        self.capture.as_ref()
    }

    /// Relevant transactions of the loaded capture, in start-time order.
    pub fn relevant(&self) -> &[Transaction] {
        &self.relevant
    }

    /// Replaces the loaded capture. Any active run is cancelled.
    /// Returns the number of relevant transactions.
    pub fn load_capture(&mut self, capture: Capture) -> Result<usize, EmptySelection> {
        self.cancel();
        self.capture = Some(capture);
        self.refilter()
    }

    /// Switches the mode and re-filters the loaded capture, if any.
    pub fn set_mode(&mut self, mode: Mode) -> Result<usize, EmptySelection> {
        if mode != self.mode {
            tracing::debug!(from = %self.mode, to = %mode, "mode changed");
            self.mode = mode;
        }
        self.refilter()
    }

    /// Takes effect on the next run.
    pub fn set_language(&mut self, language: SnippetLanguage) {
        self.language = language;
    }

    fn refilter(&mut self) -> Result<usize, EmptySelection> {
        let relevant = self
            .capture
            .as_ref()
            .map(|c| capture::normalize(c, self.mode))
            .unwrap_or_default();
        self.relevant = Arc::from(relevant);
        if self.relevant.is_empty() {
            return Err(EmptySelection { mode: self.mode });
        }
        tracing::info!(
            mode = %self.mode,
            relevant = self.relevant.len(),
            "relevant transactions selected"
        );
        Ok(self.relevant.len())
    }

    /// Starts generating snippets for the relevant set in the current
    /// language. A previous run is cancelled and drained first. Returns the
    /// progress stream of the new run.
    pub async fn start(&mut self) -> mpsc::UnboundedReceiver<ProgressUpdate> {
        if let Some(previous) = self.active.take() {
            previous.cancel();
            let report = previous.wait().await;
            tracing::debug!(completed = report.completed(), "previous run drained");
        }
        let mut handle = pipeline::run(
            Arc::clone(&self.relevant),
            self.language,
            self.concurrency,
            Arc::clone(&self.translator),
        );
        // A fresh handle always still has its receiver.
        let progress = handle.take_progress().unwrap_or_else(|| mpsc::unbounded_channel().1);
        self.active = Some(handle);
        progress
    }

    /// Cancellation token of the active run, for use from another task.
    pub fn cancel_token(&self) -> Option<CancelToken> {
        self.active.as_ref().map(RunHandle::cancel_token)
    }

    /// Requests cancellation of the active run, if any.
    pub fn cancel(&self) {
        if let Some(active) = &self.active {
            active.cancel();
        }
    }

    /// Waits for the active run to end. `None` if nothing was started.
    pub async fn finish(&mut self) -> Option<RunReport> {
        let handle = self.active.take()?;
        Some(handle.wait().await)
    }

    /// Drops the capture and its relevant set, cancelling any active run.
    pub fn clear(&mut self) {
        self.cancel();
        self.active = None;
        self.capture = None;
        self.relevant = Arc::from(Vec::<Transaction>::new());
    }
}
