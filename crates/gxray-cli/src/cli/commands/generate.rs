//! `gxray generate` – fetch snippets for the relevant calls of a HAR file.

use anyhow::Result;
use gxray_core::batch::BatchPair;
use gxray_core::capture;
use gxray_core::config::GxrayConfig;
use gxray_core::domains::Mode;
use gxray_core::language::SnippetLanguage;
use gxray_core::pipeline::{ProgressUpdate, SnippetResult};
use gxray_core::script;
use gxray_core::session::Session;
use gxray_core::translate::{SnippetOutcome, Translator};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;

const PROGRESS_INTERVAL_MS: u128 = 250;

/// Resolved options for one `generate` invocation (flags over config).
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub har: PathBuf,
    pub language: SnippetLanguage,
    pub mode: Mode,
    pub concurrency: usize,
    pub endpoint: String,
    /// `Some(None)`: save under the default name in the current directory.
    pub save: Option<Option<PathBuf>>,
}

pub async fn run_generate(cfg: &GxrayConfig, opts: GenerateOptions) -> Result<()> {
    let capture = capture::read_capture(&opts.har)?;
    let translator = Arc::new(Translator::with_curl(
        opts.endpoint.clone(),
        cfg.curl_options(),
    ));
    let mut session = Session::new(translator, opts.concurrency, opts.language, opts.mode);
    if let Err(empty) = session.load_capture(capture) {
        println!("{empty}");
        return Ok(());
    }

    let progress = session.start().await;
    let printer = tokio::spawn(print_progress(progress));

    let ctrl_c = session.cancel_token().map(|token| {
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                eprintln!("\ncancelling: waiting for in-flight requests...");
                token.cancel();
            }
        })
    });

    let report = session.finish().await;
    if let Some(ctrl_c) = ctrl_c {
        ctrl_c.abort();
    }
    let _ = printer.await;

    let Some(report) = report else {
        return Ok(());
    };
    for (i, result) in report.results().enumerate() {
        print_result(i + 1, session.language(), result);
    }

    if report.cancelled {
        println!(
            "Cancelled after {} of {} call(s).",
            report.completed(),
            report.slots.len()
        );
    }
    let failed = report.results().filter(|r| r.snippet.is_failed()).count();
    tracing::info!(
        completed = report.completed(),
        failed,
        cancelled = report.cancelled,
        "generate finished"
    );

    if let Some(save) = opts.save {
        let path = save_path(save.as_deref(), session.language())?;
        let written = script::save_script(&path, report.results().map(Arc::as_ref))?;
        println!("Saved {written} snippet(s) to {}", path.display());
    }
    Ok(())
}

/// Prints a one-line progress meter to stderr, throttled except for the last update.
async fn print_progress(mut rx: mpsc::UnboundedReceiver<ProgressUpdate>) {
    let mut last_print: Option<Instant> = None;
    let mut printed = false;
    while let Some(update) = rx.recv().await {
        let due = last_print.map_or(true, |at| at.elapsed().as_millis() >= PROGRESS_INTERVAL_MS);
        if due || update.is_done() {
            eprint!(
                "\r  {} / {} call(s) ({:.0}%)  ",
                update.completed,
                update.total,
                update.fraction() * 100.0
            );
            let _ = std::io::stderr().flush();
            last_print = Some(Instant::now());
            printed = true;
        }
    }
    if printed {
        eprintln!();
    }
}

fn save_path(requested: Option<&Path>, language: SnippetLanguage) -> Result<PathBuf> {
    let file_name = script::script_file_name(language);
    Ok(match requested {
        None => std::env::current_dir()?.join(file_name),
        Some(p) if p.is_dir() => p.join(file_name),
        Some(p) => p.to_path_buf(),
    })
}

fn outcome_text(outcome: &SnippetOutcome) -> String {
    match outcome {
        SnippetOutcome::Generated(code) if !code.is_empty() => code.clone(),
        SnippetOutcome::Generated(_) => "(empty snippet)".to_string(),
        SnippetOutcome::Skipped(_) => "(snippets are not available for this API)".to_string(),
        SnippetOutcome::Failed(err) => format!("(snippet failed: {err})"),
    }
}

fn print_pair(pair: &BatchPair) {
    let response = pair
        .response
        .as_ref()
        .map(|r| format!("{}", r.status))
        .unwrap_or_else(|| "no response".to_string());
    println!(
        "  [{}] {} {} -> {}",
        pair.id, pair.request.method, pair.request.url, response
    );
}

fn print_result(n: usize, language: SnippetLanguage, result: &SnippetResult) {
    println!("== {n}. {}", result.request_line);
    if result.is_batch() {
        println!("-- batch requests");
        for pair in &result.batch_pairs {
            print_pair(pair);
        }
    }
    println!("-- {}", language.display_name());
    println!("{}", outcome_text(&result.snippet));
    for sub in &result.batch_snippets {
        println!("-- [{}] {} {}", sub.id, sub.method, sub.url);
        println!("{}", outcome_text(&sub.snippet));
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use gxray_core::error::FetchError;
    use gxray_core::translate::SkipReason;

    #[test]
    fn save_path_defaults_to_session_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let p = save_path(Some(dir.path()), SnippetLanguage::Java).unwrap();
        assert_eq!(p, dir.path().join("GraphXRaySession.java"));

        let file = dir.path().join("out.ps1");
        assert_eq!(save_path(Some(file.as_path()), SnippetLanguage::Go).unwrap(), file);

        let p = save_path(None, SnippetLanguage::Python).unwrap();
        assert!(p.ends_with("GraphXRaySession.py"));
    }

    #[test]
    fn outcome_text_describes_each_case() {
        assert_eq!(outcome_text(&SnippetOutcome::Generated("x".to_string())), "x");
        assert!(outcome_text(&SnippetOutcome::Skipped(SkipReason::ExtendedDomain))
            .contains("not available"));
        let failed = SnippetOutcome::Failed(FetchError::Status {
            status: 500,
            body: "boom".to_string(),
        });
        assert_eq!(outcome_text(&failed), "(snippet failed: HTTP 500: boom)");
    }
}
