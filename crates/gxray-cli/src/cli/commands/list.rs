//! `gxray list` – show the relevant API calls of a HAR file.

use anyhow::Result;
use gxray_core::capture::{self, Transaction};
use gxray_core::domains::{self, Mode};
use gxray_core::session::EmptySelection;
use std::path::Path;

pub fn run_list(har: &Path, mode: Mode) -> Result<()> {
    let capture = capture::read_capture(har)?;
    let relevant = capture::normalize(&capture, mode);
    if relevant.is_empty() {
        println!("{}", EmptySelection { mode });
        return Ok(());
    }

    println!("{:<4} {:<20} {:<7} {:<6} {}", "#", "STARTED", "METHOD", "STATUS", "URL");
    for (i, t) in relevant.iter().enumerate() {
        println!("{}", row(i + 1, t));
    }
    println!("{} call(s), mode {}", relevant.len(), mode);
    Ok(())
}

fn row(n: usize, t: &Transaction) -> String {
    let started = t
        .started_at
        .map(|at| at.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "-".to_string());
    let marker = if domains::is_extended_only(&t.url) {
        " [extended]"
    } else {
        ""
    };
    format!(
        "{:<4} {:<20} {:<7} {:<6} {}{}",
        n, started, t.method, t.response_status, t.url, marker
    )
}
