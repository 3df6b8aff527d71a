//! Tracing setup for gxray.
//!
//! Events go to `~/.local/state/gxray/gxray.log`. `RUST_LOG` overrides the
//! default filter. If the log file cannot be opened the caller switches to
//! [`init_logging_stderr`].

use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,gxray_core=debug";

/// One write target per event: a handle on the log file, or stderr when the
/// handle could not be duplicated.
enum LogSink {
    File(File),
    Stderr,
}

impl io::Write for LogSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            LogSink::File(f) => f.write(buf),
            LogSink::Stderr => io::stderr().lock().write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            LogSink::File(f) => f.flush(),
            LogSink::Stderr => io::stderr().lock().flush(),
        }
    }
}

/// Appending log file shared by every event.
struct LogFile(File);

impl LogFile {
    fn open(path: &Path) -> Result<Self> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).with_context(|| format!("create log dir: {}", dir.display()))?;
        }
        let file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("open log file: {}", path.display()))?;
        Ok(Self(file))
    }
}

impl<'a> MakeWriter<'a> for LogFile {
    type Writer = LogSink;

    fn make_writer(&'a self) -> Self::Writer {
        self.0.try_clone().map(LogSink::File).unwrap_or(LogSink::Stderr)
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// `~/.local/state/gxray/gxray.log`.
pub fn log_file_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("gxray")?;
    Ok(xdg_dirs.get_state_home().join("gxray").join("gxray.log"))
}

/// Installs the global subscriber writing to [`log_file_path`].
pub fn init_logging() -> Result<()> {
    init_logging_at(&log_file_path()?)
}

/// Installs the global subscriber writing to `path`. Fails if the file
/// cannot be opened or a subscriber is already installed.
pub fn init_logging_at(path: &Path) -> Result<()> {
    let sink = LogFile::open(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(sink)
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("install tracing subscriber: {e}"))?;
    tracing::info!("logging to {}", path.display());
    Ok(())
}

/// Installs a stderr-only subscriber. A no-op if one is already installed.
pub fn init_logging_stderr() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(io::stderr)
        .with_ansi(false)
        .try_init();
}
