//! CLI for gxray.

mod commands;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use gxray_core::config;
use gxray_core::domains::Mode;
use gxray_core::language::SnippetLanguage;
use gxray_core::prefs::Preferences;
use std::path::PathBuf;

use commands::{
    run_domains, run_generate, run_languages, run_list, run_mode, GenerateOptions,
};

/// Top-level CLI for gxray.
#[derive(Debug, Parser)]
#[command(name = "gxray")]
#[command(
    about = "gxray: turn Microsoft Graph calls recorded in a HAR file into code snippets",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

/// Per-invocation override of the persisted mode.
#[derive(Debug, Clone, Copy, Default, Args)]
pub struct ModeArgs {
    /// Include extended (portal/admin) API domains for this invocation.
    #[arg(long, conflicts_with = "standard")]
    pub extended: bool,
    /// Only Microsoft Graph domains for this invocation.
    #[arg(long)]
    pub standard: bool,
}

impl ModeArgs {
    /// Flag override if given, else the persisted mode.
    pub fn resolve(self, prefs: &Preferences) -> Mode {
        match (self.extended, self.standard) {
            (true, _) => Mode::Extended,
            (_, true) => Mode::Standard,
            _ => prefs.mode(),
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// List the relevant API calls in a HAR file, in start-time order.
    List {
        /// Path to the HAR file.
        har: PathBuf,
        #[command(flatten)]
        mode: ModeArgs,
    },

    /// Generate code snippets for the relevant API calls in a HAR file.
    Generate {
        /// Path to the HAR file.
        har: PathBuf,
        /// Target language (default from config).
        #[arg(long, value_name = "LANG")]
        lang: Option<SnippetLanguage>,
        #[command(flatten)]
        mode: ModeArgs,
        /// Concurrent snippet requests (default from config).
        #[arg(long, value_name = "N")]
        jobs: Option<usize>,
        /// Snippet service endpoint (default from config).
        #[arg(long, value_name = "URL")]
        endpoint: Option<String>,
        /// Save the generated snippets as one script. Without PATH, writes
        /// GraphXRaySession.<ext> in the current directory.
        #[arg(long, value_name = "PATH", num_args = 0..=1)]
        save: Option<Option<PathBuf>>,
    },

    /// Show or persist the domain mode.
    Mode {
        /// `standard` or `extended`; omit to show the current mode.
        mode: Option<Mode>,
    },

    /// List the supported snippet languages.
    Languages,

    /// Print the registered API domains as match patterns.
    Domains,
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);
        let prefs = Preferences::open_default()?;

        match cli.command {
            CliCommand::List { har, mode } => run_list(&har, mode.resolve(&prefs))?,
            CliCommand::Generate {
                har,
                lang,
                mode,
                jobs,
                endpoint,
                save,
            } => {
                let opts = GenerateOptions {
                    har,
                    language: lang.unwrap_or(cfg.default_language),
                    mode: mode.resolve(&prefs),
                    concurrency: jobs.unwrap_or(cfg.concurrency),
                    endpoint: endpoint.unwrap_or_else(|| cfg.snippet_endpoint.clone()),
                    save,
                };
                run_generate(&cfg, opts).await?;
            }
            CliCommand::Mode { mode } => run_mode(&prefs, mode)?,
            CliCommand::Languages => run_languages(cfg.default_language),
            CliCommand::Domains => run_domains(),
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
