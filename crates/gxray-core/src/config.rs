use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::language::SnippetLanguage;
use crate::pipeline::DEFAULT_CONCURRENCY;
use crate::translate::{CurlOptions, Translator, DEFAULT_SNIPPET_ENDPOINT};

/// Global configuration loaded from `~/.config/gxray/config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GxrayConfig {
    /// Maximum concurrent requests to the snippet service.
    pub concurrency: usize,
    /// Snippet service endpoint (without query parameters).
    pub snippet_endpoint: String,
    /// Language used when none is given on the command line.
    pub default_language: SnippetLanguage,
    /// Connect timeout for each snippet request, in seconds.
    pub connect_timeout_secs: u64,
    /// Total timeout for each snippet request, in seconds.
    pub timeout_secs: u64,
}

impl Default for GxrayConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            snippet_endpoint: DEFAULT_SNIPPET_ENDPOINT.to_string(),
            default_language: SnippetLanguage::default(),
            connect_timeout_secs: 15,
            timeout_secs: 60,
        }
    }
}

impl GxrayConfig {
    pub fn curl_options(&self) -> CurlOptions {
        CurlOptions {
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }

    /// Curl-backed translator for the configured endpoint.
    pub fn translator(&self) -> Arc<Translator> {
        Arc::new(Translator::with_curl(
            self.snippet_endpoint.clone(),
            self.curl_options(),
        ))
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("gxray")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<GxrayConfig> {
    load_or_init_at(&config_path()?)
}

/// Like [`load_or_init`] for an explicit path.
pub fn load_or_init_at(path: &Path) -> Result<GxrayConfig> {
    if !path.exists() {
        let default_cfg = GxrayConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml).with_context(|| format!("write config: {}", path.display()))?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data =
        fs::read_to_string(path).with_context(|| format!("read config: {}", path.display()))?;
    let cfg: GxrayConfig =
        toml::from_str(&data).with_context(|| format!("parse config: {}", path.display()))?;
    Ok(cfg)
}
