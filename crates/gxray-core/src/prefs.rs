//! Persisted user preferences (JSON files under the XDG state dir).
//!
//! Each preference lives in its own `<key>.json` file holding a bare JSON
//! value. Only the extended-mode flag exists today.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::domains::Mode;

/// Storage key of the extended-mode flag.
pub const EXTENDED_MODE_KEY: &str = "graphxray-ultraXRayMode";

/// Preference store rooted at one directory.
#[derive(Debug, Clone)]
pub struct Preferences {
    dir: PathBuf,
}

impl Preferences {
    /// Default directory: `~/.local/state/gxray`.
    pub fn default_dir() -> Result<PathBuf> {
        let xdg_dirs = xdg::BaseDirectories::with_prefix("gxray")?;
        Ok(xdg_dirs.get_state_home().join("gxray"))
    }

    pub fn open_default() -> Result<Self> {
        Ok(Self::at(Self::default_dir()?))
    }

    pub fn at(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    /// Extended-mode flag. Missing file means off; unreadable or invalid
    /// content is logged and also means off.
    pub fn extended_mode(&self) -> bool {
        let path = self.path_for(EXTENDED_MODE_KEY);
        match load_bool(&path) {
            Ok(value) => value.unwrap_or(false),
            Err(e) => {
                tracing::warn!("ignoring preference {}: {e:#}", path.display());
                false
            }
        }
    }

    pub fn mode(&self) -> Mode {
        Mode::from_extended_flag(self.extended_mode())
    }

    /// Persist the extended-mode flag (creates the directory if needed).
    pub fn set_extended_mode(&self, on: bool) -> Result<()> {
        save_bool(&self.path_for(EXTENDED_MODE_KEY), on)
    }

    pub fn set_mode(&self, mode: Mode) -> Result<()> {
        self.set_extended_mode(mode.is_extended())
    }
}

fn load_bool(path: &Path) -> Result<Option<bool>> {
    let bytes = match std::fs::read(path) {
        Ok(b) => b,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e).with_context(|| format!("read preference: {}", path.display())),
    };
    let value: bool = serde_json::from_slice(&bytes)
        .with_context(|| format!("parse preference: {}", path.display()))?;
    Ok(Some(value))
}

fn save_bool(path: &Path, value: bool) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create dir: {}", parent.display()))?;
    }
    let json = serde_json::to_string(&value).context("serialize preference")?;
    std::fs::write(path, json).with_context(|| format!("write preference: {}", path.display()))?;
    Ok(())
}
