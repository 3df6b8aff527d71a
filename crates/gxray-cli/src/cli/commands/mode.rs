//! `gxray mode` – show or persist the domain mode.

use anyhow::Result;
use gxray_core::domains::Mode;
use gxray_core::prefs::Preferences;

pub fn run_mode(prefs: &Preferences, mode: Option<Mode>) -> Result<()> {
    match mode {
        Some(mode) => {
            prefs.set_mode(mode)?;
            tracing::info!(%mode, "mode saved");
            println!("Mode set to {mode}.");
        }
        None => println!("{}", prefs.mode()),
    }
    Ok(())
}
