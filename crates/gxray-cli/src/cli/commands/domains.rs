//! `gxray domains` – print the domain registry.

use gxray_core::domains::{self, Tier};

pub fn run_domains() {
    for entry in domains::all_domains() {
        let tier = match entry.tier {
            Tier::Standard => "standard",
            Tier::Extended => "extended",
        };
        println!("{:<9} {}/*", tier, entry.base);
    }
}
