pub mod config;
pub mod logging;

pub mod batch;
pub mod capture;
pub mod domains;
pub mod error;
pub mod language;
pub mod pipeline;
pub mod prefs;
pub mod script;
pub mod session;
pub mod translate;
