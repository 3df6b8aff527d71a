//! CLI command handlers. Each command is in its own file.

mod domains;
mod generate;
mod languages;
mod list;
mod mode;

pub use domains::run_domains;
pub use generate::{run_generate, GenerateOptions};
pub use languages::run_languages;
pub use list::run_list;
pub use mode::run_mode;
