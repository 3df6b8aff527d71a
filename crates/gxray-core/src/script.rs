//! Export of generated snippets as a single script file.

use anyhow::{Context, Result};
use std::path::Path;

use crate::language::SnippetLanguage;
use crate::pipeline::SnippetResult;

/// Base name of an exported session script.
pub const SCRIPT_BASENAME: &str = "GraphXRaySession";

/// `GraphXRaySession.<ext>` for `language`.
pub fn script_file_name(language: SnippetLanguage) -> String {
    format!("{SCRIPT_BASENAME}.{}", language.file_extension())
}

/// Generated top-level snippets in order, separated by a blank line.
/// Results without a snippet are left out.
pub fn render_script<'a>(results: impl IntoIterator<Item = &'a SnippetResult>) -> String {
    results
        .into_iter()
        .filter_map(SnippetResult::code)
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Writes the rendered script to `path`. Returns the number of snippets written.
pub fn save_script<'a>(
    path: &Path,
    results: impl IntoIterator<Item = &'a SnippetResult>,
) -> Result<usize> {
    let codes: Vec<&str> = results.into_iter().filter_map(SnippetResult::code).collect();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create dir: {}", parent.display()))?;
    }
    std::fs::write(path, codes.join("\n\n"))
        .with_context(|| format!("write script: {}", path.display()))?;
    tracing::info!(snippets = codes.len(), "saved script to {}", path.display());
    Ok(codes.len())
}
