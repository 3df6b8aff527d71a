//! `gxray languages` – list snippet languages.

use gxray_core::language::SnippetLanguage;

pub fn run_languages(default: SnippetLanguage) {
    println!("{:<12} {:<12} {:<5}", "KEY", "NAME", "EXT");
    for lang in SnippetLanguage::ALL {
        let marker = if lang == default { "  (default)" } else { "" };
        println!(
            "{:<12} {:<12} {:<5}{}",
            lang.key(),
            lang.display_name(),
            lang.file_extension(),
            marker
        );
    }
}
