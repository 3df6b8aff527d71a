//! Tests for the generate subcommand.

use super::parse;
use crate::cli::{Cli, CliCommand};
use clap::Parser;
use gxray_core::language::SnippetLanguage;
use std::path::{Path, PathBuf};

#[test]
fn cli_parse_generate_defaults() {
    match parse(&["gxray", "generate", "capture.har"]) {
        CliCommand::Generate {
            har,
            lang,
            mode,
            jobs,
            endpoint,
            save,
        } => {
            assert_eq!(har, PathBuf::from("capture.har"));
            assert!(lang.is_none());
            assert!(!mode.extended && !mode.standard);
            assert!(jobs.is_none());
            assert!(endpoint.is_none());
            assert!(save.is_none());
        }
        _ => panic!("expected Generate"),
    }
}

#[test]
fn cli_parse_generate_all_flags() {
    match parse(&[
        "gxray",
        "generate",
        "capture.har",
        "--lang",
        "c#",
        "--extended",
        "--jobs",
        "8",
        "--endpoint",
        "http://127.0.0.1:8080/snippets",
        "--save",
        "out.cs",
    ]) {
        CliCommand::Generate {
            lang,
            mode,
            jobs,
            endpoint,
            save,
            ..
        } => {
            assert_eq!(lang, Some(SnippetLanguage::CSharp));
            assert!(mode.extended);
            assert_eq!(jobs, Some(8));
            assert_eq!(endpoint.as_deref(), Some("http://127.0.0.1:8080/snippets"));
            assert_eq!(save, Some(Some(PathBuf::from("out.cs"))));
        }
        _ => panic!("expected Generate with flags"),
    }
}

#[test]
fn cli_parse_generate_save_without_path() {
    match parse(&["gxray", "generate", "capture.har", "--save"]) {
        CliCommand::Generate { save, .. } => assert_eq!(save, Some(None)),
        _ => panic!("expected Generate with --save"),
    }
}

#[test]
fn cli_parse_generate_language_alias() {
    match parse(&["gxray", "generate", "a.har", "--lang", "pwsh"]) {
        CliCommand::Generate { lang, har, .. } => {
            assert_eq!(lang, Some(SnippetLanguage::PowerShell));
            assert_eq!(har, Path::new("a.har"));
        }
        _ => panic!("expected Generate"),
    }
}

#[test]
fn cli_rejects_unknown_language() {
    assert!(Cli::try_parse_from(["gxray", "generate", "a.har", "--lang", "cobol"]).is_err());
}

#[test]
fn cli_rejects_conflicting_mode_flags() {
    assert!(
        Cli::try_parse_from(["gxray", "generate", "a.har", "--extended", "--standard"]).is_err()
    );
}
