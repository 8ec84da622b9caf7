//! Tests for probe, stats, checksum and the error line.

use super::parse;
use crate::cli::{error_line, Cli, CliCommand};
use anyhow::Context;
use geomirror_core::MirrorError;
use clap::Parser;
use std::path::PathBuf;

#[test]
fn cli_parse_probe() {
    match parse(&["geomirror", "probe"]).command {
        CliCommand::Probe { url } => assert!(url.is_none()),
        _ => panic!("expected Probe"),
    }
    match parse(&["geomirror", "probe", "--url", "http://127.0.0.1:9/a.zip"]).command {
        CliCommand::Probe { url } => assert_eq!(url.as_deref(), Some("http://127.0.0.1:9/a.zip")),
        _ => panic!("expected Probe with url"),
    }
}

#[test]
fn cli_parse_stats() {
    match parse(&["geomirror", "stats", "allCountries.zip"]).command {
        CliCommand::Stats { path } => assert_eq!(path, PathBuf::from("allCountries.zip")),
        _ => panic!("expected Stats"),
    }
}

#[test]
fn cli_parse_checksum() {
    match parse(&["geomirror", "checksum", "/tmp/file.zip"]).command {
        CliCommand::Checksum { path } => assert_eq!(path, PathBuf::from("/tmp/file.zip")),
        _ => panic!("expected Checksum"),
    }
}

#[test]
fn cli_requires_subcommand_and_arguments() {
    assert!(Cli::try_parse_from(["geomirror"]).is_err());
    assert!(Cli::try_parse_from(["geomirror", "stats"]).is_err());
    assert!(Cli::try_parse_from(["geomirror", "bench", "x"]).is_err());
}

#[test]
fn error_line_names_kind_through_context() {
    let err = Err::<(), _>(MirrorError::EmptyArchive)
        .context("verifying allCountries.zip")
        .unwrap_err();
    let line = error_line(&err);
    assert!(line.starts_with("geomirror error (integrity): verifying allCountries.zip: "), "{line}");

    let plain = anyhow::anyhow!("no config");
    assert_eq!(error_line(&plain), "geomirror error: no config");
}
