//! CLI parse tests.

use super::{Cli, CliCommand};
use clap::Parser;
use std::path::{Path, PathBuf};

fn parse(args: &[&str]) -> CliCommand {
    let cli = Cli::try_parse_from(args).unwrap();
    cli.command
}

#[test]
fn cli_parse_convert_defaults() {
    match parse(&["harrec", "convert", "capture.jsonl"]) {
        CliCommand::Convert {
            logs,
            url,
            out,
            compact,
        } => {
            assert_eq!(logs, vec![PathBuf::from("capture.jsonl")]);
            assert!(url.is_none());
            assert!(out.is_none());
            assert!(!compact);
        }
        _ => panic!("expected Convert"),
    }
}

#[test]
fn cli_parse_convert_all_flags() {
    match parse(&[
        "harrec",
        "convert",
        "a.jsonl",
        "b.jsonl",
        "--url",
        "https://example.com/",
        "--out",
        "/tmp/hars",
        "--compact",
    ]) {
        CliCommand::Convert {
            logs,
            url,
            out,
            compact,
        } => {
            assert_eq!(logs.len(), 2);
            assert_eq!(logs[1], Path::new("b.jsonl"));
            assert_eq!(url.as_deref(), Some("https://example.com/"));
            assert_eq!(out.as_deref(), Some(Path::new("/tmp/hars")));
            assert!(compact);
        }
        _ => panic!("expected Convert with flags"),
    }
}

#[test]
fn cli_convert_requires_a_log() {
    assert!(Cli::try_parse_from(["harrec", "convert"]).is_err());
}

#[test]
fn cli_parse_summary() {
    match parse(&["harrec", "summary", "capture.jsonl"]) {
        CliCommand::Summary { log } => assert_eq!(log, Path::new("capture.jsonl")),
        _ => panic!("expected Summary"),
    }
}

#[test]
fn cli_unknown_subcommand_fails() {
    assert!(Cli::try_parse_from(["harrec", "add", "https://example.com/"]).is_err());
}
