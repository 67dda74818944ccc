//! CLI parse tests.

use super::{Cli, CliCommand};
use clap::Parser;
use std::path::PathBuf;

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(args).unwrap()
}

#[test]
fn cli_parse_scrape_defaults() {
    let cli = parse(&["pagedump", "scrape"]);
    assert!(!cli.log_stderr);
    match cli.command {
        CliCommand::Scrape {
            output_dir,
            source,
            url,
            max_pages,
        } => {
            assert!(output_dir.is_none());
            assert!(source.is_none());
            assert!(url.is_none());
            assert!(max_pages.is_none());
        }
        _ => panic!("expected Scrape"),
    }
}

#[test]
fn cli_parse_scrape_all_flags() {
    let cli = parse(&[
        "pagedump",
        "scrape",
        "--output-dir",
        "/tmp/out",
        "--source",
        "catalog",
        "--url",
        "http://localhost/items?page={page}",
        "--max-pages",
        "5",
        "--log-stderr",
    ]);
    assert!(cli.log_stderr);
    match cli.command {
        CliCommand::Scrape {
            output_dir,
            source,
            url,
            max_pages,
        } => {
            assert_eq!(output_dir, Some(PathBuf::from("/tmp/out")));
            assert_eq!(source.as_deref(), Some("catalog"));
            assert_eq!(url.as_deref(), Some("http://localhost/items?page={page}"));
            assert_eq!(max_pages, Some(5));
        }
        _ => panic!("expected Scrape"),
    }
}

#[test]
fn cli_parse_config() {
    match parse(&["pagedump", "--log-stderr", "config"]).command {
        CliCommand::Config => {}
        _ => panic!("expected Config"),
    }
}

#[test]
fn cli_rejects_bad_max_pages() {
    assert!(Cli::try_parse_from(["pagedump", "scrape", "--max-pages", "-1"]).is_err());
    assert!(Cli::try_parse_from(["pagedump", "scrape", "--max-pages", "many"]).is_err());
}

#[test]
fn cli_requires_subcommand() {
    assert!(Cli::try_parse_from(["pagedump"]).is_err());
}
