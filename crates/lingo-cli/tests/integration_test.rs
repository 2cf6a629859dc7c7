//! Integration tests for the lingo command line front end.

use clap::Parser;
use lingo_cli::{run, Args, CliError};
use lingo_common::test_utils::{init_test_logging, write_fixture};
use lingo_config::{Config, TransformKind};

fn run_cli(argv: &[&str], config: &Config) -> Result<String, CliError> {
    let args = Args::try_parse_from(argv).expect("valid command line");
    run(&args.command, config).map(|output| output.stdout)
}

#[test]
fn test_format_end_to_end() {
    init_test_logging();
    let dir = tempfile::tempdir().unwrap();
    let en = write_fixture(
        dir.path(),
        "en.ftl",
        "emails = { $count ->\n    [one] One new email\n   *[other] { $count } new emails\n}\n",
    );
    let pl = write_fixture(
        dir.path(),
        "pl.ftl",
        "emails = { $count ->\n    [one] Jeden nowy e-mail\n    [few] { $count } nowe e-maile\n   *[many] { $count } nowych e-maili\n}\n",
    );
    let en_arg = format!("en={}", en.display());
    let pl_arg = format!("pl={}", pl.display());
    let config = Config::default();

    let out = run_cli(
        &["lingo", "format", "emails", "-r", &en_arg, "-r", &pl_arg, "-L", "pl-PL", "--arg", "count=3", "--no-isolating"],
        &config,
    )
    .unwrap();
    assert_eq!(out, "3 nowe e-maile\n");

    let out = run_cli(
        &["lingo", "format", "emails", "-r", &en_arg, "-r", &pl_arg, "-L", "en-GB", "--args-json", r#"{"count": 1}"#],
        &config,
    )
    .unwrap();
    assert_eq!(out, "One new email\n");

    let out = run_cli(
        &["lingo", "format", "emails", "-r", &en_arg, "-L", "en", "--arg", "count=5"],
        &config,
    )
    .unwrap();
    assert_eq!(out, "\u{2068}5\u{2069} new emails\n");
}

#[test]
fn test_format_uses_configured_transform_and_default_locale() {
    let dir = tempfile::tempdir().unwrap();
    let de = write_fixture(dir.path(), "de.ftl", "hi = Hallo { $name }\n");
    let en = write_fixture(dir.path(), "en.ftl", "hi = Hello { $name }\n");
    let de_arg = format!("de={}", de.display());
    let en_arg = format!("en={}", en.display());

    let mut config = Config::default();
    config.bundle.use_isolating = false;
    config.bundle.transform = TransformKind::Uppercase;
    config.negotiation.default_locale = Some("en".to_string());

    let out = run_cli(
        &["lingo", "format", "hi", "-r", &de_arg, "-r", &en_arg, "--arg", "name=Ada"],
        &config,
    )
    .unwrap();
    assert_eq!(out, "HELLO Ada\n");
}

#[test]
fn test_negotiate_end_to_end() {
    let config = Config::default();
    let out = run_cli(
        &["lingo", "negotiate", "-r", "de-DE,fr", "-a", "de,fr-FR,en-US", "-s", "filtering"],
        &config,
    )
    .unwrap();
    assert_eq!(out, "de\nfr-FR\n");

    let err = run_cli(
        &["lingo", "negotiate", "-r", "de", "-a", "en", "-s", "lookup"],
        &config,
    )
    .unwrap_err();
    assert!(err.to_string().contains("default locale"));
}

#[test]
fn test_parse_reports_failure() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_fixture(dir.path(), "bad.ftl", "ok = Fine\nbroken = { $x ]\n");
    let args = Args::try_parse_from(["lingo", "parse", file.to_str().unwrap()]).unwrap();
    let output = run(&args.command, &Config::default()).unwrap();

    assert!(!output.success);
    assert!(output.stdout.starts_with("ok\n"));
    assert!(output.stdout.contains("error: line 2"));
}
