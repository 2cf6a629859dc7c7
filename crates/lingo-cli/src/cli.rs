//! Command line arguments.

use clap::{Parser, Subcommand};
use lingo_langneg::NegotiationStrategy;
use std::path::PathBuf;

/// Parse, format and negotiate FTL localizations
#[derive(Parser, Debug)]
#[command(name = "lingo", author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level, overrides the configuration
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// `lingo` subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the entries and syntax errors of a resource file
    Parse(ParseArgs),
    /// Format a message through negotiated locale bundles
    Format(FormatArgs),
    /// Print the negotiated locale list
    Negotiate(NegotiateArgs),
}

/// Arguments of `lingo parse`
#[derive(clap::Args, Debug)]
pub struct ParseArgs {
    /// FTL file to parse
    pub file: PathBuf,

    /// Print the parsed resource as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments of `lingo format`
#[derive(clap::Args, Debug)]
pub struct FormatArgs {
    /// Message id
    pub id: String,

    /// Resource file for a locale (repeatable)
    #[arg(
        short,
        long = "resource",
        value_name = "LOCALE=FILE",
        required = true,
        value_parser = parse_resource
    )]
    pub resources: Vec<(String, PathBuf)>,

    /// Requested locales, most preferred first
    #[arg(short = 'L', long = "locale", value_delimiter = ',')]
    pub locales: Vec<String>,

    /// Format this attribute instead of the value
    #[arg(short, long)]
    pub attr: Option<String>,

    /// Message argument; values that parse as numbers become numbers
    #[arg(long = "arg", value_name = "NAME=VALUE", value_parser = parse_key_value)]
    pub args: Vec<(String, String)>,

    /// Message arguments as a JSON object
    #[arg(long, value_name = "JSON")]
    pub args_json: Option<String>,

    /// Do not wrap placeables in bidi isolation marks
    #[arg(long)]
    pub no_isolating: bool,
}

/// Arguments of `lingo negotiate`
#[derive(clap::Args, Debug)]
pub struct NegotiateArgs {
    /// Requested locales, most preferred first
    #[arg(short, long, value_delimiter = ',', required = true)]
    pub requested: Vec<String>,

    /// Available locales
    #[arg(short, long, value_delimiter = ',', required = true)]
    pub available: Vec<String>,

    /// filtering, matching or lookup; defaults to the configured strategy
    #[arg(short, long)]
    pub strategy: Option<NegotiationStrategy>,

    /// Fallback locale, required by lookup
    #[arg(short, long)]
    pub default_locale: Option<String>,
}

fn split_pair(raw: &str) -> Result<(&str, &str), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => Ok((key.trim(), value)),
        _ => Err(format!("expected KEY=VALUE, got {raw:?}")),
    }
}

fn parse_resource(raw: &str) -> Result<(String, PathBuf), String> {
    let (locale, file) = split_pair(raw)?;
    if file.is_empty() {
        return Err(format!("missing file in {raw:?}"));
    }
    Ok((locale.to_string(), PathBuf::from(file)))
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    let (key, value) = split_pair(raw)?;
    Ok((key.to_string(), value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_command_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_format_command() {
        let args = Args::try_parse_from([
            "lingo",
            "format",
            "greeting",
            "-r",
            "en-US=en.ftl",
            "--resource",
            "de=de.ftl",
            "-L",
            "de-AT,en",
            "--arg",
            "name=Ada",
            "--arg",
            "count=3",
            "--no-isolating",
        ])
        .unwrap();

        let Command::Format(format) = args.command else {
            panic!("expected format subcommand");
        };
        assert_eq!(format.id, "greeting");
        assert_eq!(
            format.resources,
            vec![
                ("en-US".to_string(), PathBuf::from("en.ftl")),
                ("de".to_string(), PathBuf::from("de.ftl")),
            ]
        );
        assert_eq!(format.locales, vec!["de-AT", "en"]);
        assert_eq!(format.args[1], ("count".to_string(), "3".to_string()));
        assert!(format.no_isolating);
    }

    #[test]
    fn test_parse_negotiate_command() {
        let args = Args::try_parse_from([
            "lingo",
            "--log-level",
            "debug",
            "negotiate",
            "-r",
            "fr-CA,en",
            "-a",
            "en-US,fr",
            "--strategy",
            "lookup",
            "-d",
            "en-US",
        ])
        .unwrap();

        assert_eq!(args.log_level.as_deref(), Some("debug"));
        let Command::Negotiate(negotiate) = args.command else {
            panic!("expected negotiate subcommand");
        };
        assert_eq!(negotiate.requested, vec!["fr-CA", "en"]);
        assert_eq!(negotiate.strategy, Some(NegotiationStrategy::Lookup));
    }

    #[test]
    fn test_rejects_malformed_pairs() {
        assert!(parse_resource("en.ftl").is_err());
        assert!(parse_resource("en=").is_err());
        assert!(parse_key_value("=value").is_err());
        assert_eq!(
            parse_key_value("query=a=b").unwrap(),
            ("query".to_string(), "a=b".to_string())
        );

        let result = Args::try_parse_from(["lingo", "negotiate", "-r", "en", "-a", "en", "-s", "best"]);
        assert!(result.is_err());
    }
}
