//! Subcommand implementations.
//!
//! Each command renders its result into an [`Output`] so that `main` only
//! has to print it and pick the exit status.

use crate::cli::{Command, FormatArgs, NegotiateArgs, ParseArgs};
use crate::error::{CliError, CliResult};
use lingo_bundle::{FluentArgs, FluentBundle, L10nKey, LanguageIdentifier, Localization};
use lingo_config::Config;
use lingo_langneg::negotiate_languages;
use std::fmt::Write as _;
use std::path::Path;
use tracing::{debug, info, warn};

/// Rendered result of a command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Output {
    /// Text for stdout.
    pub stdout: String,
    /// `false` when the command found problems worth a non-zero exit status.
    pub success: bool,
}

impl Output {
    fn ok(stdout: String) -> Self {
        Self {
            stdout,
            success: true,
        }
    }
}

/// Run `command` with `config`.
///
/// # Errors
///
/// Fails on unreadable files, malformed arguments, negotiation errors and
/// messages that cannot be found.
pub fn run(command: &Command, config: &Config) -> CliResult<Output> {
    match command {
        Command::Parse(args) => parse(args),
        Command::Format(args) => format(args, config),
        Command::Negotiate(args) => negotiate(args, config),
    }
}

fn read_source(path: &Path) -> CliResult<String> {
    std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.display().to_string(),
        source,
    })
}

fn parse(args: &ParseArgs) -> CliResult<Output> {
    let source = read_source(&args.file)?;
    let resource = lingo_syntax::parse(&source);
    let success = resource.errors().is_empty();

    if args.json {
        let mut stdout = serde_json::to_string_pretty(&resource)?;
        stdout.push('\n');
        return Ok(Output { stdout, success });
    }

    let mut stdout = String::new();
    for (id, entry) in resource.entries() {
        let attributes: Vec<&str> = entry.attributes().iter().map(|a| a.id.as_str()).collect();
        if attributes.is_empty() {
            let _ = writeln!(stdout, "{id}");
        } else {
            let _ = writeln!(stdout, "{id} [{}]", attributes.join(", "));
        }
    }
    for error in resource.errors() {
        let _ = writeln!(stdout, "error: {error}");
    }

    info!(
        file = %args.file.display(),
        entries = resource.len(),
        errors = resource.errors().len(),
        "parsed resource"
    );
    Ok(Output { stdout, success })
}

fn format(args: &FormatArgs, config: &Config) -> CliResult<Output> {
    let available: Vec<&str> = args
        .resources
        .iter()
        .map(|(locale, _)| locale.as_str())
        .collect();

    let requested: Vec<&str> = if args.locales.is_empty() {
        config
            .negotiation
            .default_locale
            .as_deref()
            .or_else(|| available.first().copied())
            .into_iter()
            .collect()
    } else {
        args.locales.iter().map(String::as_str).collect()
    };

    let negotiated = negotiate_languages(
        &requested,
        &available,
        &config.negotiation.negotiate_options(),
    )?;
    debug!(?requested, ?negotiated, "negotiated bundle locales");

    let mut bundles = Vec::with_capacity(negotiated.len());
    for locale in &negotiated {
        bundles.push(build_bundle(locale, args, config)?);
    }
    let l10n = Localization::new(bundles);

    let mut key = L10nKey::new(args.id.as_str());
    key.args = message_args(args)?;

    let message = l10n
        .format_messages(std::slice::from_ref(&key))
        .pop()
        .flatten()
        .ok_or_else(|| CliError::MessageNotFound(args.id.clone()))?;

    let text = match &args.attr {
        Some(name) => message
            .attributes
            .into_iter()
            .find(|attr| &attr.name == name)
            .map(|attr| attr.value)
            .ok_or_else(|| CliError::AttributeNotFound {
                id: args.id.clone(),
                attribute: name.clone(),
            })?,
        None => message
            .value
            .ok_or_else(|| CliError::NoValue(args.id.clone()))?,
    };

    Ok(Output::ok(format!("{text}\n")))
}

fn build_bundle(locale: &str, args: &FormatArgs, config: &Config) -> CliResult<FluentBundle> {
    let langid: LanguageIdentifier = locale
        .parse()
        .map_err(|e| CliError::InvalidArgument(format!("locale {locale:?}: {e}")))?;

    let mut bundle = FluentBundle::new(vec![langid]);
    bundle.set_use_isolating(config.bundle.use_isolating && !args.no_isolating);
    bundle.set_transform(config.bundle.transform.text_transform());

    for (_, path) in args.resources.iter().filter(|(l, _)| l == locale) {
        let source = read_source(path)?;
        for error in bundle.add_messages(&source) {
            warn!(file = %path.display(), locale, "{error}");
        }
    }
    Ok(bundle)
}

fn message_args(args: &FormatArgs) -> CliResult<Option<FluentArgs>> {
    let mut fluent_args = match &args.args_json {
        Some(json) => {
            let value: serde_json::Value = serde_json::from_str(json)?;
            FluentArgs::from_json(value).ok_or_else(|| {
                CliError::InvalidArgument("--args-json must be a JSON object".to_string())
            })?
        }
        None => FluentArgs::new(),
    };

    for (name, raw) in &args.args {
        match raw.parse::<f64>() {
            Ok(number) if number.is_finite() => fluent_args.set(name.as_str(), number),
            _ => fluent_args.set(name.as_str(), raw.as_str()),
        }
    }

    Ok((!fluent_args.is_empty()).then_some(fluent_args))
}

fn negotiate(args: &NegotiateArgs, config: &Config) -> CliResult<Output> {
    let mut options = config.negotiation.negotiate_options();
    if let Some(strategy) = args.strategy {
        options.strategy = strategy;
    }
    if let Some(locale) = &args.default_locale {
        options.default_locale = Some(locale.clone());
    }

    let negotiated = negotiate_languages(&args.requested, &args.available, &options)?;
    let mut stdout = String::new();
    for locale in &negotiated {
        let _ = writeln!(stdout, "{locale}");
    }
    Ok(Output::ok(stdout))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lingo_common::test_utils::{init_test_logging, write_fixture};
    use lingo_langneg::NegotiationStrategy;
    use std::path::PathBuf;

    fn format_args(id: &str, resources: Vec<(String, PathBuf)>) -> FormatArgs {
        FormatArgs {
            id: id.to_string(),
            resources,
            locales: Vec::new(),
            attr: None,
            args: Vec::new(),
            args_json: None,
            no_isolating: true,
        }
    }

    #[test]
    fn test_message_args() {
        let mut args = format_args("x", Vec::new());
        assert!(message_args(&args).unwrap().is_none());

        args.args = vec![
            ("count".to_string(), "3".to_string()),
            ("name".to_string(), "Ada".to_string()),
            ("weird".to_string(), "NaN".to_string()),
        ];
        args.args_json = Some(r#"{"count": 1, "extra": "yes"}"#.to_string());
        let parsed = message_args(&args).unwrap().unwrap();

        assert_eq!(parsed.len(), 4);
        assert_eq!(parsed.get("count"), Some(&3.0.into()));
        assert_eq!(parsed.get("name"), Some(&"Ada".into()));
        assert_eq!(parsed.get("weird"), Some(&"NaN".into()));

        args.args_json = Some("[1, 2]".to_string());
        assert!(matches!(message_args(&args), Err(CliError::InvalidArgument(_))));
        args.args_json = Some("{".to_string());
        assert!(matches!(message_args(&args), Err(CliError::Json(_))));
    }

    #[test]
    fn test_format_falls_back_per_message() {
        init_test_logging();
        let dir = tempfile::tempdir().unwrap();
        let de = write_fixture(dir.path(), "de.ftl", "hello = Hallo { $name }\n");
        let en = write_fixture(
            dir.path(),
            "en.ftl",
            "hello = Hello { $name }\nbye = Bye\n    .title = Leave\n",
        );
        let resources = vec![("de".to_string(), de), ("en".to_string(), en)];

        let mut args = format_args("hello", resources);
        args.locales = vec!["de-AT".to_string(), "en".to_string()];
        args.args = vec![("name".to_string(), "Ada".to_string())];
        let config = Config::default();

        assert_eq!(format(&args, &config).unwrap().stdout, "Hallo Ada\n");

        args.id = "bye".to_string();
        assert_eq!(format(&args, &config).unwrap().stdout, "Bye\n");

        args.attr = Some("title".to_string());
        assert_eq!(format(&args, &config).unwrap().stdout, "Leave\n");

        args.attr = Some("missing".to_string());
        assert!(matches!(
            format(&args, &config),
            Err(CliError::AttributeNotFound { .. })
        ));

        args.attr = None;
        args.id = "nowhere".to_string();
        assert!(matches!(format(&args, &config), Err(CliError::MessageNotFound(_))));
    }

    #[test]
    fn test_format_unreadable_resource() {
        let args = format_args(
            "hello",
            vec![("en".to_string(), PathBuf::from("/nonexistent/en.ftl"))],
        );
        assert!(matches!(
            format(&args, &Config::default()),
            Err(CliError::Read { .. })
        ));
    }

    #[test]
    fn test_parse_lists_entries_and_errors() {
        let dir = tempfile::tempdir().unwrap();
        let file = write_fixture(
            dir.path(),
            "app.ftl",
            "-brand = Lingo\nlogin = Log in\n    .title = Sign in\n!!!\n",
        );

        let output = parse(&ParseArgs {
            file: file.clone(),
            json: false,
        })
        .unwrap();
        assert!(!output.success);
        let lines: Vec<&str> = output.stdout.lines().collect();
        assert_eq!(lines[0], "-brand");
        assert_eq!(lines[1], "login [title]");
        assert!(lines[2].starts_with("error: line 4"));

        let output = parse(&ParseArgs { file, json: true }).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output.stdout).unwrap();
        assert!(value.is_object());
    }

    #[test]
    fn test_negotiate_overrides_config() {
        let args = NegotiateArgs {
            requested: vec!["fr-CA".to_string()],
            available: vec!["en-US".to_string(), "fr".to_string(), "fr-FR".to_string()],
            strategy: Some(NegotiationStrategy::Lookup),
            default_locale: Some("en-US".to_string()),
        };
        let output = negotiate(&args, &Config::default()).unwrap();
        assert_eq!(output.stdout, "fr\n");

        let args = NegotiateArgs {
            strategy: Some(NegotiationStrategy::Lookup),
            default_locale: None,
            ..args
        };
        assert!(matches!(
            negotiate(&args, &Config::default()),
            Err(CliError::Negotiation(_))
        ));
    }
}
