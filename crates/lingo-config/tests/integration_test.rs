//! Integration tests for lingo-config crate.

use lingo_bundle::{FluentBundle, LanguageIdentifier};
use lingo_common::test_utils::{init_test_logging, write_fixture};
use lingo_config::{ConfigLoader, TransformKind};
use lingo_langneg::negotiate_languages;

fn no_env(_: &str) -> Option<String> {
    None
}

#[test]
fn test_config_drives_negotiation() {
    init_test_logging();
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(
        dir.path(),
        "lingo.yaml",
        "negotiation:\n  strategy: lookup\n  default_locale: en-US\n  likely_subtags:\n    gsw: gsw-Latn-CH\n",
    );
    let config = ConfigLoader::load_config_with(&path, no_env).expect("Failed to load config");

    let options = config.negotiation.negotiate_options();
    let supported =
        negotiate_languages(&["gsw"], &["de-CH", "gsw-CH", "en-US"], &options).unwrap();
    assert_eq!(supported, vec!["gsw-CH"]);

    let supported = negotiate_languages(&["ja"], &["de-CH", "en-US"], &options).unwrap();
    assert_eq!(supported, vec!["en-US"]);
}

#[test]
fn test_config_drives_bundles() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(
        dir.path(),
        "lingo.toml",
        "[bundle]\nuse_isolating = false\ntransform = \"uppercase\"\n",
    );
    let config = ConfigLoader::load_config_with(&path, no_env).expect("Failed to load config");
    assert_eq!(config.bundle.transform, TransformKind::Uppercase);

    let locale: LanguageIdentifier = "en".parse().unwrap();
    let mut bundle = FluentBundle::new(vec![locale]);
    bundle.set_use_isolating(config.bundle.use_isolating);
    bundle.set_transform(config.bundle.transform.text_transform());
    assert!(bundle.add_messages("hello = Hello, { $name }\n").is_empty());

    let args = lingo_bundle::fluent_args!("name" => "world");
    let mut errors = Vec::new();
    let message = bundle.get_message("hello").unwrap();
    assert_eq!(
        bundle.format(message, args.as_ref(), &mut errors).as_deref(),
        Some("HELLO, world")
    );
}

#[test]
fn test_defaults_without_overrides() {
    let config = ConfigLoader::defaults_with(no_env).expect("defaults are valid");
    assert!(config.bundle.use_isolating);
    assert!(config.negotiation.default_locale.is_none());

    let logging = config.logging.to_logging_config();
    assert_eq!(logging.level, "warn");
}
