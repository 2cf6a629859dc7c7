//! Integration tests for bundles, the resolver and the fallback chain.

use lingo_bundle::{
    fluent_args, DateTimeFormat, DefaultIntlProvider, EntryKind, FluentArgs, FluentBundle,
    FluentError, FluentValue, FormatOptions, IntlError, IntlProvider, LanguageIdentifier,
    Localization, NumberFormat, PluralSelector, ResolverError,
};
use lingo_common::test_utils::init_test_logging;
use lingo_syntax::Resource;
use proptest::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn langid(tag: &str) -> LanguageIdentifier {
    tag.parse().expect("valid language identifier")
}

fn bundle_with(source: &str) -> FluentBundle {
    init_test_logging();
    let mut bundle = FluentBundle::new(vec![langid("en-US")]);
    bundle.set_use_isolating(false);
    let errors = bundle.add_messages(source);
    assert!(errors.is_empty(), "unexpected errors: {errors:?}");
    bundle
}

fn format(bundle: &FluentBundle, id: &str, args: Option<&FluentArgs>) -> (Option<String>, Vec<FluentError>) {
    let mut errors = Vec::new();
    let entry = bundle.get_message(id).expect("message exists");
    let value = bundle.format(entry, args, &mut errors);
    (value, errors)
}

#[test]
fn add_resource_keeps_first_entry() {
    let mut bundle = bundle_with("key = Value\n-term = Term\n");
    let errors = bundle.add_messages("key = Value 2\n-term = Other\nfresh = New\n");

    assert_eq!(
        errors,
        vec![
            FluentError::Overriding {
                kind: EntryKind::Message,
                id: "key".to_string()
            },
            FluentError::Overriding {
                kind: EntryKind::Term,
                id: "-term".to_string()
            },
        ]
    );
    assert_eq!(errors[1].to_string(), "Attempt to override an existing term: \"-term\"");
    assert_eq!(format(&bundle, "key", None).0.as_deref(), Some("Value"));
    assert!(bundle.has_message("fresh"));
}

#[test]
fn parse_errors_come_first() {
    let mut bundle = FluentBundle::new(vec![langid("en")]);
    bundle.add_messages("a = A\n");
    let errors = bundle.add_messages("a = again\n!!!\nb = B\n");

    assert_eq!(errors.len(), 2);
    assert!(matches!(errors[0], FluentError::Parser(_)));
    assert!(matches!(errors[1], FluentError::Overriding { .. }));
    assert!(bundle.has_message("b"));
}

#[test]
fn terms_are_private() {
    let bundle = bundle_with("-brand = Lingo\nabout = About { -brand }\n");
    assert!(!bundle.has_message("-brand"));
    assert!(bundle.get_message("-brand").is_none());

    let ids: Vec<&str> = bundle.messages().map(|(id, _)| id).collect();
    assert_eq!(ids, vec!["about"]);
    assert_eq!(format(&bundle, "about", None).0.as_deref(), Some("About Lingo"));
}

#[test]
fn fast_paths() {
    let bundle = bundle_with("plain = Just text\nwith-attr = Text\n    .title = Title\nonly-attr =\n    .title = Title\n");
    assert_eq!(format(&bundle, "plain", None).0.as_deref(), Some("Just text"));
    assert_eq!(format(&bundle, "with-attr", None).0.as_deref(), Some("Text"));
    assert_eq!(format(&bundle, "only-attr", None).0, None);
}

#[test]
fn attributes_format_through_format_pattern() {
    let bundle = bundle_with("login = Log in\n    .title = Log in as { $user }\n");
    let entry = bundle.get_message("login").unwrap();
    let title = entry.attribute("title").unwrap();

    let mut errors = Vec::new();
    let args = fluent_args!("user" => "ada");
    assert_eq!(bundle.format_pattern(title, args.as_ref(), &mut errors), "Log in as ada");
    assert!(errors.is_empty());
}

#[test]
fn pre_parsed_resource_from_json() {
    let json = serde_json::to_string(&Resource::from_string("hi = Hi { $name }\n")).unwrap();
    let resource: Resource = serde_json::from_str(&json).unwrap();

    let mut bundle = FluentBundle::new(vec![langid("en")]);
    bundle.set_use_isolating(false);
    assert!(bundle.add_resource(resource).is_empty());

    let args = fluent_args!("name" => "Bo");
    assert_eq!(format(&bundle, "hi", args.as_ref()).0.as_deref(), Some("Hi Bo"));
}

#[test]
fn plural_rules_follow_the_bundle_locale() {
    let source = "files = { $n ->\n    [one] { $n } plik\n    [few] { $n } pliki\n   *[many] { $n } plików\n}\n";
    let mut bundle = FluentBundle::new(vec![langid("pl")]);
    bundle.set_use_isolating(false);
    assert!(bundle.add_messages(source).is_empty());

    let run = |n: i32| format(&bundle, "files", fluent_args!("n" => n).as_ref()).0.unwrap();
    assert_eq!(run(1), "1 plik");
    assert_eq!(run(3), "3 pliki");
    assert_eq!(run(5), "5 plików");
    assert_eq!(run(22), "22 pliki");
}

#[test]
fn number_options_reach_plural_selection() {
    let bundle = bundle_with(
        "score = { NUMBER($n, minimumFractionDigits: 1) ->\n    [one] one point\n   *[other] { NUMBER($n, minimumFractionDigits: 1) } points\n}\n",
    );
    let args = fluent_args!("n" => 1);
    assert_eq!(format(&bundle, "score", args.as_ref()).0.as_deref(), Some("1.0 points"));
}

#[test]
fn datetime_arguments() {
    use chrono::{TimeZone, Utc};

    let bundle = bundle_with(
        "due = Due { DATETIME($when, dateStyle: \"long\") }\nraw = { $when }\n",
    );
    let when = Utc.with_ymd_and_hms(2024, 3, 9, 8, 0, 0).unwrap();
    let args = fluent_args!("when" => when);

    assert_eq!(format(&bundle, "due", args.as_ref()).0.as_deref(), Some("Due March 9, 2024"));
    assert_eq!(format(&bundle, "raw", args.as_ref()).0.as_deref(), Some("2024-03-09"));
}

#[test]
fn value_arguments_pass_through() {
    let bundle = bundle_with("v = { $v }\n");
    let args = fluent_args!("v" => FluentValue::None(Some("fallback".to_string())));
    assert_eq!(format(&bundle, "v", args.as_ref()).0.as_deref(), Some("fallback"));
}

#[derive(Default)]
struct RecordingProvider {
    number_builds: AtomicUsize,
}

struct Bracketed;

impl NumberFormat for Bracketed {
    fn format(&self, value: f64) -> String {
        format!("[{value}]")
    }
}

impl IntlProvider for RecordingProvider {
    fn number_format(
        &self,
        _locales: &[LanguageIdentifier],
        _options: &FormatOptions,
    ) -> Result<Arc<dyn NumberFormat>, IntlError> {
        self.number_builds.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(Bracketed))
    }

    fn date_time_format(
        &self,
        locales: &[LanguageIdentifier],
        options: &FormatOptions,
    ) -> Result<Arc<dyn DateTimeFormat>, IntlError> {
        DefaultIntlProvider.date_time_format(locales, options)
    }

    fn plural_rules(
        &self,
        locales: &[LanguageIdentifier],
        options: &FormatOptions,
    ) -> Result<Arc<dyn PluralSelector>, IntlError> {
        DefaultIntlProvider.plural_rules(locales, options)
    }
}

#[test]
fn host_provider_and_formatter_reuse() {
    let provider = Arc::new(RecordingProvider::default());
    let mut bundle = bundle_with("a = { $n } and { $m }\nb = { NUMBER($n, minimumFractionDigits: 2) }\n");
    bundle.set_intl_provider(provider.clone());

    let args = fluent_args!("n" => 1, "m" => 2);
    assert_eq!(format(&bundle, "a", args.as_ref()).0.as_deref(), Some("[1] and [2]"));
    assert_eq!(format(&bundle, "a", args.as_ref()).0.as_deref(), Some("[1] and [2]"));
    assert_eq!(provider.number_builds.load(Ordering::SeqCst), 1);

    format(&bundle, "b", args.as_ref());
    assert_eq!(provider.number_builds.load(Ordering::SeqCst), 2);
    assert_eq!(bundle.intls().len(), 2);
}

#[test]
fn failing_formatter_falls_back_to_plain_rendering() {
    let bundle = bundle_with("p = { NUMBER($n, style: \"currency\") }\n");
    let (value, errors) = format(&bundle, "p", fluent_args!("n" => 2.5).as_ref());
    assert_eq!(value.as_deref(), Some("2.5"));
    assert!(errors.is_empty());
}

#[test]
fn localization_over_bundles() {
    let mut de = FluentBundle::new(vec![langid("de")]);
    de.add_messages("hello = Hallo\n");
    let mut en = FluentBundle::new(vec![langid("en")]);
    en.add_messages("hello = Hello\nbye = Bye\n");

    let l10n = Localization::new(vec![de, en]);
    assert_eq!(l10n.format_value("hello", None).as_deref(), Some("Hallo"));
    assert_eq!(l10n.format_value("bye", None).as_deref(), Some("Bye"));
    assert_eq!(l10n.format_value("nope", None), None);
}

#[test]
fn bundle_is_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<FluentBundle>();

    let bundle = Arc::new(bundle_with("n = { $n } items\n"));
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let bundle = Arc::clone(&bundle);
            std::thread::spawn(move || {
                format(&bundle, "n", fluent_args!("n" => i).as_ref()).0.unwrap()
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        assert_eq!(handle.join().unwrap(), format!("{i} items"));
    }
}

#[test]
fn truncated_placeable_keeps_literal_text() {
    let mut bundle = bundle_with("t = Before { $t } after\n");
    bundle.set_use_isolating(true);
    let text = "y".repeat(3000);
    let (value, errors) = format(&bundle, "t", fluent_args!("t" => text).as_ref());
    let value = value.unwrap();

    let inner = value
        .strip_prefix("Before \u{2068}")
        .and_then(|rest| rest.strip_suffix("\u{2069} after"))
        .expect("literal text around the placeable");
    assert_eq!(inner.chars().count(), lingo_bundle::MAX_PLACEABLE_LENGTH);
    assert!(inner.chars().all(|c| c == 'y'));
    assert_eq!(errors.len(), 1);
    assert!(matches!(
        errors[0],
        FluentError::Resolver(ResolverError::PlaceableTooLong { length: 3000, .. })
    ));
}

proptest! {
    #[test]
    fn long_arguments_are_truncated(len in 0_usize..6000) {
        let bundle = bundle_with("t = { $t }\n");
        let text = "x".repeat(len);
        let (value, errors) = format(&bundle, "t", fluent_args!("t" => text).as_ref());
        let value = value.unwrap();

        prop_assert_eq!(value.chars().count(), len.min(lingo_bundle::MAX_PLACEABLE_LENGTH));
        prop_assert_eq!(errors.len(), usize::from(len > lingo_bundle::MAX_PLACEABLE_LENGTH));
        if let Some(error) = errors.first() {
            prop_assert!(
                matches!(error, FluentError::Resolver(ResolverError::PlaceableTooLong { .. })),
                "unexpected error: {error:?}"
            );
        }
    }

    #[test]
    fn formatting_never_panics(source in "[a-z{}$\\-\\[\\]*>. \n]{0,80}", n in -1000.0_f64..1000.0) {
        let mut bundle = FluentBundle::new(vec![langid("en")]);
        bundle.add_messages(&format!("msg = {source}\n"));
        let args = fluent_args!("a" => n, "b" => "text");
        let ids: Vec<String> = bundle.messages().map(|(id, _)| id.to_string()).collect();
        for id in ids {
            let entry = bundle.get_message(&id).unwrap();
            let mut errors = Vec::new();
            let _ = bundle.format(entry, args.as_ref(), &mut errors);
        }
    }
}
