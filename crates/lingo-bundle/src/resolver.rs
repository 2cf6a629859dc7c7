//! Pattern resolution.
//!
//! A [`Scope`] lives for one top-level format call. It carries the caller's
//! arguments, collects errors, and tracks the patterns currently being
//! resolved so that self-referencing entries are cut short instead of
//! recursing forever.

use crate::args::{FluentArg, FluentArgs};
use crate::builtins::{self, Builtin};
use crate::bundle::{FluentBundle, FluentFunction};
use crate::errors::{FluentError, ResolverError};
use crate::types::{FluentDateTime, FluentNumber, FluentValue, FormatOptions};
use lingo_syntax::{
    is_term_id, Entry, Expression, NamedArgument, Pattern, PatternElement, Variant, VariantKey,
};
use std::collections::BTreeMap;
use std::ptr;
use tracing::debug;

/// Longest rendering of a single placeable, in characters.
pub const MAX_PLACEABLE_LENGTH: usize = 2500;

/// First Strong Isolate.
const FSI: char = '\u{2068}';
/// Pop Directional Isolate.
const PDI: char = '\u{2069}';

enum Callee<'b> {
    Custom(&'b FluentFunction),
    Builtin(Builtin),
}

pub(crate) struct Scope<'b, 'e> {
    bundle: &'b FluentBundle,
    args: Option<&'b FluentArgs>,
    errors: &'e mut Vec<FluentError>,
    travelled: Vec<&'b Pattern>,
}

impl<'b, 'e> Scope<'b, 'e> {
    pub(crate) fn new(
        bundle: &'b FluentBundle,
        args: Option<&'b FluentArgs>,
        errors: &'e mut Vec<FluentError>,
    ) -> Self {
        Self {
            bundle,
            args,
            errors,
            travelled: Vec::new(),
        }
    }

    fn report(&mut self, error: ResolverError) {
        self.errors.push(error.into());
    }

    /// Resolve `pattern` to display text.
    pub(crate) fn format_pattern(&mut self, pattern: &'b Pattern) -> String {
        match self.resolve_pattern(pattern) {
            FluentValue::String(text) => text,
            other => other.format(self.bundle.intls()).into_owned(),
        }
    }

    fn resolve_pattern(&mut self, pattern: &'b Pattern) -> FluentValue {
        let elements = match pattern {
            Pattern::Text(text) => {
                return FluentValue::String(self.bundle.transform_text(text).into_owned())
            }
            Pattern::Elements(elements) => elements,
        };

        if self.travelled.iter().any(|seen| ptr::eq(*seen, pattern)) {
            self.report(ResolverError::Cyclic);
            return FluentValue::None(None);
        }

        self.travelled.push(pattern);
        let isolate = self.bundle.use_isolating() && elements.len() > 1;
        let mut out = String::new();
        for element in elements {
            match element {
                PatternElement::Text(text) => out.push_str(&self.bundle.transform_text(text)),
                PatternElement::Placeable(expression) => {
                    if isolate {
                        out.push(FSI);
                    }
                    self.write_placeable(expression, &mut out);
                    if isolate {
                        out.push(PDI);
                    }
                }
            }
        }
        self.travelled.pop();

        FluentValue::String(out)
    }

    fn write_placeable(&mut self, expression: &'b Expression, out: &mut String) {
        let bundle = self.bundle;
        let value = self.resolve_expression(expression);
        let part = value.format(bundle.intls());
        let length = part.chars().count();
        if length > MAX_PLACEABLE_LENGTH {
            self.report(ResolverError::PlaceableTooLong {
                length,
                max: MAX_PLACEABLE_LENGTH,
            });
            out.extend(part.chars().take(MAX_PLACEABLE_LENGTH));
        } else {
            out.push_str(&part);
        }
    }

    fn resolve_expression(&mut self, expression: &'b Expression) -> FluentValue {
        match expression {
            Expression::Variable { name } => self.resolve_variable(name),
            Expression::NumberLiteral { value } => {
                FluentValue::Number(FluentNumber::from_literal(value))
            }
            Expression::StringLiteral { value } => FluentValue::String(value.clone()),
            Expression::Reference { id } => match self.lookup(id) {
                Some(entry) => self.resolve_entry(id, entry),
                None => FluentValue::None(Some(id.clone())),
            },
            Expression::AttributeReference { id, name } => {
                let Some(entry) = self.lookup(id) else {
                    return FluentValue::None(Some(id.clone()));
                };
                match entry.attribute(name) {
                    Some(pattern) => self.resolve_pattern(pattern),
                    None => {
                        self.report(ResolverError::UnknownAttribute(format!("{id}.{name}")));
                        self.resolve_entry(id, entry)
                    }
                }
            }
            Expression::VariantReference { id, key } => self.resolve_variant(id, key),
            Expression::Select {
                selector,
                variants,
                default,
            } => self.resolve_select(selector.as_deref(), variants, *default),
            Expression::Call {
                callee,
                positional,
                named,
            } => self.resolve_call(callee, positional, named),
        }
    }

    fn resolve_variable(&mut self, name: &str) -> FluentValue {
        let Some(arg) = self.args.and_then(|args| args.get(name)) else {
            self.report(ResolverError::UnknownVariable(name.to_string()));
            return FluentValue::None(Some(name.to_string()));
        };

        match arg {
            FluentArg::Value(value) => value.clone(),
            FluentArg::String(s) => FluentValue::String(s.clone()),
            FluentArg::Number(n) => FluentValue::Number(FluentNumber::new(*n, FormatOptions::new())),
            FluentArg::DateTime(d) => {
                FluentValue::DateTime(FluentDateTime::new(*d, FormatOptions::new()))
            }
            FluentArg::Unsupported(kind) => {
                self.report(ResolverError::UnsupportedVariableType {
                    name: name.to_string(),
                    kind: kind.clone(),
                });
                FluentValue::None(Some(name.to_string()))
            }
        }
    }

    fn lookup(&mut self, id: &str) -> Option<&'b Entry> {
        let bundle = self.bundle;
        if is_term_id(id) {
            let term = bundle.get_term(id);
            if term.is_none() {
                self.report(ResolverError::UnknownTerm(id.to_string()));
            }
            term
        } else {
            let message = bundle.get_message(id);
            if message.is_none() {
                self.report(ResolverError::UnknownMessage(id.to_string()));
            }
            message
        }
    }

    /// Value of a referenced entry.
    fn resolve_entry(&mut self, id: &str, entry: &'b Entry) -> FluentValue {
        match entry {
            Entry::Text(text) => FluentValue::String(self.bundle.transform_text(text).into_owned()),
            Entry::Message(message) => match &message.value {
                Some(pattern) => self.resolve_pattern(pattern),
                None => {
                    self.report(ResolverError::NoValue(id.to_string()));
                    FluentValue::None(Some(id.to_string()))
                }
            },
        }
    }

    fn resolve_variant(&mut self, id: &str, key: &VariantKey) -> FluentValue {
        let Some(entry) = self.lookup(id) else {
            return FluentValue::None(Some(id.to_string()));
        };

        let wanted = key_value(key);
        if let Some(variants) = entry.value().and_then(Pattern::as_variant_list) {
            for variant in variants {
                if wanted.matches(&key_value(&variant.key), self.bundle.intls()) {
                    return self.resolve_pattern(&variant.value);
                }
            }
        }

        self.report(ResolverError::UnknownVariant(key.to_string()));
        self.resolve_entry(id, entry)
    }

    fn resolve_select(
        &mut self,
        selector: Option<&'b Expression>,
        variants: &'b [Variant],
        default: usize,
    ) -> FluentValue {
        if let Some(selector) = selector {
            let selector = self.resolve_expression(selector);
            if !selector.is_none() {
                for variant in variants {
                    if key_value(&variant.key).matches(&selector, self.bundle.intls()) {
                        return self.resolve_pattern(&variant.value);
                    }
                }
            }
        }

        match variants.get(default) {
            Some(variant) => self.resolve_pattern(&variant.value),
            None => {
                self.report(ResolverError::MissingDefault);
                FluentValue::None(None)
            }
        }
    }

    fn resolve_call(
        &mut self,
        name: &str,
        positional: &'b [Expression],
        named: &'b [NamedArgument],
    ) -> FluentValue {
        let callee = match self.bundle.get_function(name) {
            Some(function) => Callee::Custom(function),
            None => match builtins::lookup(name) {
                Some(function) => Callee::Builtin(function),
                None => {
                    self.report(ResolverError::UnknownFunction(name.to_string()));
                    return FluentValue::None(Some(format!("{name}()")));
                }
            },
        };

        let positional: Vec<FluentValue> = positional
            .iter()
            .map(|arg| self.resolve_expression(arg))
            .collect();
        let named: BTreeMap<String, FluentValue> = named
            .iter()
            .map(|arg| (arg.name.clone(), self.resolve_expression(&arg.value)))
            .collect();

        let result = match callee {
            Callee::Custom(function) => function(&positional, &named),
            Callee::Builtin(function) => function(&positional, &named),
        };
        result.unwrap_or_else(|err| {
            debug!(function = name, "function call failed: {err}");
            FluentValue::None(None)
        })
    }
}

fn key_value(key: &VariantKey) -> FluentValue {
    match key {
        VariantKey::Number(raw) => FluentValue::Number(FluentNumber::from_literal(raw)),
        VariantKey::Keyword(name) => FluentValue::Symbol(name.clone()),
    }
}
