//! Caller-supplied arguments for `$variable` references.

use crate::types::FluentValue;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// One argument as handed in by the caller.
///
/// Anything that is not a string, number, date-time or ready-made value is
/// kept as [`FluentArg::Unsupported`] with its kind name, and reported when a
/// message references it.
#[derive(Debug, Clone, PartialEq)]
pub enum FluentArg {
    /// Passed through unchanged.
    Value(FluentValue),
    /// Inserted as is.
    String(String),
    /// Becomes a number with default options.
    Number(f64),
    /// Becomes a date-time with default options.
    DateTime(DateTime<Utc>),
    /// Not usable in a message; holds the kind name (`boolean`, `array`...).
    Unsupported(String),
}

impl FluentArg {
    /// Kind name used in diagnostics.
    #[must_use]
    pub fn kind(&self) -> &str {
        match self {
            Self::Value(_) => "value",
            Self::String(_) => "string",
            Self::Number(_) => "number",
            Self::DateTime(_) => "datetime",
            Self::Unsupported(kind) => kind,
        }
    }
}

impl From<FluentValue> for FluentArg {
    fn from(value: FluentValue) -> Self {
        Self::Value(value)
    }
}

impl From<String> for FluentArg {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&str> for FluentArg {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<&String> for FluentArg {
    fn from(value: &String) -> Self {
        Self::String(value.clone())
    }
}

impl From<DateTime<Utc>> for FluentArg {
    fn from(value: DateTime<Utc>) -> Self {
        Self::DateTime(value)
    }
}

impl From<bool> for FluentArg {
    fn from(_: bool) -> Self {
        Self::Unsupported("boolean".to_string())
    }
}

macro_rules! number_arg {
    ($($ty:ty),+) => {
        $(
            impl From<$ty> for FluentArg {
                #[allow(
                    clippy::cast_precision_loss,
                    clippy::cast_lossless,
                    clippy::unnecessary_cast
                )]
                fn from(value: $ty) -> Self {
                    Self::Number(value as f64)
                }
            }
        )+
    };
}

number_arg!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl From<serde_json::Value> for FluentArg {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::String(s) => Self::String(s),
            Value::Number(n) => Self::Number(n.as_f64().unwrap_or(f64::NAN)),
            Value::Bool(_) => Self::Unsupported("boolean".to_string()),
            Value::Null => Self::Unsupported("null".to_string()),
            Value::Array(_) => Self::Unsupported("array".to_string()),
            Value::Object(_) => Self::Unsupported("object".to_string()),
        }
    }
}

/// Named arguments for one format call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FluentArgs(HashMap<String, FluentArg>);

impl FluentArgs {
    /// No arguments.
    #[must_use]
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    /// Set an argument, replacing any previous value.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<FluentArg>) {
        self.0.insert(name.into(), value.into());
    }

    /// Look an argument up.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FluentArg> {
        self.0.get(name)
    }

    /// Iterate in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FluentArg)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of arguments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no arguments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Arguments from the members of a JSON object. Anything else yields
    /// `None`.
    #[must_use]
    pub fn from_json(value: serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Object(map) => Some(map.into_iter().collect()),
            _ => None,
        }
    }
}

impl<K, V> FromIterator<(K, V)> for FluentArgs
where
    K: Into<String>,
    V: Into<FluentArg>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Build `Option<FluentArgs>` from `name => value` pairs.
///
/// ```
/// use lingo_bundle::fluent_args;
///
/// let args = fluent_args!("name" => "Anna", "count" => 3);
/// assert_eq!(args.map(|a| a.len()), Some(2));
/// assert!(fluent_args!().is_none());
/// ```
#[macro_export]
macro_rules! fluent_args {
    () => {
        None::<$crate::FluentArgs>
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut args = $crate::FluentArgs::new();
        $(
            args.set($key, $value);
        )+
        Some(args)
    }};
}
