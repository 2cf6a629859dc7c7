//! `NUMBER` and `DATETIME`.

use crate::errors::FunctionError;
use crate::types::{FluentDateTime, FluentNumber, FluentValue, FormatOptions, OptionValue};
use chrono::{DateTime, TimeZone, Utc};
use std::collections::BTreeMap;

/// What built-in and custom functions return.
pub type FunctionResult = Result<FluentValue, FunctionError>;

pub(crate) type Builtin = fn(&[FluentValue], &BTreeMap<String, FluentValue>) -> FunctionResult;

/// Built-in function by name.
pub(crate) fn lookup(name: &str) -> Option<Builtin> {
    match name {
        "NUMBER" => Some(number as Builtin),
        "DATETIME" => Some(datetime as Builtin),
        _ => None,
    }
}

/// Named call arguments as formatting options. Values that have no option
/// form are skipped.
fn call_options(named: &BTreeMap<String, FluentValue>) -> FormatOptions {
    named
        .iter()
        .filter_map(|(name, value)| {
            let option = match value {
                FluentValue::Number(n) => OptionValue::Number(n.value),
                FluentValue::String(s) | FluentValue::Symbol(s) => OptionValue::String(s.clone()),
                FluentValue::DateTime(_) | FluentValue::None(_) => return None,
            };
            Some((name.clone(), option))
        })
        .collect()
}

/// `NUMBER($n, minimumFractionDigits: 2)`
pub fn number(positional: &[FluentValue], named: &BTreeMap<String, FluentValue>) -> FunctionResult {
    let options = call_options(named);
    match positional.first() {
        Some(FluentValue::Number(n)) => Ok(FluentValue::Number(FluentNumber::new(
            n.value,
            n.options.merge(&options),
        ))),
        Some(FluentValue::String(s) | FluentValue::Symbol(s)) => {
            let value = s
                .trim()
                .parse()
                .map_err(|_| FunctionError::new(format!("NUMBER: not a number: {s:?}")))?;
            Ok(FluentValue::Number(FluentNumber::new(value, options)))
        }
        Some(other) => Err(FunctionError::new(format!(
            "NUMBER: unsupported argument {other:?}"
        ))),
        None => Err(FunctionError::new("NUMBER: missing argument")),
    }
}

/// `DATETIME($d, dateStyle: "long")`. Accepts date-times, epoch
/// milliseconds and RFC 3339 strings.
pub fn datetime(
    positional: &[FluentValue],
    named: &BTreeMap<String, FluentValue>,
) -> FunctionResult {
    let options = call_options(named);
    let (value, base) = match positional.first() {
        Some(FluentValue::DateTime(d)) => (d.value, d.options.clone()),
        Some(FluentValue::Number(n)) => (from_millis(n.value)?, n.options.clone()),
        Some(FluentValue::String(s)) => {
            let parsed = DateTime::parse_from_rfc3339(s.trim())
                .map_err(|err| FunctionError::new(format!("DATETIME: {err}")))?;
            (parsed.with_timezone(&Utc), FormatOptions::new())
        }
        Some(other) => {
            return Err(FunctionError::new(format!(
                "DATETIME: unsupported argument {other:?}"
            )))
        }
        None => return Err(FunctionError::new("DATETIME: missing argument")),
    };
    Ok(FluentValue::DateTime(FluentDateTime::new(
        value,
        base.merge(&options),
    )))
}

#[allow(clippy::cast_possible_truncation)]
fn from_millis(millis: f64) -> Result<DateTime<Utc>, FunctionError> {
    if !millis.is_finite() {
        return Err(FunctionError::new("DATETIME: invalid timestamp"));
    }
    Utc.timestamp_millis_opt(millis as i64)
        .single()
        .ok_or_else(|| FunctionError::new("DATETIME: timestamp out of range"))
}
