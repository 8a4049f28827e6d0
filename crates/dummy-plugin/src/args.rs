//! Argument extraction shared by the fixture callables.

use plugin_registry::{ActionFailure, Arguments};
use serde_json::{Map, Value};

pub(crate) type Outputs = Result<Vec<Value>, ActionFailure>;

/// Builds an argument map from name/value pairs.
pub(crate) fn arguments<const N: usize>(pairs: [(&str, Value); N]) -> Arguments {
    pairs
        .into_iter()
        .map(|(name, value)| (name.to_owned(), value))
        .collect()
}

fn missing(name: &str) -> ActionFailure {
    ActionFailure::new(format!("missing argument '{name}'"))
}

fn mistyped(name: &str, expected: &str) -> ActionFailure {
    ActionFailure::new(format!("argument '{name}' must be {expected}"))
}

/// Returns an argument that may be absent or `null`.
pub(crate) fn optional<'a>(args: &'a Arguments, name: &str) -> Option<&'a Value> {
    args.get(name).filter(|value| !value.is_null())
}

fn required<'a>(args: &'a Arguments, name: &str) -> Result<&'a Value, ActionFailure> {
    optional(args, name).ok_or_else(|| missing(name))
}

fn as_ints(name: &str, value: &Value) -> Result<Vec<i64>, ActionFailure> {
    value
        .as_array()
        .and_then(|items| items.iter().map(Value::as_i64).collect())
        .ok_or_else(|| mistyped(name, "a sequence of integers"))
}

pub(crate) fn ints(args: &Arguments, name: &str) -> Result<Vec<i64>, ActionFailure> {
    as_ints(name, required(args, name)?)
}

pub(crate) fn optional_ints(
    args: &Arguments,
    name: &str,
) -> Result<Option<Vec<i64>>, ActionFailure> {
    optional(args, name)
        .map(|value| as_ints(name, value))
        .transpose()
}

pub(crate) fn int(args: &Arguments, name: &str) -> Result<i64, ActionFailure> {
    required(args, name)?
        .as_i64()
        .ok_or_else(|| mistyped(name, "an integer"))
}

pub(crate) fn optional_int(args: &Arguments, name: &str) -> Result<Option<i64>, ActionFailure> {
    optional(args, name)
        .map(|value| value.as_i64().ok_or_else(|| mistyped(name, "an integer")))
        .transpose()
}

pub(crate) fn text<'a>(args: &'a Arguments, name: &str) -> Result<&'a str, ActionFailure> {
    required(args, name)?
        .as_str()
        .ok_or_else(|| mistyped(name, "a string"))
}

pub(crate) fn flag(args: &Arguments, name: &str) -> Result<bool, ActionFailure> {
    required(args, name)?
        .as_bool()
        .ok_or_else(|| mistyped(name, "a boolean"))
}

pub(crate) fn mapping<'a>(
    args: &'a Arguments,
    name: &str,
) -> Result<&'a Map<String, Value>, ActionFailure> {
    required(args, name)?
        .as_object()
        .ok_or_else(|| mistyped(name, "a mapping"))
}

/// Takes the single output of a nested action call.
pub(crate) fn single(outputs: Vec<Value>) -> Result<Value, ActionFailure> {
    let mut values = outputs.into_iter();
    match (values.next(), values.next()) {
        (Some(value), None) => Ok(value),
        _ => Err(ActionFailure::new("expected exactly one output")),
    }
}
