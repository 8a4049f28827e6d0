//! Methods: pure transforms over integer sequences and mappings.

use plugin_registry::{ActionFailure, ActionSpec, Arguments, Callable, Primitive};
use serde_json::{Map, Value, json};

use crate::args::{self, Outputs};
use crate::types::{INT_SEQUENCE1, INT_SEQUENCE2, MAPPING, any_int_sequence, leaf};

const LONG_DESCRIPTION: &str = "This is a very long description. If asked about its length, I \
                                would have to say it is greater than 79 characters.";

pub(crate) fn concatenate_ints(args: &Arguments) -> Outputs {
    let mut joined = args::ints(args, "ints1")?;
    joined.extend(args::ints(args, "ints2")?);
    joined.extend(args::ints(args, "ints3")?);
    joined.push(args::int(args, "int1")?);
    joined.push(args::int(args, "int2")?);
    Ok(vec![json!(joined)])
}

/// The right half receives the extra element of an odd-length sequence.
pub(crate) fn split_ints(args: &Arguments) -> Outputs {
    let ints = args::ints(args, "ints")?;
    let (left, right) = ints.split_at(ints.len().div_euclid(2));
    Ok(vec![json!(left), json!(right)])
}

pub(crate) fn merge_mappings(args: &Arguments) -> Outputs {
    let mut merged = args::mapping(args, "mapping1")?.clone();
    for (key, value) in args::mapping(args, "mapping2")? {
        if merged.get(key).is_some_and(|existing| existing != value) {
            return Err(ActionFailure::new(format!(
                "key '{key}' exists in both mappings with different values"
            )));
        }
        merged.insert(key.clone(), value.clone());
    }
    Ok(vec![Value::Object(merged)])
}

fn identity_requiring(parameter: &'static str) -> impl Fn(&Arguments) -> Outputs {
    move |args: &Arguments| {
        if args::optional(args, parameter).is_none() {
            return Err(ActionFailure::new(format!("'{parameter}' is required")));
        }
        Ok(vec![json!(args::ints(args, "ints")?)])
    }
}

pub(crate) fn identity_with_optional_metadata(args: &Arguments) -> Outputs {
    Ok(vec![json!(args::ints(args, "ints")?)])
}

pub(crate) fn long_description_method(args: &Arguments) -> Outputs {
    Ok(vec![Value::Object(args::mapping(args, "mapping1")?.clone())])
}

pub(crate) fn params_only_method(args: &Arguments) -> Outputs {
    let name = args::text(args, "name")?;
    let age = args::int(args, "age")?;
    let mut mapping = Map::new();
    mapping.insert(name.to_owned(), json!(age.to_string()));
    Ok(vec![Value::Object(mapping)])
}

pub(crate) fn no_input_method(_: &Arguments) -> Outputs {
    Ok(vec![json!({"foo": "42"})])
}

pub(crate) fn optional_artifacts_method(args: &Arguments) -> Outputs {
    let mut result = args::ints(args, "ints")?;
    result.push(args::int(args, "num1")?);
    result.extend(args::optional_ints(args, "optional1")?.unwrap_or_default());
    result.extend(args::optional_ints(args, "optional2")?.unwrap_or_default());
    result.extend(args::optional_int(args, "num2")?);
    Ok(vec![json!(result)])
}

fn identity_spec(id: &str, parameter: Primitive, description: &str, optional: bool) -> ActionSpec {
    let callable = if optional {
        Callable::new(id, 2, identity_with_optional_metadata)
    } else {
        Callable::new(id, 2, identity_requiring("metadata"))
    };
    ActionSpec::new(callable, "Identity", description)
        .input("ints", any_int_sequence())
        .parameter("metadata", parameter)
        .output("out", leaf(INT_SEQUENCE1))
}

pub(crate) fn specs() -> Vec<ActionSpec> {
    vec![
        ActionSpec::new(
            Callable::new("concatenate_ints", 5, concatenate_ints),
            "Concatenate integers",
            "This method concatenates integers into a single sequence in the order they are \
             provided.",
        )
        .input("ints1", any_int_sequence())
        .input("ints2", leaf(INT_SEQUENCE1))
        .input("ints3", leaf(INT_SEQUENCE2))
        .parameter("int1", Primitive::Int)
        .parameter("int2", Primitive::Int)
        .output("concatenated_ints", leaf(INT_SEQUENCE1)),
        ActionSpec::new(
            Callable::new("split_ints", 1, split_ints),
            "Split sequence of integers in half",
            "This method splits a sequence of integers in half, returning the two halves (left \
             and right). If the input sequence's length is not evenly divisible by 2, the right \
             half will have one more element than the left.",
        )
        .input("ints", leaf(INT_SEQUENCE1))
        .output("left", leaf(INT_SEQUENCE1))
        .output("right", leaf(INT_SEQUENCE1)),
        ActionSpec::new(
            Callable::new("merge_mappings", 2, merge_mappings),
            "Merge mappings",
            "This method merges two mappings into a single new mapping. If a key is shared \
             between mappings and the values differ, an error will be raised.",
        )
        .input("mapping1", leaf(MAPPING))
        .input("mapping2", leaf(MAPPING))
        .input_description("mapping1", "Mapping object to be merged")
        .output("merged_mapping", leaf(MAPPING))
        .output_description("merged_mapping", "Resulting merged Mapping object"),
        identity_spec(
            "identity_with_metadata",
            Primitive::Metadata,
            "This method does nothing, but takes metadata",
            false,
        ),
        ActionSpec::new(
            Callable::new("long_description_method", 3, long_description_method),
            "Long Description",
            LONG_DESCRIPTION,
        )
        .input("mapping1", leaf(MAPPING))
        .input_description("mapping1", LONG_DESCRIPTION)
        .parameter("name", Primitive::Str)
        .parameter("age", Primitive::Int)
        .parameter_description("name", LONG_DESCRIPTION)
        .output("out", leaf(MAPPING))
        .output_description("out", LONG_DESCRIPTION),
        identity_spec(
            "identity_with_metadata_category",
            Primitive::MetadataCategory,
            "This method does nothing, but takes a metadata category",
            false,
        ),
        identity_spec(
            "identity_with_optional_metadata",
            Primitive::Metadata,
            "This method does nothing, but takes optional metadata",
            true,
        ),
        identity_spec(
            "identity_with_optional_metadata_category",
            Primitive::MetadataCategory,
            "This method does nothing, but takes an optional metadata category",
            true,
        ),
        ActionSpec::new(
            Callable::new("params_only_method", 2, params_only_method),
            "Parameters only method",
            "This method only accepts parameters.",
        )
        .parameter("name", Primitive::Str)
        .parameter("age", Primitive::Int)
        .output("out", leaf(MAPPING)),
        ActionSpec::new(
            Callable::new("no_input_method", 0, no_input_method),
            "No input method",
            "This method does not accept any type of input.",
        )
        .output("out", leaf(MAPPING)),
        ActionSpec::new(
            Callable::new("optional_artifacts_method", 5, optional_artifacts_method),
            "Optional artifacts method",
            "This method declares optional artifacts and concatenates whatever integers are \
             supplied as input.",
        )
        .input("ints", leaf(INT_SEQUENCE1))
        .input("optional1", leaf(INT_SEQUENCE1))
        .input("optional2", any_int_sequence())
        .parameter("num1", Primitive::Int)
        .parameter("num2", Primitive::Int)
        .output("output", leaf(INT_SEQUENCE1)),
    ]
}
