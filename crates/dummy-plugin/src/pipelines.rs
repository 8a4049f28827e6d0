//! Pipelines. Each composes the fixture methods and visualizers directly and
//! records the actions it invokes.

use plugin_registry::{
    ActionFailure, ActionSpec, Arguments, Callable, Choices, OutputType, ParameterSpec, Primitive,
};
use serde_json::{Value, json};

use crate::args::{self, Outputs, arguments, single};
use crate::methods::{
    concatenate_ints, identity_with_optional_metadata, merge_mappings, optional_artifacts_method,
    split_ints,
};
use crate::types::{INT_SEQUENCE1, INT_SEQUENCE2, MAPPING, SINGLE_INT, leaf};
use crate::visualizers::{mapping_viz, most_common_viz, no_input_viz};

/// Modes accepted by `failing_pipeline`'s `break_from` parameter.
pub const FAILURE_MODES: [&str; 7] = [
    "arity",
    "return-view",
    "type",
    "method",
    "internal",
    "no-plugin",
    "no-action",
];

const POINTLESS_INT: i64 = 4;

pub(crate) fn parameter_only_pipeline(args: &Arguments) -> Outputs {
    let int1 = args::int(args, "int1")?;
    let int2 = args::int(args, "int2")?;
    let metadata = args::optional(args, "metadata").cloned().unwrap_or(Value::Null);
    let foo = json!([int1, int2, 3]);
    let identity = |ints: &Value| {
        identity_with_optional_metadata(&arguments([
            ("ints", ints.clone()),
            ("metadata", metadata.clone()),
        ]))
        .and_then(single)
    };
    let first = identity(&foo)?;
    let second = identity(&foo)?;
    let bar = single(concatenate_ints(&arguments([
        ("ints1", second),
        ("ints2", first),
        ("ints3", foo.clone()),
        ("int1", json!(int1)),
        ("int2", json!(int2)),
    ]))?)?;
    Ok(vec![foo, bar])
}

/// Fails with "Bad mapping" unless the mapping holds exactly the value `"42"`.
pub(crate) fn typical_pipeline(args: &Arguments) -> Outputs {
    let int_sequence = json!(args::ints(args, "int_sequence")?);
    let mapping = args::mapping(args, "mapping")?;
    let do_extra_thing = args::flag(args, "do_extra_thing")?;
    let add = args::optional_int(args, "add")?.unwrap_or(1);

    let mut values = mapping.values();
    if !matches!((values.next(), values.next()), (Some(value), None) if value == "42") {
        return Err(ActionFailure::new("Bad mapping"));
    }

    let mut halves = split_ints(&arguments([("ints", int_sequence)]))?.into_iter();
    let (Some(mut left), Some(right)) = (halves.next(), halves.next()) else {
        return Err(ActionFailure::new("split_ints must produce two halves"));
    };
    if do_extra_thing {
        let shifted: Vec<i64> = args::ints(&arguments([("left", left)]), "left")?
            .into_iter()
            .map(|value| value.saturating_add(add))
            .collect();
        left = json!(shifted);
    }

    let out_map = single(merge_mappings(&arguments([
        ("mapping1", Value::Object(mapping.clone())),
        ("mapping2", Value::Object(mapping.clone())),
    ]))?)?;
    let left_viz = single(most_common_viz(&arguments([("ints", left.clone())]))?)?;
    let right_viz = single(most_common_viz(&arguments([("ints", right.clone())]))?)?;
    Ok(vec![out_map, left, right, left_viz, right_viz])
}

/// Supplies its own single integer when none is given.
pub(crate) fn optional_artifact_pipeline(args: &Arguments) -> Outputs {
    let int_sequence = json!(args::ints(args, "int_sequence")?);
    let single_int = args::optional_int(args, "single_int")?.unwrap_or(POINTLESS_INT);
    optional_artifacts_method(&arguments([
        ("ints", int_sequence),
        ("num1", json!(single_int)),
    ]))
}

pub(crate) fn visualizer_only_pipeline(args: &Arguments) -> Outputs {
    let mapping = Value::Object(args::mapping(args, "mapping")?.clone());
    let viz1 = single(no_input_viz(&Arguments::new())?)?;
    let viz2 = single(mapping_viz(&arguments([
        ("mapping1", mapping.clone()),
        ("mapping2", mapping),
        ("key_label", json!("foo")),
        ("value_label", json!("bar")),
    ]))?)?;
    Ok(vec![viz1, viz2])
}

pub(crate) fn pointless_pipeline(_: &Arguments) -> Outputs {
    Ok(vec![json!(POINTLESS_INT)])
}

pub(crate) fn pipelines_in_pipeline(args: &Arguments) -> Outputs {
    let int_sequence = json!(args::ints(args, "int_sequence")?);
    let mapping = Value::Object(args::mapping(args, "mapping")?.clone());
    let mut outputs = pointless_pipeline(&Arguments::new())?;
    let typical = typical_pipeline(&arguments([
        ("int_sequence", int_sequence),
        ("mapping", mapping),
        ("do_extra_thing", json!(false)),
    ]))?;
    let out_map = typical
        .first()
        .cloned()
        .ok_or_else(|| ActionFailure::new("typical_pipeline produced no mapping"))?;
    outputs.extend(typical);
    outputs.extend(visualizer_only_pipeline(&arguments([("mapping", out_map)]))?);
    Ok(outputs)
}

/// Breaks in the way `break_from` names; never succeeds.
pub(crate) fn failing_pipeline(args: &Arguments) -> Outputs {
    let int_sequence = json!(args::ints(args, "int_sequence")?);
    match args::text(args, "break_from")? {
        "arity" => Ok(vec![int_sequence.clone(), int_sequence.clone(), int_sequence]),
        "return-view" => Ok(vec![Value::Null]),
        "type" => Ok(vec![json!(1)]),
        "method" => merge_mappings(&arguments([
            ("mapping1", json!({"foo": "a"})),
            ("mapping2", json!({"foo": "b"})),
        ])),
        "no-plugin" => Err(ActionFailure::new("no plugin named 'not%a$plugin'")),
        "no-action" => Err(ActionFailure::new(
            "no action named 'not%a$method' in 'dummy-plugin'",
        )),
        _ => Err(ActionFailure::new("this never works")),
    }
}

pub(crate) fn specs() -> Vec<ActionSpec> {
    vec![
        ActionSpec::new(
            Callable::new("parameter_only_pipeline", 3, parameter_only_pipeline),
            "Do multiple things",
            "This pipeline only accepts parameters",
        )
        .parameter("int1", Primitive::Int)
        .parameter("int2", Primitive::Int)
        .parameter("metadata", Primitive::Metadata)
        .parameter_description("int1", "An integer, the first one in fact")
        .parameter_description("int2", "An integer, the second one")
        .parameter_description("metadata", "Very little is done with this")
        .output("foo", leaf(INT_SEQUENCE2))
        .output("bar", leaf(INT_SEQUENCE1))
        .output_description("foo", "Foo - \"The Integers of 2\"")
        .output_description("bar", "Bar - \"What a sequences\"")
        .invokes("identity_with_optional_metadata")
        .invokes("concatenate_ints"),
        ActionSpec::new(
            Callable::new("typical_pipeline", 4, typical_pipeline),
            "A typical pipeline with the potential to raise an error",
            "Waste some time shuffling data around for no reason",
        )
        .input("int_sequence", leaf(INT_SEQUENCE1))
        .input("mapping", leaf(MAPPING))
        .input_description("int_sequence", "A sequence of ints")
        .input_description("mapping", "A map to a number other than 42 will fail")
        .parameter("do_extra_thing", Primitive::Bool)
        .parameter("add", Primitive::Int)
        .parameter_description("do_extra_thing", "Increment `left` by `add` if true")
        .parameter_description("add", "Unused if `do_extra_thing` is false")
        .output("out_map", leaf(MAPPING))
        .output("left", leaf(INT_SEQUENCE1))
        .output("right", leaf(INT_SEQUENCE1))
        .output("left_viz", OutputType::Visualization)
        .output("right_viz", OutputType::Visualization)
        .output_description("out_map", "Same as input")
        .output_description("left", "Left side of `int_sequence` unless `do_extra_thing`")
        .output_description("right", "Right side of `int_sequence`")
        .output_description("left_viz", "`left` visualized")
        .output_description("right_viz", "`right` visualized")
        .invokes("split_ints")
        .invokes("merge_mappings")
        .invokes("most_common_viz"),
        ActionSpec::new(
            Callable::new("optional_artifact_pipeline", 2, optional_artifact_pipeline),
            "Do stuff normally, but override this one step sometimes",
            "Creates its own single_int, unless provided",
        )
        .input("int_sequence", leaf(INT_SEQUENCE1))
        .input("single_int", leaf(SINGLE_INT))
        .input_description("int_sequence", "Some integers")
        .input_description("single_int", "An integer")
        .output("ints", leaf(INT_SEQUENCE1))
        .output_description("ints", "More integers")
        .invokes("optional_artifacts_method"),
        ActionSpec::new(
            Callable::new("visualizer_only_pipeline", 1, visualizer_only_pipeline),
            "Visualize many things",
            "Looks at both nothing and a mapping",
        )
        .input("mapping", leaf(MAPPING))
        .input_description("mapping", "A mapping to look at twice")
        .output("viz1", OutputType::Visualization)
        .output("viz2", OutputType::Visualization)
        .output_description("viz1", "The no input viz")
        .output_description(
            "viz2",
            "Our `mapping` seen through the lense of \"foo\" *and* \"bar\"",
        )
        .invokes("no_input_viz")
        .invokes("mapping_viz"),
        ActionSpec::new(
            Callable::new("pointless_pipeline", 0, pointless_pipeline),
            "Get an integer",
            "Integer was chosen to be 4 by a random dice roll",
        )
        .output("random_int", leaf(SINGLE_INT)),
        ActionSpec::new(
            Callable::new("pipelines_in_pipeline", 2, pipelines_in_pipeline),
            "Do a great many things",
            "Mapping is chained from typical_pipeline into visualizer_only_pipeline",
        )
        .input("int_sequence", leaf(INT_SEQUENCE1))
        .input("mapping", leaf(MAPPING))
        .output("int1", leaf(SINGLE_INT))
        .output("out_map", leaf(MAPPING))
        .output("left", leaf(INT_SEQUENCE1))
        .output("right", leaf(INT_SEQUENCE1))
        .output("left_viz", OutputType::Visualization)
        .output("right_viz", OutputType::Visualization)
        .output("viz1", OutputType::Visualization)
        .output("viz2", OutputType::Visualization)
        .invokes("pointless_pipeline")
        .invokes("typical_pipeline")
        .invokes("visualizer_only_pipeline"),
        ActionSpec::new(
            Callable::new("failing_pipeline", 2, failing_pipeline),
            "Test different ways of failing",
            "This is useful to make sure all of the intermediate stuff is cleaned up the way \
             it should be.",
        )
        .input("int_sequence", leaf(INT_SEQUENCE1))
        .parameter(
            "break_from",
            ParameterSpec::new(Primitive::Str).with_choices(Choices::new(FAILURE_MODES)),
        )
        .output("mapping", leaf(MAPPING))
        .invokes("merge_mappings"),
    ]
}
