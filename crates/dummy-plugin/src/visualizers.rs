//! Visualizers. Each renders its arguments as a JSON document standing in
//! for the visualization payload.

use std::collections::BTreeMap;

use plugin_registry::{ActionSpec, Arguments, Callable, Primitive};
use serde_json::json;

use crate::args::{self, Outputs};
use crate::types::{MAPPING, any_int_sequence, leaf};

pub(crate) fn params_only_viz(args: &Arguments) -> Outputs {
    let name = args::text(args, "name")?;
    let age = args::int(args, "age")?;
    Ok(vec![json!({"name": name, "age": age})])
}

pub(crate) fn no_input_viz(_: &Arguments) -> Outputs {
    Ok(vec![json!("Hello, World!")])
}

/// Counts each integer, most frequent first; ties keep first appearance.
pub(crate) fn most_common_viz(args: &Arguments) -> Outputs {
    let ints = args::ints(args, "ints")?;
    let mut tally: BTreeMap<i64, (usize, usize)> = BTreeMap::new();
    for (position, value) in ints.into_iter().enumerate() {
        tally.entry(value).or_insert((position, 0)).1 += 1;
    }
    let mut counts: Vec<_> = tally
        .into_iter()
        .map(|(value, (first, count))| (value, first, count))
        .collect();
    counts.sort_by(|left, right| right.2.cmp(&left.2).then(left.1.cmp(&right.1)));
    let rows: Vec<_> = counts
        .into_iter()
        .map(|(value, _, count)| json!({"value": value, "count": count}))
        .collect();
    Ok(vec![json!(rows)])
}

pub(crate) fn mapping_viz(args: &Arguments) -> Outputs {
    Ok(vec![json!({
        "key_label": args::text(args, "key_label")?,
        "value_label": args::text(args, "value_label")?,
        "mapping1": args::mapping(args, "mapping1")?,
        "mapping2": args::mapping(args, "mapping2")?,
    })])
}

pub(crate) fn specs() -> Vec<ActionSpec> {
    vec![
        ActionSpec::new(
            Callable::new("most_common_viz", 1, most_common_viz),
            "Visualize most common integers",
            "This visualizer produces HTML and TSV outputs containing the input sequence of \
             integers ordered from most- to least-frequently occurring, along with their \
             respective frequencies.",
        )
        .input("ints", any_int_sequence()),
        ActionSpec::new(
            Callable::new("mapping_viz", 4, mapping_viz),
            "Visualize two mappings",
            "This visualizer produces an HTML visualization of two key-value mappings, each \
             sorted in alphabetical order by key.",
        )
        .input("mapping1", leaf(MAPPING))
        .input("mapping2", leaf(MAPPING))
        .parameter("key_label", Primitive::Str)
        .parameter("value_label", Primitive::Str),
        ActionSpec::new(
            Callable::new("params_only_viz", 2, params_only_viz),
            "Parameters only viz",
            "This visualizer only accepts parameters.",
        )
        .parameter("name", Primitive::Str)
        .parameter("age", Primitive::Int),
        ActionSpec::new(
            Callable::new("no_input_viz", 0, no_input_viz),
            "No input viz",
            "This visualizer does not accept any type of input.",
        ),
    ]
}
