//! Crate-level integration and BDD tests.

use serde_json::json;

use crate::action::{ActionKind, ActionSpec, Arguments, Callable, OutputType};
use crate::format::Format;
use crate::plugin::{Plugin, PluginMetadata};
use crate::semantic::{SemanticType, TypeExpr};

mod behaviour;

fn leaf(name: &str) -> TypeExpr {
    TypeExpr::leaf(name)
}

#[test]
fn end_to_end_registration_and_lookup() {
    let mut plugin = Plugin::new(
        PluginMetadata::new("sequences", "1.0.0").with_short_description("Integer sequences."),
    )
    .expect("plugin");
    plugin
        .register_semantic_types([
            SemanticType::plain("IntSequence1"),
            SemanticType::plain("IntSequence2"),
        ])
        .expect("types");
    plugin
        .register_formats([
            Format::file("IntSequenceFormat").with_views(["list"]),
            Format::single_file_directory(
                "IntSequenceDirectoryFormat",
                "ints.tsv",
                "IntSequenceFormat",
            )
            .with_views(["list"]),
        ])
        .expect("formats");
    let sequences = leaf("IntSequence1") | leaf("IntSequence2");
    plugin
        .register_semantic_type_to_format(&sequences, "IntSequenceDirectoryFormat")
        .expect("bind");

    let concatenate = Callable::new("concatenate_ints", 2, |args: &Arguments| {
        let joined: Vec<serde_json::Value> = ["ints1", "ints2"]
            .iter()
            .filter_map(|name| args.get(*name).and_then(serde_json::Value::as_array))
            .flatten()
            .cloned()
            .collect();
        Ok(vec![json!(joined)])
    });
    plugin
        .methods()
        .register_function(
            ActionSpec::new(concatenate, "Concatenate integers", "Joins two sequences.")
                .input("ints1", sequences.clone())
                .input("ints2", leaf("IntSequence1"))
                .output("concatenated_ints", OutputType::from(leaf("IntSequence1"))),
        )
        .expect("method");

    let sealed = plugin.seal();
    let action = sealed.action("concatenate_ints").expect("registered");
    assert_eq!(action.kind(), ActionKind::Method);
    assert_eq!(
        action.signature().input("ints1"),
        Some(&sequences),
        "stored signature keeps the declared union"
    );

    let mut args = Arguments::new();
    args.insert("ints1".into(), json!([0, 42]));
    args.insert("ints2".into(), json!([43]));
    let outputs = action.callable().invoke(&args).expect("invoke");
    assert_eq!(outputs, vec![json!([0, 42, 43])]);

    for member in ["IntSequence1", "IntSequence2"] {
        assert_eq!(
            sealed.format_for(&leaf(member)).map(Format::name),
            Some("IntSequenceDirectoryFormat")
        );
    }
}
