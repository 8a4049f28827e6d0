//! Unit tests for the plugin aggregate.

use rstest::{fixture, rstest};

use super::*;
use crate::action::{Arguments, Callable, OutputType, Primitive};
use crate::error::RegistryError;

fn leaf(name: &str) -> TypeExpr {
    TypeExpr::leaf(name)
}

fn identity(id: &str) -> Callable {
    Callable::new(id, 1, |args: &Arguments| Ok(args.values().cloned().collect()))
}

#[fixture]
fn plugin() -> Plugin {
    let mut plugin = Plugin::new(
        PluginMetadata::new("dummy-plugin", "0.0.0-dev").with_package("dummy_plugin"),
    )
    .expect("metadata is valid");
    plugin
        .register_semantic_types([
            SemanticType::plain("Mapping"),
            SemanticType::plain("Dog"),
            SemanticType::plain("Cat"),
            SemanticType::container("Kennel", leaf("Dog") | leaf("Cat")),
        ])
        .expect("register types");
    plugin
        .register_formats([
            Format::file("MappingFormat").with_views(["dict"]),
            Format::single_file_directory("MappingDirectoryFormat", "mapping.tsv", "MappingFormat")
                .with_views(["dict"]),
        ])
        .expect("register formats");
    plugin
}

// ---------------------------------------------------------------------------
// Metadata
// ---------------------------------------------------------------------------

#[rstest]
#[case::blank_name(PluginMetadata::new("  ", "1.0"))]
#[case::blank_version(PluginMetadata::new("dummy", ""))]
fn blank_identity_is_rejected(#[case] metadata: PluginMetadata) {
    let err = Plugin::new(metadata).expect_err("invalid metadata");
    assert!(matches!(err, RegistryError::Metadata { .. }));
}

#[test]
fn metadata_defaults_optional_fields() {
    let metadata: PluginMetadata =
        serde_json::from_str(r#"{"name": "dummy", "version": "1"}"#).expect("deserialise");
    assert_eq!(metadata, PluginMetadata::new("dummy", "1"));
}

// ---------------------------------------------------------------------------
// Registration
// ---------------------------------------------------------------------------

#[rstest]
fn binding_kennel_covers_each_animal(mut plugin: Plugin) {
    let kennel = TypeExpr::parameterized("Kennel", leaf("Dog") | leaf("Cat"));
    plugin
        .register_semantic_type_to_format(&kennel, "MappingDirectoryFormat")
        .expect("bind kennel");
    for animal in ["Dog", "Cat"] {
        let concrete = TypeExpr::parameterized("Kennel", leaf(animal));
        assert_eq!(
            plugin.format_for(&concrete).map(Format::name),
            Some("MappingDirectoryFormat")
        );
    }
}

#[rstest]
fn registrars_record_their_kind(mut plugin: Plugin) {
    plugin
        .methods()
        .register_function(
            ActionSpec::new(identity("identity_with_mapping"), "Identity", "Echoes.")
                .input("mapping", leaf("Mapping"))
                .output("out", leaf("Mapping")),
        )
        .expect("method");
    plugin
        .visualizers()
        .register_function(
            ActionSpec::new(identity("mapping_viz"), "Visualize", "Shows a mapping.")
                .input("mapping", leaf("Mapping")),
        )
        .expect("visualizer");
    plugin
        .pipelines()
        .register_function(
            ActionSpec::new(identity("echo_pipeline"), "Echo", "Runs identity.")
                .input("mapping", leaf("Mapping"))
                .output("out", leaf("Mapping"))
                .invokes("identity_with_mapping"),
        )
        .expect("pipeline");

    for (id, kind) in [
        ("identity_with_mapping", ActionKind::Method),
        ("mapping_viz", ActionKind::Visualizer),
        ("echo_pipeline", ActionKind::Pipeline),
    ] {
        assert_eq!(plugin.action(id).expect("registered").kind(), kind);
    }
}

#[rstest]
fn actions_share_one_namespace_across_kinds(mut plugin: Plugin) {
    plugin
        .methods()
        .register_function(
            ActionSpec::new(identity("foo"), "Foo", "First.")
                .input("mapping", leaf("Mapping"))
                .output("out", leaf("Mapping")),
        )
        .expect("first foo");
    let err = plugin
        .visualizers()
        .register_function(
            ActionSpec::new(identity("foo"), "Foo", "Second.").input("mapping", leaf("Mapping")),
        )
        .expect_err("second foo");
    assert!(matches!(err, RegistryError::DuplicateAction { ref action } if action == "foo"));
}

#[rstest]
fn unknown_action_lookup_fails(plugin: Plugin) {
    let err = plugin.action("missing").expect_err("unknown");
    assert!(matches!(err, RegistryError::UnknownAction { .. }));
}

// ---------------------------------------------------------------------------
// Sealing and catalog
// ---------------------------------------------------------------------------

#[rstest]
fn sealed_plugin_is_shared_read_only(plugin: Plugin) {
    fn assert_send_sync<T: Send + Sync>(_: &T) {}

    let sealed = plugin.seal();
    assert_send_sync(&sealed);
    let other = sealed.clone();
    let handle = std::thread::spawn(move || other.types().len());
    let seen = handle.join().expect("reader thread");
    assert_eq!(seen, sealed.types().len());
}

#[rstest]
fn catalog_lists_registrations_in_order(mut plugin: Plugin) {
    plugin
        .register_semantic_type_to_format(&leaf("Mapping"), "MappingDirectoryFormat")
        .expect("bind mapping");
    plugin
        .methods()
        .register_function(
            ActionSpec::new(
                Callable::new("params_only", 2, |_: &Arguments| Ok(Vec::new())),
                "Parameters only",
                "Takes no artifacts.",
            )
            .parameter("name", Primitive::Str)
            .parameter("age", Primitive::Int)
            .output("out", OutputType::from(leaf("Mapping"))),
        )
        .expect("method");

    let catalog = plugin.catalog();
    let type_names: Vec<&str> = catalog.types.iter().map(SemanticType::name).collect();
    assert_eq!(type_names, vec!["Cat", "Dog", "Kennel", "Mapping"]);
    assert_eq!(catalog.bindings.len(), 1);
    assert_eq!(catalog.actions.first().map(|a| a.id.as_str()), Some("params_only"));

    let value = serde_json::to_value(&catalog).expect("serialise catalog");
    assert_eq!(value["bindings"][0]["type"], "Mapping");
    assert_eq!(value["actions"][0]["kind"], "method");
    assert_eq!(
        value["actions"][0]["signature"]["parameters"][1]["type"],
        "int"
    );
}
