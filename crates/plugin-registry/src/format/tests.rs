//! Unit tests for format declarations and bindings.

use rstest::{fixture, rstest};

use super::*;
use crate::error::RegistryError;
use crate::semantic::SemanticType;

fn leaf(name: &str) -> TypeExpr {
    TypeExpr::leaf(name)
}

#[fixture]
fn types() -> TypeRegistry {
    let mut types = TypeRegistry::new();
    types
        .register_types([
            SemanticType::plain("A"),
            SemanticType::plain("B"),
            SemanticType::plain("D"),
            SemanticType::container("C", leaf("A") | leaf("B")),
        ])
        .expect("register types");
    types
}

#[fixture]
fn formats() -> FormatRegistry {
    let mut formats = FormatRegistry::new();
    formats
        .register_formats([
            Format::file("TextFormat").with_views(["str"]),
            Format::single_file_directory("F", "data.txt", "TextFormat").with_views(["str"]),
            Format::single_file_directory("G", "other.txt", "TextFormat").with_views(["str"]),
        ])
        .expect("register formats");
    formats
}

// ---------------------------------------------------------------------------
// Registration
// ---------------------------------------------------------------------------

#[rstest]
fn registered_formats_are_resolvable(formats: FormatRegistry) {
    assert_eq!(formats.len(), 3);
    let f = formats.resolve("F").expect("resolve F");
    assert!(f.is_directory());
    assert_eq!(f.referenced_formats(), vec!["TextFormat"]);
}

#[rstest]
fn duplicate_format_is_rejected(mut formats: FormatRegistry) {
    let err = formats
        .register_formats([Format::file("TextFormat").with_views(["str"])])
        .expect_err("duplicate");
    assert!(matches!(err, RegistryError::DuplicateFormat { name } if name == "TextFormat"));
}

#[test]
fn unknown_member_format_is_rejected() {
    let mut formats = FormatRegistry::new();
    let err = formats
        .register_formats([Format::directory(
            "Dir",
            vec![DirectoryMember::new("file1.txt", "Missing")],
        )
        .with_views(["str"])])
        .expect_err("missing member format");
    assert!(matches!(
        err,
        RegistryError::UndefinedReference { ref reference, .. } if reference == "Missing"
    ));
    assert!(formats.is_empty(), "failed batch must not be kept");
}

#[test]
fn member_may_be_declared_later_in_the_same_batch() {
    let mut formats = FormatRegistry::new();
    formats
        .register_formats([
            Format::directory("Dir", vec![DirectoryMember::new("file1.txt", "Single")])
                .with_views(["int"]),
            Format::file("Single").with_views(["int"]),
        ])
        .expect("batch is a set");
    assert_eq!(formats.len(), 2);
}

#[test]
fn directory_member_must_be_a_file_format() {
    let mut formats = FormatRegistry::new();
    formats
        .register_formats([
            Format::file("Single").with_views(["int"]),
            Format::single_file_directory("Inner", "x.txt", "Single").with_views(["int"]),
        ])
        .expect("register base formats");
    let err = formats
        .register_formats([Format::single_file_directory("Outer", "y", "Inner").with_views(["int"])])
        .expect_err("directory member");
    assert!(matches!(err, RegistryError::InvalidFormat { .. }));
}

#[test]
fn importable_format_requires_a_view() {
    let mut formats = FormatRegistry::new();
    let err = formats
        .register_formats([Format::file("Viewless")])
        .expect_err("no views");
    assert!(matches!(err, RegistryError::InvalidFormat { ref name, .. } if name == "Viewless"));
}

#[test]
fn unimportable_format_may_omit_views() {
    let mut formats = FormatRegistry::new();
    formats
        .register_formats([Format::file("Opaque").unimportable()])
        .expect("unimportable formats need no views");
    assert!(!formats.resolve("Opaque").expect("resolve").is_importable());
}

#[test]
fn format_serialises_with_layout_tag() {
    let format = Format::single_file_directory("F", "data.txt", "TextFormat").with_views(["str"]);
    let value = serde_json::to_value(&format).expect("serialise");
    assert_eq!(value["layout"], "single_file_directory");
    assert_eq!(value["file_format"], "TextFormat");
    let back: Format = serde_json::from_value(value).expect("deserialise");
    assert_eq!(back, format);
}

// ---------------------------------------------------------------------------
// Binding
// ---------------------------------------------------------------------------

#[rstest]
fn binding_a_concrete_type(types: TypeRegistry, mut formats: FormatRegistry) {
    formats.bind(&types, &leaf("A"), "F").expect("bind A");
    let bound = formats.format_for(&leaf("A")).expect("A is bound");
    assert_eq!(bound.name(), "F");
    assert!(formats.format_for(&leaf("B")).is_none());
}

#[rstest]
fn binding_a_union_binds_each_member(types: TypeRegistry, mut formats: FormatRegistry) {
    formats.bind(&types, &(leaf("A") | leaf("B")), "F").expect("bind union");
    for member in ["A", "B"] {
        let bound = formats.format_for(&leaf(member)).expect("member is bound");
        assert_eq!(bound.name(), "F");
    }
}

#[rstest]
fn binding_a_parameterised_union_binds_each_parameterisation(
    types: TypeRegistry,
    mut formats: FormatRegistry,
) {
    let container = TypeExpr::parameterized("C", leaf("A") | leaf("B"));
    formats.bind(&types, &container, "F").expect("bind container");
    for member in ["A", "B"] {
        let concrete = TypeExpr::parameterized("C", leaf(member));
        let bound = formats.format_for(&concrete).expect("parameterisation is bound");
        assert_eq!(bound.name(), "F");
    }
    assert_eq!(formats.types_for("F").len(), 2);
}

#[rstest]
#[case::alone(leaf("C"))]
#[case::in_union(leaf("C") | leaf("A"))]
fn binding_an_unparameterised_container_fails(
    types: TypeRegistry,
    mut formats: FormatRegistry,
    #[case] expr: TypeExpr,
) {
    let error = formats.bind(&types, &expr, "F").expect_err("bare container");
    assert!(matches!(
        &error,
        RegistryError::InvalidTypeExpr { message, .. } if message.contains("must be parameterised")
    ));
    assert_eq!(formats.bindings().count(), 0);
    assert!(formats.format_for(&leaf("A")).is_none());
}

#[rstest]
fn rebinding_a_concrete_type_fails(types: TypeRegistry, mut formats: FormatRegistry) {
    formats.bind(&types, &leaf("A"), "F").expect("first bind");
    let err = formats.bind(&types, &leaf("A"), "G").expect_err("rebind");
    assert!(matches!(err, RegistryError::AlreadyBound { ref format, .. } if format == "F"));
    let err = formats.bind(&types, &leaf("A"), "F").expect_err("same format");
    assert!(matches!(err, RegistryError::AlreadyBound { .. }));
}

#[rstest]
fn union_overlapping_with_same_format_is_accepted(
    types: TypeRegistry,
    mut formats: FormatRegistry,
) {
    formats.bind(&types, &leaf("A"), "F").expect("bind A");
    formats
        .bind(&types, &(leaf("A") | leaf("D")), "F")
        .expect("overlap on the same format is idempotent");
    assert_eq!(formats.format_for(&leaf("D")).map(Format::name), Some("F"));
}

#[rstest]
fn union_overlapping_with_other_format_conflicts(
    types: TypeRegistry,
    mut formats: FormatRegistry,
) {
    formats.bind(&types, &leaf("A"), "G").expect("bind A");
    let err = formats
        .bind(&types, &(leaf("A") | leaf("D")), "F")
        .expect_err("conflict");
    assert!(matches!(
        err,
        RegistryError::ConflictingBinding { ref existing, ref requested, .. }
            if existing == "G" && requested == "F"
    ));
    assert!(
        formats.format_for(&leaf("D")).is_none(),
        "conflicting bindings must not be partially applied"
    );
}

#[rstest]
fn union_fully_bound_to_same_format_is_already_bound(
    types: TypeRegistry,
    mut formats: FormatRegistry,
) {
    formats.bind(&types, &(leaf("A") | leaf("B")), "F").expect("first bind");
    let err = formats
        .bind(&types, &(leaf("A") | leaf("B")), "F")
        .expect_err("nothing new to bind");
    assert!(matches!(err, RegistryError::AlreadyBound { .. }));
}

#[rstest]
fn binding_unknown_type_fails(types: TypeRegistry, mut formats: FormatRegistry) {
    let err = formats.bind(&types, &leaf("Z"), "F").expect_err("unknown type");
    assert!(matches!(err, RegistryError::UnregisteredType { ref type_expr } if type_expr == "Z"));
}

#[rstest]
fn binding_unknown_format_fails(types: TypeRegistry, mut formats: FormatRegistry) {
    let err = formats.bind(&types, &leaf("A"), "Nope").expect_err("unknown format");
    assert!(matches!(err, RegistryError::UnregisteredFormat { ref name } if name == "Nope"));
}

#[rstest]
fn binding_to_file_format_fails(types: TypeRegistry, mut formats: FormatRegistry) {
    let err = formats
        .bind(&types, &leaf("A"), "TextFormat")
        .expect_err("file format");
    assert!(matches!(err, RegistryError::InvalidFormat { .. }));
}
