//! Semantic types and their artifact format bindings.

use plugin_registry::{SemanticType, TypeExpr};

/// Integer sequence, first flavour.
pub const INT_SEQUENCE1: &str = "IntSequence1";
/// Integer sequence, second flavour.
pub const INT_SEQUENCE2: &str = "IntSequence2";
/// String to string mapping.
pub const MAPPING: &str = "Mapping";
/// Exactly four integers.
pub const FOUR_INTS: &str = "FourInts";
/// A single integer.
pub const SINGLE_INT: &str = "SingleInt";
/// Container over pets.
pub const KENNEL: &str = "Kennel";
/// A pet.
pub const DOG: &str = "Dog";
/// Another pet.
pub const CAT: &str = "Cat";

pub(crate) fn leaf(name: &str) -> TypeExpr {
    TypeExpr::leaf(name)
}

/// `IntSequence1 | IntSequence2`.
pub(crate) fn any_int_sequence() -> TypeExpr {
    leaf(INT_SEQUENCE1) | leaf(INT_SEQUENCE2)
}

/// `Kennel[Dog | Cat]`.
pub(crate) fn kennel() -> TypeExpr {
    TypeExpr::parameterized(KENNEL, leaf(DOG) | leaf(CAT))
}

pub(crate) fn semantic_types() -> Vec<SemanticType> {
    vec![
        SemanticType::plain(INT_SEQUENCE1),
        SemanticType::plain(INT_SEQUENCE2),
        SemanticType::plain(MAPPING),
        SemanticType::plain(FOUR_INTS),
        SemanticType::container(KENNEL, leaf(DOG) | leaf(CAT)),
        SemanticType::plain(DOG),
        SemanticType::plain(CAT),
        SemanticType::plain(SINGLE_INT),
    ]
}

pub(crate) fn bindings() -> Vec<(TypeExpr, &'static str)> {
    vec![
        (leaf(INT_SEQUENCE1), "IntSequenceDirectoryFormat"),
        (leaf(INT_SEQUENCE2), "IntSequenceV2DirectoryFormat"),
        (leaf(MAPPING), "MappingDirectoryFormat"),
        (leaf(FOUR_INTS), "FourIntsDirectoryFormat"),
        (leaf(SINGLE_INT), "RedundantSingleIntDirectoryFormat"),
        (kennel(), "MappingDirectoryFormat"),
    ]
}
