//! File and directory formats.

use plugin_registry::{DirectoryMember, Format};

pub(crate) fn formats() -> Vec<Format> {
    vec![
        Format::file("IntSequenceFormat").with_views(["list", "counter"]),
        Format::file("IntSequenceFormatV2").with_views(["list", "counter"]),
        Format::file("MappingFormat").with_views(["dict"]),
        Format::file("SingleIntFormat").with_views(["int"]),
        Format::single_file_directory(
            "IntSequenceDirectoryFormat",
            "ints.tsv",
            "IntSequenceFormat",
        )
        .with_views(["list", "counter"]),
        Format::single_file_directory(
            "IntSequenceV2DirectoryFormat",
            "integers.txt",
            "IntSequenceFormatV2",
        )
        .with_views(["list", "counter"]),
        Format::single_file_directory("MappingDirectoryFormat", "mapping.tsv", "MappingFormat")
            .with_views(["dict"]),
        Format::directory(
            "FourIntsDirectoryFormat",
            vec![
                DirectoryMember::new(r"file[1-2]\.txt", "SingleIntFormat"),
                DirectoryMember::new("file3.txt", "SingleIntFormat"),
                DirectoryMember::new("nested/file4.txt", "SingleIntFormat"),
            ],
        )
        .with_views(["list"]),
        Format::file("UnimportableFormat").unimportable(),
        Format::single_file_directory(
            "UnimportableDirectoryFormat",
            "ints.tsv",
            "UnimportableFormat",
        )
        .unimportable(),
        Format::directory(
            "RedundantSingleIntDirectoryFormat",
            vec![
                DirectoryMember::new("file1.txt", "SingleIntFormat"),
                DirectoryMember::new("file2.txt", "SingleIntFormat"),
            ],
        )
        .with_views(["int"]),
    ]
}
