//! Catalog listing to tree assembly, with config filters applied

use super::test_utils::{file, folder, root_name, tagged_names};
use tempfile::TempDir;
use treesync::catalog::{assemble_tree, filter_files};
use treesync::config::SyncConfig;
use treesync::diff;
use treesync::tree::builder::LocalTreeBuilder;

/// Filtered-out records never reach the tree, so they can never be tagged
/// or fetched even when missing locally.
#[test]
fn test_filtered_records_never_enter_the_pipeline() {
    let temp = TempDir::new().unwrap();
    let base = temp.path().to_path_buf();
    let root = root_name(&base);

    let config = SyncConfig::default();

    let folders = vec![folder(1, None, "media")];
    let mut lecture = file(10, 1, "lecture.mp4");
    lecture.mime_class = Some("video".to_string());
    let files = filter_files(&config, vec![lecture, file(11, 1, "slides.pdf")]);

    let source = assemble_tree(&root, &folders, &files);
    let destination = LocalTreeBuilder::new(base).build().unwrap();
    let merged = diff::diff(&source, &destination);

    assert!(merged
        .find_by_name(&format!("{}/media/lecture.mp4", root))
        .is_none());
    assert_eq!(
        tagged_names(&merged),
        vec![
            format!("{}/media", root),
            format!("{}/media/slides.pdf", root),
        ]
    );
}

/// Two same-named top-level folders in the listing collapse to one node,
/// and a local copy of one file leaves only the other tagged.
#[test]
fn test_duplicate_folder_names_collapse_before_diff() {
    let temp = TempDir::new().unwrap();
    let base = temp.path().to_path_buf();
    let root = root_name(&base);

    std::fs::create_dir(base.join("shared")).unwrap();
    std::fs::write(base.join("shared").join("a.pdf"), "x").unwrap();

    let folders = vec![folder(1, None, "shared"), folder(2, None, "shared")];
    let files = vec![file(10, 1, "a.pdf"), file(11, 2, "b.pdf")];

    let source = assemble_tree(&root, &folders, &files);
    let destination = LocalTreeBuilder::new(base).build().unwrap();
    let merged = diff::diff(&source, &destination);

    assert_eq!(
        tagged_names(&merged),
        vec![format!("{}/shared/b.pdf", root)]
    );
}

/// A folder whose parent id never appears in the listing still shows up,
/// attached at the top level.
#[test]
fn test_unknown_parent_folder_is_reachable() {
    let temp = TempDir::new().unwrap();
    let base = temp.path().to_path_buf();
    let root = root_name(&base);

    let folders = vec![folder(1, Some(404), "stray")];
    let files = vec![file(10, 1, "found.pdf")];

    let source = assemble_tree(&root, &folders, &files);
    let destination = LocalTreeBuilder::new(base).build().unwrap();
    let merged = diff::diff(&source, &destination);

    assert_eq!(
        tagged_names(&merged),
        vec![
            format!("{}/stray", root),
            format!("{}/stray/found.pdf", root),
        ]
    );
}
