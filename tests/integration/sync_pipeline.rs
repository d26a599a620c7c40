//! End-to-end pipeline tests: catalog records against a real directory

use super::test_utils::{file, folder, root_name, tagged_names};
use std::fs;
use tempfile::TempDir;
use treesync::catalog::assemble_tree;
use treesync::diff;
use treesync::materialize;
use treesync::tree::builder::LocalTreeBuilder;

/// Catalog has week1/{intro.pdf, extra.pdf} and week2/notes.pdf; the local
/// store already holds week1/intro.pdf. Only the missing entities get
/// tagged, and the plan contains exactly those.
#[test]
fn test_partial_local_store_tags_only_missing_entities() {
    let temp = TempDir::new().unwrap();
    let base = temp.path().to_path_buf();
    let root = root_name(&base);

    fs::create_dir(base.join("week1")).unwrap();
    fs::write(base.join("week1").join("intro.pdf"), "x").unwrap();

    let folders = vec![folder(1, None, "week1"), folder(2, None, "week2")];
    let files = vec![
        file(10, 1, "intro.pdf"),
        file(11, 1, "extra.pdf"),
        file(12, 2, "notes.pdf"),
    ];

    let source = assemble_tree(&root, &folders, &files);
    let destination = LocalTreeBuilder::new(base).build().unwrap();
    let merged = diff::diff(&source, &destination);

    assert_eq!(
        tagged_names(&merged),
        vec![
            format!("{}/week1/extra.pdf", root),
            format!("{}/week2", root),
            format!("{}/week2/notes.pdf", root),
        ]
    );

    let plan = materialize::plan(&merged);
    assert_eq!(plan.directories, vec![format!("{}/week2", root)]);
    let paths: Vec<&str> = plan.files.iter().map(|f| f.path.as_str()).collect();
    assert_eq!(
        paths,
        vec![
            format!("{}/week1/extra.pdf", root),
            format!("{}/week2/notes.pdf", root),
        ]
    );
}

/// A fully mirrored store produces no tags and an empty plan.
#[test]
fn test_fully_mirrored_store_produces_empty_plan() {
    let temp = TempDir::new().unwrap();
    let base = temp.path().to_path_buf();
    let root = root_name(&base);

    fs::create_dir(base.join("week1")).unwrap();
    fs::write(base.join("week1").join("intro.pdf"), "x").unwrap();

    let folders = vec![folder(1, None, "week1")];
    let files = vec![file(10, 1, "intro.pdf")];

    let source = assemble_tree(&root, &folders, &files);
    let destination = LocalTreeBuilder::new(base).build().unwrap();
    let merged = diff::diff(&source, &destination);

    assert!(tagged_names(&merged).is_empty());
    assert!(materialize::plan(&merged).is_empty());
}

/// Local-only entities survive in the merged tree (untagged) instead of
/// being deleted; the engine never removes anything.
#[test]
fn test_local_only_entities_are_kept_untagged() {
    let temp = TempDir::new().unwrap();
    let base = temp.path().to_path_buf();
    let root = root_name(&base);

    fs::create_dir(base.join("scratch")).unwrap();
    fs::write(base.join("scratch").join("draft.txt"), "x").unwrap();

    let source = assemble_tree(&root, &[], &[]);
    let destination = LocalTreeBuilder::new(base).build().unwrap();
    let merged = diff::diff(&source, &destination);

    let scratch = merged
        .find_by_name(&format!("{}/scratch", root))
        .expect("local-only directory kept");
    assert!(!merged.node(scratch).tag());
    assert!(merged
        .find_by_name(&format!("{}/scratch/draft.txt", root))
        .is_some());
}

/// Same inputs, same output: the whole pipeline is deterministic.
#[test]
fn test_pipeline_is_deterministic() {
    let temp = TempDir::new().unwrap();
    let base = temp.path().to_path_buf();
    let root = root_name(&base);
    fs::write(base.join("kept.pdf"), "x").unwrap();

    let folders = vec![folder(1, None, "b"), folder(2, None, "a")];
    let files = vec![file(10, 1, "z.pdf"), file(11, 2, "y.pdf")];

    let run = || {
        let source = assemble_tree(&root, &folders, &files);
        let destination = LocalTreeBuilder::new(base.clone()).build().unwrap();
        tagged_names(&diff::diff(&source, &destination))
    };
    assert_eq!(run(), run());
}
