//! Snapshot persistence across sync runs

use super::test_utils::{file, folder, root_name, tagged_names};
use std::fs;
use tempfile::TempDir;
use treesync::catalog::assemble_tree;
use treesync::diff;
use treesync::snapshot;
use treesync::tree::builder::LocalTreeBuilder;

/// A merged tree written after run one, used as the destination of run two
/// with an unchanged catalog, tags nothing: the snapshot already covers
/// every source entity.
#[test]
fn test_second_run_against_snapshot_tags_nothing() {
    let temp = TempDir::new().unwrap();
    let base = temp.path().to_path_buf();
    let snapshot_dir = temp.path().join(".snapshot");
    let root = root_name(&base);

    let folders = vec![folder(1, None, "week1")];
    let files = vec![file(10, 1, "intro.pdf")];

    // run one: empty local store, everything tagged
    let source = assemble_tree(&root, &folders, &files);
    let destination = LocalTreeBuilder::new(base).build().unwrap();
    let merged = diff::diff(&source, &destination);
    assert!(!tagged_names(&merged).is_empty());

    snapshot::write_snapshot(&snapshot_dir, &merged).unwrap();

    // run two: snapshot stands in for the walked store
    let restored = snapshot::load_newest_snapshot(&snapshot_dir)
        .unwrap()
        .expect("snapshot written in run one");
    let source = assemble_tree(&root, &folders, &files);
    let merged = diff::diff(&source, &restored);

    assert!(tagged_names(&merged).is_empty());
}

/// A catalog addition between runs is the only thing tagged on run two.
#[test]
fn test_catalog_addition_tagged_against_snapshot() {
    let temp = TempDir::new().unwrap();
    let base = temp.path().to_path_buf();
    let snapshot_dir = temp.path().join(".snapshot");
    let root = root_name(&base);

    let folders = vec![folder(1, None, "week1")];
    let files = vec![file(10, 1, "intro.pdf")];

    let source = assemble_tree(&root, &folders, &files);
    let destination = LocalTreeBuilder::new(base).build().unwrap();
    snapshot::write_snapshot(&snapshot_dir, &diff::diff(&source, &destination)).unwrap();

    let mut files = files;
    files.push(file(11, 1, "extra.pdf"));
    let source = assemble_tree(&root, &folders, &files);
    let restored = snapshot::load_newest_snapshot(&snapshot_dir)
        .unwrap()
        .unwrap();
    let merged = diff::diff(&source, &restored);

    assert_eq!(
        tagged_names(&merged),
        vec![format!("{}/week1/extra.pdf", root)]
    );
}

/// Snapshots accumulate; the loader always picks the latest one.
#[test]
fn test_snapshots_accumulate_and_newest_loads() {
    let temp = TempDir::new().unwrap();
    let base = temp.path().to_path_buf();
    let snapshot_dir = temp.path().join(".snapshot");
    let root = root_name(&base);
    fs::write(base.join("seed.txt"), "x").unwrap();

    let first = LocalTreeBuilder::new(base.clone()).build().unwrap();
    snapshot::write_snapshot(&snapshot_dir, &first).unwrap();

    // snapshot names are millisecond timestamps; keep them distinct
    std::thread::sleep(std::time::Duration::from_millis(5));

    fs::write(base.join("later.txt"), "x").unwrap();
    let second = LocalTreeBuilder::new(base).build().unwrap();
    snapshot::write_snapshot(&snapshot_dir, &second).unwrap();

    assert_eq!(snapshot::list_snapshots(&snapshot_dir).unwrap().len(), 2);
    let restored = snapshot::load_newest_snapshot(&snapshot_dir)
        .unwrap()
        .unwrap();
    assert!(restored
        .find_by_name(&format!("{}/later.txt", root))
        .is_some());
}
