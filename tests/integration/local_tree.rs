//! Local base-directory walking behavior

use super::test_utils::root_name;
use std::fs;
use tempfile::TempDir;
use treesync::tree::builder::LocalTreeBuilder;
use treesync::tree::walker::WalkerConfig;

/// The default ignore patterns keep the snapshot store and VCS metadata
/// out of the destination tree.
#[test]
fn test_default_ignores_exclude_snapshot_and_git() {
    let temp = TempDir::new().unwrap();
    let base = temp.path().to_path_buf();
    let root = root_name(&base);

    fs::create_dir(base.join(".snapshot")).unwrap();
    fs::write(base.join(".snapshot").join("old.json"), "{}").unwrap();
    fs::create_dir(base.join(".git")).unwrap();
    fs::write(base.join("kept.txt"), "x").unwrap();

    let tree = LocalTreeBuilder::new(base).build().unwrap();

    assert!(tree.find_by_name(&format!("{}/.snapshot", root)).is_none());
    assert!(tree.find_by_name(&format!("{}/.git", root)).is_none());
    assert!(tree.find_by_name(&format!("{}/kept.txt", root)).is_some());
}

/// A caller-supplied walker config replaces the defaults.
#[test]
fn test_custom_ignore_patterns() {
    let temp = TempDir::new().unwrap();
    let base = temp.path().to_path_buf();
    let root = root_name(&base);

    fs::create_dir(base.join("node_modules")).unwrap();
    fs::write(base.join("node_modules").join("dep.js"), "x").unwrap();
    fs::write(base.join("kept.txt"), "x").unwrap();

    let config = WalkerConfig {
        ignore_patterns: vec!["node_modules".to_string()],
        ..WalkerConfig::default()
    };
    let tree = LocalTreeBuilder::new(base)
        .with_walker_config(config)
        .build()
        .unwrap();

    assert!(tree
        .find_by_name(&format!("{}/node_modules", root))
        .is_none());
    assert!(tree.find_by_name(&format!("{}/kept.txt", root)).is_some());
}

/// Nested structure round-trips into full-path identity keys.
#[test]
fn test_nested_directories_become_full_paths() {
    let temp = TempDir::new().unwrap();
    let base = temp.path().to_path_buf();
    let root = root_name(&base);

    fs::create_dir_all(base.join("a").join("b")).unwrap();
    fs::write(base.join("a").join("b").join("c.txt"), "x").unwrap();

    let tree = LocalTreeBuilder::new(base).build().unwrap();

    let leaf = tree
        .find_by_name(&format!("{}/a/b/c.txt", root))
        .expect("nested leaf present");
    let parent = tree.node(leaf).parent().unwrap();
    assert_eq!(tree.node(parent).name(), format!("{}/a/b", root));
}
