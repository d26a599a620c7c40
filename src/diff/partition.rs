//! Identity-based partitioning
//!
//! Groups a flat node list by full-path name. Pure; no side effects.

use std::collections::HashMap;

/// Anything keyed by a full-path identity string.
pub trait Identity {
    fn identity(&self) -> &str;
}

/// Partition items by identity
///
/// Encounter order is preserved within each group, and group keys appear in
/// first-encounter order, so downstream merging is deterministic.
pub fn partition<T: Identity>(items: Vec<T>) -> Vec<(String, Vec<T>)> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<(String, Vec<T>)> = Vec::new();

    for item in items {
        match index.get(item.identity()) {
            Some(&slot) => groups[slot].1.push(item),
            None => {
                let key = item.identity().to_string();
                index.insert(key.clone(), groups.len());
                groups.push((key, vec![item]));
            }
        }
    }
    groups
}
