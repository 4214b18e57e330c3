//! Merge step and the legacy top-level reordering pass.
//!
//! Merging is a single-level overwrite: every key produced by a document
//! replaces an existing key of the same name wholesale. Groups are NOT
//! deep-merged: a later group value discards the earlier one entirely.
//! Combined with breadth-first import processing this gives imported files
//! precedence over the files that import them.

use super::types::{ConfigValue, Group};

/// Merge one document's parsed top-level entries into `result`.
///
/// Keys already present are overwritten in place (keeping their original
/// position); new keys are appended in document order.
pub fn merge_document(result: &mut Group, parsed: Group) {
    for (key, value) in parsed {
        result.insert(key, value);
    }
}

/// Stable-sort top-level entries by value, descending.
///
/// Legacy reordering of the finished mapping, kept so iteration and dump
/// order stay compatible. Lookups are key-based and unaffected; see
/// `ConfigValue::legacy_cmp` for the order.
pub fn sort_by_value_desc(group: &mut Group) {
    group.sort_by(|_, a, _, b| b.legacy_cmp(a));
}
