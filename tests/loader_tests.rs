//! Integration tests for import resolution and merging.
//!
//! Each test writes a small fixture tree of XML files into a TempDir and
//! loads it through the public `ConfigLoader` API. Cache entries are kept
//! inside the TempDir so tests never touch the working directory.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use xmlconf::config::ConfigLoader;
use xmlconf::error::ConfigError;

/// Write one fixture file and return its path.
fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).expect("failed to write fixture");
    path
}

/// Loader with its cache confined to the fixture directory.
fn loader(root: &Path, dir: &TempDir) -> ConfigLoader {
    ConfigLoader::with_cache_dir(root, dir.path().join("cache")).expect("failed to create loader")
}

fn cache_files(dir: &TempDir) -> Vec<PathBuf> {
    let cache_dir = dir.path().join("cache");
    if !cache_dir.exists() {
        return Vec::new();
    }
    fs::read_dir(cache_dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect()
}

#[test]
fn looks_up_params_inside_groups() {
    let temp = TempDir::new().unwrap();
    let root = write_file(
        temp.path(),
        "config.xml",
        r#"<Config>
            <Group name="thumbnail">
                <Param name="width" value="800"/>
                <Param name="height" value="600"/>
            </Group>
            <Param name="mode" value="full"/>
        </Config>"#,
    );

    let tree = loader(&root, &temp).load().unwrap();
    assert_eq!(tree.get_str("thumbnail/width"), Some("800"));
    assert_eq!(tree.get_str("mode"), Some("full"));
    assert!(tree.get("thumbnail/nonexistent").is_none());
    assert!(tree.get("nonexistent/width").is_none());
}

#[test]
fn array_params_aggregate_in_document_order() {
    let temp = TempDir::new().unwrap();
    let root = write_file(
        temp.path(),
        "config.xml",
        r#"<Config>
            <Param name="tag[]" value="a"/>
            <Param name="tag[]" value="b"/>
            <Param name="tag[]" value="c"/>
        </Config>"#,
    );

    let tree = loader(&root, &temp).load().unwrap();
    assert_eq!(
        tree.get_list("tag"),
        Some(&["a".to_string(), "b".to_string(), "c".to_string()][..])
    );
}

#[test]
fn cdata_inner_text_overrides_value_attribute() {
    let temp = TempDir::new().unwrap();
    let root = write_file(
        temp.path(),
        "config.xml",
        r#"<Config><Param name="longtext" value="ignored"><![CDATA[Hello <b>World</b>]]></Param></Config>"#,
    );

    let tree = loader(&root, &temp).load().unwrap();
    assert_eq!(tree.get_str("longtext"), Some("Hello <b>World</b>"));
}

#[test]
fn imported_file_wins_over_importer() {
    let temp = TempDir::new().unwrap();
    write_file(
        temp.path(),
        "imported.xml",
        r#"<Config><Param name="mode" value="preview"/></Config>"#,
    );
    let root = write_file(
        temp.path(),
        "config.xml",
        r#"<Config>
            <Import src="imported.xml"/>
            <Param name="mode" value="full"/>
        </Config>"#,
    );

    let tree = loader(&root, &temp).load().unwrap();
    assert_eq!(tree.get_str("mode"), Some("preview"));
}

#[test]
fn imports_resolve_breadth_first() {
    let temp = TempDir::new().unwrap();
    // Root imports a then b; a imports c. Breadth-first processing order is
    // root, a, b, c - so c's value lands last and wins even over b's.
    write_file(
        temp.path(),
        "a.xml",
        r#"<Config>
            <Import src="c.xml"/>
            <Param name="who" value="a"/>
        </Config>"#,
    );
    write_file(
        temp.path(),
        "b.xml",
        r#"<Config><Param name="who" value="b"/></Config>"#,
    );
    write_file(
        temp.path(),
        "c.xml",
        r#"<Config><Param name="who" value="c"/></Config>"#,
    );
    let root = write_file(
        temp.path(),
        "config.xml",
        r#"<Config>
            <Import src="a.xml"/>
            <Import src="b.xml"/>
            <Param name="who" value="root"/>
        </Config>"#,
    );

    let tree = loader(&root, &temp).load().unwrap();
    assert_eq!(tree.get_str("who"), Some("c"));
}

#[test]
fn import_paths_resolve_relative_to_importing_file() {
    let temp = TempDir::new().unwrap();
    fs::create_dir(temp.path().join("sub")).unwrap();
    write_file(
        &temp.path().join("sub"),
        "inner.xml",
        r#"<Config><Param name="from" value="inner"/></Config>"#,
    );
    write_file(
        &temp.path().join("sub"),
        "middle.xml",
        r#"<Config><Import src="inner.xml"/></Config>"#,
    );
    let root = write_file(
        temp.path(),
        "config.xml",
        r#"<Config><Import src="sub/middle.xml"/></Config>"#,
    );

    let tree = loader(&root, &temp).load().unwrap();
    assert_eq!(tree.get_str("from"), Some("inner"));
}

#[test]
fn later_group_replaces_earlier_wholesale() {
    let temp = TempDir::new().unwrap();
    write_file(
        temp.path(),
        "imported.xml",
        r#"<Config>
            <Group name="g"><Param name="b" value="2"/></Group>
        </Config>"#,
    );
    let root = write_file(
        temp.path(),
        "config.xml",
        r#"<Config>
            <Import src="imported.xml"/>
            <Group name="g"><Param name="a" value="1"/></Group>
        </Config>"#,
    );

    let tree = loader(&root, &temp).load().unwrap();
    assert!(tree.get("g/a").is_none(), "earlier group content must be lost");
    assert_eq!(tree.get_str("g/b"), Some("2"));
}

#[test]
fn nested_groups_reachable_by_path() {
    let temp = TempDir::new().unwrap();
    let root = write_file(
        temp.path(),
        "config.xml",
        r#"<Config>
            <Group name="group">
                <Group name="innergroup">
                    <Param name="value1" value="x"/>
                    <Param name="value2" value="y"/>
                </Group>
            </Group>
        </Config>"#,
    );

    let tree = loader(&root, &temp).load().unwrap();
    assert_eq!(tree.get_str("group/innergroup/value1"), Some("x"));
    assert_eq!(tree.get_str("group/innergroup/value2"), Some("y"));
}

#[test]
fn missing_root_fails_without_cache_writes() {
    let temp = TempDir::new().unwrap();
    let err =
        ConfigLoader::with_cache_dir(temp.path().join("absent.xml"), temp.path().join("cache"))
            .unwrap_err();

    assert!(matches!(err, ConfigError::FileNotFound { .. }));
    assert!(cache_files(&temp).is_empty());
}

#[test]
fn missing_import_aborts_the_load() {
    let temp = TempDir::new().unwrap();
    let root = write_file(
        temp.path(),
        "config.xml",
        r#"<Config><Import src="absent.xml"/></Config>"#,
    );

    let err = loader(&root, &temp).load().unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
    assert!(cache_files(&temp).is_empty(), "no partial tree may be cached");
}

#[test]
fn malformed_import_aborts_the_load() {
    let temp = TempDir::new().unwrap();
    write_file(temp.path(), "broken.xml", "<Config><Group></Config>");
    let root = write_file(
        temp.path(),
        "config.xml",
        r#"<Config><Import src="broken.xml"/></Config>"#,
    );

    let err = loader(&root, &temp).load().unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
}

#[test]
fn import_cycle_hits_the_document_limit() {
    let temp = TempDir::new().unwrap();
    write_file(
        temp.path(),
        "b.xml",
        r#"<Config><Import src="config.xml"/></Config>"#,
    );
    let root = write_file(
        temp.path(),
        "config.xml",
        r#"<Config><Import src="b.xml"/></Config>"#,
    );

    let err = loader(&root, &temp).load().unwrap_err();
    assert!(matches!(err, ConfigError::ImportLimit { .. }));
}

#[test]
fn top_level_entries_sorted_by_value_descending() {
    let temp = TempDir::new().unwrap();
    let root = write_file(
        temp.path(),
        "config.xml",
        r#"<Config>
            <Param name="alpha" value="aaa"/>
            <Group name="grp"><Param name="x" value="1"/></Group>
            <Param name="zeta" value="zzz"/>
            <Param name="list[]" value="item"/>
        </Config>"#,
    );

    let tree = loader(&root, &temp).load().unwrap();
    let keys: Vec<_> = tree.iter().map(|(k, _)| k).collect();
    // Groups above lists above scalars; scalars descending by content.
    assert_eq!(keys, ["grp", "list", "zeta", "alpha"]);
}

#[test]
fn second_load_hits_cache_and_matches_first() {
    let temp = TempDir::new().unwrap();
    write_file(
        temp.path(),
        "imported.xml",
        r#"<Config><Param name="mode" value="preview"/></Config>"#,
    );
    let root = write_file(
        temp.path(),
        "config.xml",
        r#"<Config>
            <Import src="imported.xml"/>
            <Param name="mode" value="full"/>
            <Param name="tag[]" value="a"/>
            <Param name="tag[]" value="b"/>
            <Group name="thumbnail"><Param name="width" value="800"/></Group>
        </Config>"#,
    );

    let first = loader(&root, &temp).load().unwrap();
    assert_eq!(cache_files(&temp).len(), 1);

    let second = loader(&root, &temp).load().unwrap();
    assert_eq!(second, first);
}

#[test]
fn stale_source_still_served_from_cache() {
    let temp = TempDir::new().unwrap();
    let root = write_file(
        temp.path(),
        "config.xml",
        r#"<Config><Param name="mode" value="before"/></Config>"#,
    );

    let first = loader(&root, &temp).load().unwrap();
    assert_eq!(first.get_str("mode"), Some("before"));

    // Edit the source; the cache entry still exists, so the old tree keeps
    // being served until the entry is removed.
    write_file(
        temp.path(),
        "config.xml",
        r#"<Config><Param name="mode" value="after"/></Config>"#,
    );
    let stale = loader(&root, &temp).load().unwrap();
    assert_eq!(stale.get_str("mode"), Some("before"));

    // Removing the entry picks up the edit.
    let l = loader(&root, &temp);
    l.cache().remove().unwrap();
    let fresh = l.load().unwrap();
    assert_eq!(fresh.get_str("mode"), Some("after"));
}

#[test]
fn corrupt_cache_entry_recovers_by_rebuilding() {
    let temp = TempDir::new().unwrap();
    let root = write_file(
        temp.path(),
        "config.xml",
        r#"<Config><Param name="mode" value="full"/></Config>"#,
    );

    let l = loader(&root, &temp);
    l.load().unwrap();
    fs::write(l.cache().cache_path(), "garbage }{").unwrap();

    let tree = l.load().unwrap();
    assert_eq!(tree.get_str("mode"), Some("full"));
    // The rebuilt tree replaced the corrupt blob.
    assert_eq!(l.cache().read().unwrap(), tree);
}

#[test]
fn disabled_cache_neither_reads_nor_writes() {
    let temp = TempDir::new().unwrap();
    let root = write_file(
        temp.path(),
        "config.xml",
        r#"<Config><Param name="mode" value="full"/></Config>"#,
    );

    let tree = loader(&root, &temp).cache_enabled(false).load().unwrap();
    assert_eq!(tree.get_str("mode"), Some("full"));
    assert!(cache_files(&temp).is_empty());
}
