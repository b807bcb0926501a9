//! End-to-end tests for indexing a project tree and querying it.

use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::thread;
use tempfile::TempDir;
use wsindex::config::IndexConfig;
use wsindex::index::{IndexBuilder, IndexStore};
use wsindex::query::search;
use wsindex::session::Workspace;

/// Create a small project with text, binary-looking and ignored content
fn create_fixture_dir() -> TempDir {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let root = dir.path();

    fs::write(root.join("a.txt"), "Hello World\nhello again").unwrap();
    fs::write(root.join("b.txt"), "nothing here").unwrap();
    fs::write(root.join("photo.png"), "hello from a fake image").unwrap();

    fs::create_dir_all(root.join("node_modules/left-pad")).unwrap();
    fs::write(root.join("node_modules/left-pad/index.js"), "// hello").unwrap();

    fs::create_dir_all(root.join(".git")).unwrap();
    fs::write(root.join(".git/HEAD"), "ref: refs/heads/hello").unwrap();

    dir
}

fn indexed_paths(store: &IndexStore) -> HashSet<String> {
    store
        .snapshot()
        .iter()
        .map(|f| f.display_name().to_string())
        .collect()
}

fn build(root: &Path, config: &IndexConfig) -> Arc<IndexStore> {
    let store = Arc::new(IndexStore::new());
    let builder = IndexBuilder::new(Arc::clone(&store), config).unwrap();
    builder.spawn(root.to_path_buf()).unwrap().join().unwrap();
    store
}

#[test]
fn test_two_file_project() {
    let dir = create_fixture_dir();
    let store = build(dir.path(), &IndexConfig::default());

    let results = search("hello", &store.snapshot(), 100);
    let summary: Vec<(String, usize, String)> = results
        .iter()
        .map(|r| (r.file_display_name.clone(), r.line_number, r.line_text.clone()))
        .collect();

    assert_eq!(
        summary,
        vec![
            ("a.txt".to_string(), 1, "Hello World".to_string()),
            ("a.txt".to_string(), 2, "hello again".to_string()),
        ]
    );
    assert!(results.iter().all(|r| r.file_path.is_absolute()));
}

#[test]
fn test_exclusions() {
    let dir = create_fixture_dir();
    let store = build(dir.path(), &IndexConfig::default());

    let names = indexed_paths(&store);
    assert_eq!(names, HashSet::from(["a.txt".to_string(), "b.txt".to_string()]));

    for file in store.snapshot().iter() {
        let path = file.path().to_string_lossy();
        assert!(!path.contains("node_modules"));
        assert!(!path.contains(".git"));
    }
}

#[test]
fn test_oversized_file_excluded() {
    let dir = TempDir::new().unwrap();
    let line = "searchable text line\n";
    let body = |size: usize| line.repeat(size / line.len() + 1)[..size].to_string();
    fs::write(dir.path().join("big.txt"), body(600_000)).unwrap();
    fs::write(dir.path().join("small.txt"), body(400_000)).unwrap();

    let store = build(dir.path(), &IndexConfig::default());
    assert_eq!(indexed_paths(&store), HashSet::from(["small.txt".to_string()]));
}

#[test]
fn test_case_insensitive_results_identical() {
    let dir = create_fixture_dir();
    let store = build(dir.path(), &IndexConfig::default());
    let snapshot = store.snapshot();

    assert_eq!(search("HELLO", &snapshot, 100), search("hello", &snapshot, 100));
    assert_eq!(search("WoRlD", &snapshot, 100).len(), 1);
}

#[test]
fn test_result_cap_across_many_files() {
    let dir = TempDir::new().unwrap();
    for i in 0..30 {
        let content: String = (0..10).map(|j| format!("token {} {}\n", i, j)).collect();
        fs::write(dir.path().join(format!("f{:02}.txt", i)), content).unwrap();
    }

    let store = build(dir.path(), &IndexConfig::default());
    assert_eq!(store.len(), 30);

    let snapshot = store.snapshot();
    assert_eq!(search("token", &snapshot, 100).len(), 100);
    assert_eq!(search("token", &snapshot, 7).len(), 7);
    assert_eq!(search("token", &snapshot, 1000).len(), 300);
}

#[test]
fn test_project_switch_mid_build() {
    let first = TempDir::new().unwrap();
    for i in 0..40 {
        let sub = first.path().join(format!("dir{}", i));
        fs::create_dir(&sub).unwrap();
        for j in 0..20 {
            fs::write(sub.join(format!("f{}.txt", j)), "first-project marker").unwrap();
        }
    }
    let second = TempDir::new().unwrap();
    fs::write(second.path().join("only.txt"), "second-project marker").unwrap();

    let mut ws = Workspace::new(&IndexConfig::default()).unwrap();
    ws.open(first.path()).unwrap();
    ws.open(second.path()).unwrap();
    ws.wait();

    // Give any detached builder from the first project time to run into its checks
    thread::sleep(std::time::Duration::from_millis(100));

    let snapshot = ws.snapshot();
    assert_eq!(snapshot.len(), 1);
    assert!(search("first-project", &snapshot, 100).is_empty());
    assert_eq!(search("second-project", &snapshot, 100).len(), 1);
}

#[test]
fn test_queries_during_build_only_grow() {
    let dir = TempDir::new().unwrap();
    for i in 0..300 {
        fs::write(dir.path().join(format!("f{}.txt", i)), "needle").unwrap();
    }

    let config = IndexConfig {
        batch_size: 10,
        ..IndexConfig::default()
    };
    let store = Arc::new(IndexStore::new());
    let builder = IndexBuilder::new(Arc::clone(&store), &config).unwrap();
    let handle = builder.spawn(dir.path().to_path_buf()).unwrap();

    let mut last = 0;
    while store.is_indexing() {
        let snapshot = store.snapshot();
        assert!(snapshot.len() >= last);
        assert_eq!(snapshot.len() % 10, 0);
        last = snapshot.len();
    }
    handle.join().unwrap();

    assert_eq!(store.len(), 300);
    assert_eq!(search("needle", &store.snapshot(), 1000).len(), 300);
}

#[test]
fn test_config_limits_flow_through() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("tiny.txt"), "hi").unwrap();
    fs::write(dir.path().join("larger.txt"), "hello there").unwrap();

    let config = IndexConfig {
        max_file_size: 5,
        ..IndexConfig::default()
    };
    let store = build(dir.path(), &config);
    assert_eq!(indexed_paths(&store), HashSet::from(["tiny.txt".to_string()]));
}
