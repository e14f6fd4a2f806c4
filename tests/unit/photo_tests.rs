/// File store path handling
use habit_journal::PhotoStore;
use tempfile::TempDir;

#[test]
fn test_resolve_paths() {
    let dir = TempDir::new().unwrap();
    let store = PhotoStore::new(dir.path());

    assert_eq!(
        store.resolve("uploads/1234_run.jpg"),
        Some(dir.path().join("uploads/1234_run.jpg"))
    );
    assert_eq!(store.resolve(""), None);
    assert_eq!(store.resolve("../outside.jpg"), None);
}

#[test]
fn test_remove_is_best_effort() {
    let dir = TempDir::new().unwrap();
    let store = PhotoStore::new(dir.path());
    std::fs::write(dir.path().join("run.jpg"), b"jpeg").unwrap();

    assert!(store.remove("run.jpg"));
    assert!(!dir.path().join("run.jpg").exists());
    // Missing file: no error, nothing removed
    assert!(!store.remove("run.jpg"));
}
