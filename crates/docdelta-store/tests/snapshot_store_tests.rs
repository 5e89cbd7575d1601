// Integration tests for the filesystem snapshot store
// Covers save/load, latest-N ordering, immutability and corrupt records

#![allow(clippy::unwrap_used, clippy::expect_used)]

use chrono::{TimeZone, Utc};
use docdelta_core::errors::ExErrorKind;
use docdelta_core::snapshot::{build_snapshot_at, ManifestEntry, Snapshot};
use docdelta_store::snapshot::{FsSnapshotStore, SnapshotStore};
use std::collections::BTreeMap;
use std::fs;
use std::sync::{Arc, Barrier};
use std::thread;
use tempfile::TempDir;

fn setup_store() -> (FsSnapshotStore, TempDir) {
    let dir = TempDir::new().expect("Failed to create temp snapshot directory");
    let store = FsSnapshotStore::new(dir.path().join("snapshots"));
    (store, dir)
}

fn snapshot_on(day: u32, pages: &[(&str, &str)]) -> Snapshot {
    let entries: Vec<ManifestEntry> = pages
        .iter()
        .map(|(path, content)| ManifestEntry::new(*path, *content, *path))
        .collect();
    build_snapshot_at(
        &entries,
        BTreeMap::new(),
        None,
        Utc.with_ymd_and_hms(2026, 2, day, 12, 0, 0).unwrap(),
    )
    .unwrap()
}

#[test]
fn test_save_then_load_round_trip() {
    let (store, _dir) = setup_store();
    let snapshot = snapshot_on(1, &[("a.md", "alpha"), ("b.md", "beta")]);

    store.save(&snapshot).unwrap();
    let loaded = store.load(snapshot.id()).unwrap();

    assert_eq!(loaded, snapshot);
}

#[test]
fn test_load_missing_is_not_found() {
    let (store, _dir) = setup_store();
    let err = store.load("2026-02-01T00:00:00.000000Z").unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::SnapshotNotFound);
}

#[test]
fn test_second_save_is_immutability_violation() {
    let (store, _dir) = setup_store();
    let original = snapshot_on(1, &[("a.md", "alpha")]);
    store.save(&original).unwrap();

    // same id, different manifest
    let rival = Snapshot::new(
        original.id(),
        original.generated_at(),
        BTreeMap::new(),
        BTreeMap::new(),
    );
    let err = store.save(&rival).unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::ImmutabilityViolation);
    assert_eq!(store.load(original.id()).unwrap(), original);
}

#[test]
fn test_load_latest_newest_first() {
    let (store, _dir) = setup_store();
    for day in [3, 1, 4, 2] {
        store.save(&snapshot_on(day, &[("a.md", "alpha")])).unwrap();
    }

    let latest = store.load_latest(3).unwrap();
    let days: Vec<String> = latest.iter().map(|s| s.id()[..10].to_string()).collect();
    assert_eq!(days, vec!["2026-02-04", "2026-02-03", "2026-02-02"]);

    assert_eq!(store.load_latest(10).unwrap().len(), 4);
    assert!(store.load_latest(0).unwrap().is_empty());
}

#[test]
fn test_load_latest_on_fresh_root_is_empty() {
    let (store, _dir) = setup_store();
    assert!(store.load_latest(5).unwrap().is_empty());
}

#[test]
fn test_corrupt_record_surfaces_as_malformed() {
    let (store, _dir) = setup_store();
    store.save(&snapshot_on(1, &[("a.md", "alpha")])).unwrap();
    fs::write(store.root().join("broken.json"), b"{\"snapshot_id\": ").unwrap();

    let err = store.load_latest(5).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::MalformedSnapshot);
    assert!(err.path().unwrap().ends_with("broken.json"));
}

#[test]
fn test_ids_differing_only_in_colon_and_dash_are_distinct() {
    let (store, _dir) = setup_store();
    let at = Utc.with_ymd_and_hms(2026, 2, 9, 12, 0, 0).unwrap();
    let colon = Snapshot::new("build:1", at, BTreeMap::new(), BTreeMap::new());
    let dash = Snapshot::new("build-1", at, BTreeMap::new(), BTreeMap::new());

    store.save(&colon).unwrap();
    assert_eq!(
        store.load("build-1").unwrap_err().kind(),
        ExErrorKind::SnapshotNotFound
    );
    store.save(&dash).unwrap();

    assert_eq!(store.load("build:1").unwrap().id(), "build:1");
    assert_eq!(store.load("build-1").unwrap().id(), "build-1");
    assert_eq!(store.load_latest(5).unwrap().len(), 2);
}

#[test]
fn test_ids_with_separators_rejected() {
    let (store, _dir) = setup_store();
    let sneaky = Snapshot::new("../escape", Utc::now(), BTreeMap::new(), BTreeMap::new());

    assert_eq!(
        store.save(&sneaky).unwrap_err().kind(),
        ExErrorKind::InvalidInput
    );
    assert_eq!(
        store.load("nested/id").unwrap_err().kind(),
        ExErrorKind::InvalidInput
    );
}

#[test]
fn test_concurrent_saves_first_writer_wins() {
    let (store, _dir) = setup_store();
    let store = Arc::new(store);
    let snapshot = Arc::new(snapshot_on(5, &[("a.md", "alpha"), ("b.md", "beta")]));
    let writers = 8;
    let barrier = Arc::new(Barrier::new(writers));

    let handles: Vec<_> = (0..writers)
        .map(|_| {
            let store = Arc::clone(&store);
            let snapshot = Arc::clone(&snapshot);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                store.save(&snapshot)
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let successes = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1);
    for err in results.iter().filter_map(|r| r.as_ref().err()) {
        assert_eq!(err.kind(), ExErrorKind::ImmutabilityViolation);
    }

    // exactly one complete record, no temp files
    let files: Vec<_> = fs::read_dir(store.root())
        .unwrap()
        .filter_map(|e| e.ok())
        .collect();
    assert_eq!(files.len(), 1);
    assert_eq!(store.load(snapshot.id()).unwrap(), *snapshot);
}

#[test]
fn test_stored_record_shape() {
    let (store, _dir) = setup_store();
    let snapshot = snapshot_on(6, &[("guides/a.md", "alpha")]);
    store.save(&snapshot).unwrap();

    let file = fs::read_dir(store.root())
        .unwrap()
        .filter_map(|e| e.ok())
        .next()
        .unwrap()
        .path();
    let value: serde_json::Value = serde_json::from_slice(&fs::read(file).unwrap()).unwrap();

    assert_eq!(value["snapshot_id"], snapshot.id());
    assert!(value["source_versions"].is_object());
    assert_eq!(value["page_manifest"]["guides/a.md"]["title"], "guides/a.md");
    assert!(value["page_manifest"]["guides/a.md"]["tags"].is_array());
}
