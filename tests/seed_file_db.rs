use noteseed::storage::{SqliteStore, StoreOptions};
use noteseed::{build_and_persist, Error, SeedFixture, SeedIntegrityError};

#[test]
fn test_seed_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("noteseed.sqlite");

    let report = {
        let mut store = SqliteStore::open(&path, &StoreOptions::default()).unwrap();
        build_and_persist(&mut store, &SeedFixture::default()).unwrap()
    };

    let keep = StoreOptions { reset: false, ..StoreOptions::default() };
    let store = SqliteStore::open(&path, &keep).unwrap();
    let stats = store.stats().unwrap();
    assert_eq!(stats.users, 3);
    assert_eq!(stats.notes, 3);
    assert_eq!(stats.revisions, 3);
    assert_eq!(stats.edits, 3);
    assert_eq!(stats.authors, 3);
    assert_eq!(stats.aliases, 3);
    assert_eq!(stats.permissions, 0);
    assert_eq!(stats.history_entries, 1);

    let note = store.find_note_by_alias(&report.alias).unwrap().unwrap();
    assert_eq!(note.revisions().unwrap().len(), 1);
}

#[test]
fn test_reset_allows_reseeding() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("noteseed.sqlite");

    for _ in 0..2 {
        let mut store = SqliteStore::open(&path, &StoreOptions::default()).unwrap();
        let report = build_and_persist(&mut store, &SeedFixture::default()).unwrap();
        assert_eq!(report.username, "hardcoded");
        assert_eq!(store.stats().unwrap().users, 3);
    }
}

#[test]
fn test_schema_without_auto_alias_reports_alias_failure() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("noteseed.sqlite");
    let options = StoreOptions { auto_alias: false, ..StoreOptions::default() };

    let mut store = SqliteStore::open(&path, &options).unwrap();
    let err = build_and_persist(&mut store, &SeedFixture::default()).unwrap_err();

    assert!(matches!(err, Error::Integrity(SeedIntegrityError::MissingAlias)));
    assert!(err.to_string().contains("alias"));
}
