use closet_core::db::{open_db, open_db_in_memory};
use closet_core::{KvError, KvRepository, MemoryKvRepository, SqliteKvRepository};
use rusqlite::Connection;

#[test]
fn sqlite_get_returns_none_for_absent_key() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteKvRepository::try_new(&mut conn).unwrap();

    assert_eq!(repo.get("missing").unwrap(), None);
}

#[test]
fn sqlite_set_overwrites_and_remove_is_idempotent() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteKvRepository::try_new(&mut conn).unwrap();

    repo.set("items", "[1]").unwrap();
    repo.set("items", "[1,2]").unwrap();
    assert_eq!(repo.get("items").unwrap().as_deref(), Some("[1,2]"));

    repo.remove("items").unwrap();
    repo.remove("items").unwrap();
    assert_eq!(repo.get("items").unwrap(), None);
}

#[test]
fn sqlite_set_many_is_all_or_nothing() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteKvRepository::try_new(&mut conn).unwrap();
    repo.set("a", "old-a").unwrap();

    // The empty key violates the table CHECK and must roll back the batch.
    let err = repo.set_many(&[("a", "new-a"), ("", "bad")]).unwrap_err();
    assert!(matches!(err, KvError::Db(_)));
    assert_eq!(repo.get("a").unwrap().as_deref(), Some("old-a"));

    repo.set_many(&[("a", "new-a"), ("b", "new-b")]).unwrap();
    assert_eq!(repo.get("a").unwrap().as_deref(), Some("new-a"));
    assert_eq!(repo.get("b").unwrap().as_deref(), Some("new-b"));
}

#[test]
fn sqlite_values_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("closet.db");

    {
        let mut conn = open_db(&path).unwrap();
        let mut repo = SqliteKvRepository::try_new(&mut conn).unwrap();
        repo.set_many(&[("items", "[]"), ("wears", "[]")]).unwrap();
        repo.remove_many(&["wears"]).unwrap();
    }

    let mut conn = open_db(&path).unwrap();
    let repo = SqliteKvRepository::try_new(&mut conn).unwrap();
    assert_eq!(repo.get("items").unwrap().as_deref(), Some("[]"));
    assert_eq!(repo.get("wears").unwrap(), None);
}

#[test]
fn sqlite_repo_requires_migrated_connection() {
    let mut conn = Connection::open_in_memory().unwrap();
    let err = SqliteKvRepository::try_new(&mut conn).err().unwrap();
    assert!(matches!(err, KvError::Unavailable(_)));
}

#[test]
fn memory_repo_follows_same_contract() {
    let mut repo = MemoryKvRepository::new();
    assert!(repo.is_empty());
    assert_eq!(repo.get("items").unwrap(), None);

    repo.set_many(&[("items", "[]"), ("wears", "[]")]).unwrap();
    assert_eq!(repo.len(), 2);

    repo.remove_many(&["items", "wears", "never-set"]).unwrap();
    assert!(repo.is_empty());
}
