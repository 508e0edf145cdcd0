use pretty_assertions::assert_eq;
use std::path::PathBuf;
use std::sync::Arc;

use ld_catalog::models::{WishForm, WishStatus};
use ld_catalog::storage::{KeyValueStore, MemoryStore, SqliteStore};
use ld_catalog::wishing_pool::{example_wishes, WishingPool, DEFAULT_STORAGE_KEY};

fn scratch_db(name: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("ld-catalog-{}-{}.db", name, std::process::id()));
    let _ = std::fs::remove_file(&path);
    path
}

#[test]
fn added_wish_survives_a_new_session() {
    let db = scratch_db("session");

    let added = {
        let mut pool = WishingPool::open(SqliteStore::open(&db).unwrap()).unwrap();
        pool.add(WishForm::new("Mei", "Prompt engineering workshop")).unwrap()
    };

    let pool = WishingPool::open(SqliteStore::open(&db).unwrap()).unwrap();
    assert_eq!(pool.items()[0], added);
    assert_eq!(pool.items().len(), example_wishes().len() + 1);

    let _ = std::fs::remove_file(&db);
}

#[test]
fn set_status_on_unknown_id_changes_nothing() {
    let mut pool = WishingPool::open(MemoryStore::new()).unwrap();
    let before = pool.items().to_vec();

    pool.set_status("no-such-wish", WishStatus::Rejected).unwrap();
    assert_eq!(pool.items(), before.as_slice());
}

#[test]
fn set_status_persists() {
    let store = Arc::new(MemoryStore::new());
    let mut pool = WishingPool::open(Arc::clone(&store)).unwrap();
    pool.set_status("1", WishStatus::Rejected).unwrap();

    let reopened = WishingPool::open(store).unwrap();
    assert_eq!(reopened.get("1").map(|w| w.status), Some(WishStatus::Rejected));
}

#[test]
fn remove_is_idempotent() {
    let store = Arc::new(MemoryStore::new());
    let mut pool = WishingPool::open(Arc::clone(&store)).unwrap();

    pool.remove("2").unwrap();
    pool.remove("2").unwrap();
    assert_eq!(pool.items().len(), 1);
    assert!(pool.get("2").is_none());

    let reopened = WishingPool::open(store).unwrap();
    assert_eq!(reopened.items().len(), 1);
}

#[test]
fn corrupt_blob_resets_without_error() {
    let store = MemoryStore::new();
    store.set(DEFAULT_STORAGE_KEY, r#"[{"id": 1}]"#).unwrap();

    let mut pool = WishingPool::open(&store).unwrap();
    assert!(pool.items().is_empty());

    // The next write replaces the corrupt document.
    let added = pool.add(WishForm::new("Ann", "Data literacy course")).unwrap();
    assert_eq!(added.sn, "001");
    assert!(store.get(DEFAULT_STORAGE_KEY).unwrap().unwrap().contains("Data literacy course"));
}

#[test]
fn pools_under_different_keys_are_independent() {
    let store = Arc::new(MemoryStore::new());
    let mut team_a = WishingPool::open_with_key(Arc::clone(&store), "team_a").unwrap();
    let team_b = WishingPool::open_with_key(Arc::clone(&store), "team_b").unwrap();

    team_a.remove("1").unwrap();
    assert_eq!(team_b.items().len(), 2);
    assert_eq!(WishingPool::open_with_key(store, "team_a").unwrap().items().len(), 1);
}
