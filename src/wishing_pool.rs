use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::error::{StoreError, WishError};
use crate::models::{WishForm, WishItem, WishStatus};
use crate::storage::KeyValueStore;

pub const DEFAULT_STORAGE_KEY: &str = "ld_wishing_pool_data";

/// Records written on first use so the pool is never empty on a fresh install.
pub fn example_wishes() -> Vec<WishItem> {
    vec![
        WishItem {
            id: "1".to_string(),
            sn: "001".to_string(),
            requester: "John Doe".to_string(),
            wish: "希望有更多的AI学习资源".to_string(),
            status: WishStatus::Pending,
            created_at: "2024-01-15".to_string(),
        },
        WishItem {
            id: "2".to_string(),
            sn: "002".to_string(),
            requester: "Jane Smith".to_string(),
            wish: "需要更多的技术培训课程".to_string(),
            status: WishStatus::Approved,
            created_at: "2024-01-16".to_string(),
        },
    ]
}

/// Wish list persisted as one JSON document under a single key.
///
/// Every mutation rewrites the whole document. There is no locking across
/// processes: two writers sharing a store simply overwrite each other.
pub struct WishingPool<S: KeyValueStore> {
    store: S,
    key: String,
    items: Vec<WishItem>,
}

impl<S: KeyValueStore> WishingPool<S> {
    /// Opens the pool under the default key and loads it.
    pub fn open(store: S) -> Result<Self, StoreError> {
        Self::open_with_key(store, DEFAULT_STORAGE_KEY)
    }

    pub fn open_with_key(store: S, key: impl Into<String>) -> Result<Self, StoreError> {
        let mut pool = Self {
            store,
            key: key.into(),
            items: Vec::new(),
        };
        pool.load()?;
        Ok(pool)
    }

    /// Re-reads the stored document.
    ///
    /// A missing document is seeded with [`example_wishes`]. A document that
    /// fails to parse resets the in-memory list to empty; only a storage
    /// failure is returned as an error.
    pub fn load(&mut self) -> Result<(), StoreError> {
        match self.store.get(&self.key)? {
            Some(raw) => match serde_json::from_str::<Vec<WishItem>>(&raw) {
                Ok(items) => {
                    info!("Loaded {} wishes", items.len());
                    self.items = items;
                }
                Err(e) => {
                    warn!("Stored wishing pool is corrupt, starting empty: {}", e);
                    self.items = Vec::new();
                }
            },
            None => {
                info!("No stored wishing pool, seeding example wishes");
                self.commit(example_wishes())?;
            }
        }
        Ok(())
    }

    pub fn items(&self) -> &[WishItem] {
        &self.items
    }

    pub fn get(&self, id: &str) -> Option<&WishItem> {
        self.items.iter().find(|w| w.id == id)
    }

    pub fn add(&mut self, form: WishForm) -> Result<WishItem, WishError> {
        self.add_at(form, Utc::now())
    }

    /// Adds a pending wish at the front of the list, stamped with `now`.
    pub fn add_at(&mut self, form: WishForm, now: DateTime<Utc>) -> Result<WishItem, WishError> {
        form.validate()?;

        let requester = form.requester.trim().to_string();
        let wish = form.wish.trim().to_string();

        let item = WishItem {
            id: wish_id(&requester, &wish, now),
            sn: format!("{:03}", self.items.len() + 1),
            requester,
            wish,
            status: WishStatus::Pending,
            created_at: now.format("%Y-%m-%d").to_string(),
        };

        let mut next = Vec::with_capacity(self.items.len() + 1);
        next.push(item.clone());
        next.extend(self.items.iter().cloned());
        self.commit(next)?;

        info!("Added wish {} from {}", item.sn, item.requester);
        Ok(item)
    }

    /// Unknown ids leave the list untouched.
    pub fn set_status(&mut self, id: &str, status: WishStatus) -> Result<(), StoreError> {
        let mut next = self.items.clone();
        if let Some(item) = next.iter_mut().find(|w| w.id == id) {
            item.status = status;
        }
        self.commit(next)
    }

    /// Advances the wish to its next status and returns it.
    pub fn cycle_status(&mut self, id: &str) -> Result<Option<WishStatus>, StoreError> {
        let next = self.get(id).map(|w| w.status.next());
        if let Some(status) = next {
            self.set_status(id, status)?;
        }
        Ok(next)
    }

    pub fn remove(&mut self, id: &str) -> Result<(), StoreError> {
        let next = self.items.iter().filter(|w| w.id != id).cloned().collect();
        self.commit(next)
    }

    /// Writes `items` to the store and adopts them only once the write succeeds.
    fn commit(&mut self, items: Vec<WishItem>) -> Result<(), StoreError> {
        let json = serde_json::to_string(&items)?;
        self.store.set(&self.key, &json)?;
        self.items = items;
        Ok(())
    }
}

// Not a security boundary; only needs to be unlikely to repeat.
fn wish_id(requester: &str, wish: &str, now: DateTime<Utc>) -> String {
    let digest = md5::compute(format!("{}{}{}", requester, wish, now.timestamp_millis()));
    format!("{:x}", digest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicBool, Ordering};

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    #[test]
    fn fresh_store_is_seeded_and_persisted() {
        let store = MemoryStore::new();
        let pool = WishingPool::open(&store).unwrap();
        assert_eq!(pool.items(), example_wishes().as_slice());
        assert!(store.get(DEFAULT_STORAGE_KEY).unwrap().is_some());
    }

    #[test]
    fn corrupt_document_resets_to_empty() {
        let store = MemoryStore::new();
        store.set(DEFAULT_STORAGE_KEY, "{not json").unwrap();
        let pool = WishingPool::open(&store).unwrap();
        assert!(pool.items().is_empty());
    }

    #[test]
    fn add_prepends_with_next_serial() {
        let mut pool = WishingPool::open(MemoryStore::new()).unwrap();
        let added = pool
            .add_at(WishForm::new("  Ann   Lee ", " More Rust training "), at(0))
            .unwrap();

        assert_eq!(added.sn, "003");
        assert_eq!(added.requester, "Ann   Lee");
        assert_eq!(added.wish, "More Rust training");
        assert_eq!(added.status, WishStatus::Pending);
        assert_eq!(added.created_at, "2023-11-14");
        assert_eq!(pool.items()[0], added);
        assert_eq!(pool.items().len(), 3);
    }

    #[test]
    fn ids_differ_across_time() {
        let mut pool = WishingPool::open(MemoryStore::new()).unwrap();
        let a = pool.add_at(WishForm::new("Ann", "Same wish"), at(0)).unwrap();
        let b = pool.add_at(WishForm::new("Ann", "Same wish"), at(1)).unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn blank_submission_is_not_stored() {
        let mut pool = WishingPool::open(MemoryStore::new()).unwrap();
        let err = pool.add(WishForm::new("", "wish")).unwrap_err();
        assert!(matches!(err, WishError::BlankField("requester")));
        assert_eq!(pool.items().len(), 2);
    }

    #[test]
    fn cycle_walks_through_statuses() {
        let mut pool = WishingPool::open(MemoryStore::new()).unwrap();
        assert_eq!(pool.cycle_status("1").unwrap(), Some(WishStatus::Approved));
        assert_eq!(pool.cycle_status("1").unwrap(), Some(WishStatus::Rejected));
        assert_eq!(pool.cycle_status("1").unwrap(), Some(WishStatus::Pending));
        assert_eq!(pool.cycle_status("missing").unwrap(), None);
    }

    /// Accepts reads; rejects every write once `fail` is set.
    struct FlakyStore {
        inner: MemoryStore,
        fail: AtomicBool,
    }

    impl KeyValueStore for FlakyStore {
        fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(StoreError::Poisoned);
            }
            self.inner.set(key, value)
        }
    }

    fn stored(store: &FlakyStore) -> Vec<WishItem> {
        serde_json::from_str(&store.inner.get(DEFAULT_STORAGE_KEY).unwrap().unwrap()).unwrap()
    }

    #[test]
    fn failed_write_leaves_memory_matching_storage() {
        let store = FlakyStore {
            inner: MemoryStore::new(),
            fail: AtomicBool::new(false),
        };
        let mut pool = WishingPool::open(&store).unwrap();
        store.fail.store(true, Ordering::SeqCst);

        assert!(pool.add(WishForm::new("Ann", "More labs")).is_err());
        assert!(pool.remove("1").is_err());
        assert!(pool.set_status("2", WishStatus::Rejected).is_err());
        assert!(pool.cycle_status("1").is_err());

        assert_eq!(pool.items(), stored(&store).as_slice());
        assert_eq!(pool.items(), example_wishes().as_slice());
    }
}
