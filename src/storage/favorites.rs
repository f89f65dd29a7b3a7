use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::{
    error::{PixgenError, Result},
    models::FavoriteImage,
    storage::traits::KeyValueStore,
};

/// Key holding the JSON array of favorites.
pub const FAVORITES_KEY: &str = "downloadedImages";

/// Ordered, id-unique list of downloaded images, written through to a
/// [`KeyValueStore`] after every mutation.
///
/// The mutex covers both the in-memory list and the write, so concurrent
/// `add` calls are serialized and the durable copy always matches memory.
pub struct FavoritesStore {
    store: Arc<dyn KeyValueStore>,
    items: Mutex<Vec<FavoriteImage>>,
}

impl FavoritesStore {
    /// Load the persisted list. An absent or unreadable snapshot yields an
    /// empty store.
    pub fn restore(store: Arc<dyn KeyValueStore>) -> Self {
        let items = match store.read(FAVORITES_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<FavoriteImage>>(&raw) {
                Ok(items) => dedup_by_id(items),
                Err(e) => {
                    log::warn!("Discarding corrupt favorites snapshot: {}", e);
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                log::warn!("Could not read favorites, starting empty: {}", e);
                Vec::new()
            }
        };

        log::debug!("Restored {} favorites", items.len());
        Self {
            store,
            items: Mutex::new(items),
        }
    }

    /// Append `image` unless an entry with the same id exists.
    ///
    /// Returns `Ok(true)` when inserted. If persisting fails the insert is
    /// rolled back and the error returned.
    pub fn add(&self, image: FavoriteImage) -> Result<bool> {
        let mut items = self.lock()?;
        if items.iter().any(|existing| existing.id == image.id) {
            log::debug!("Favorite {} already saved", image.id);
            return Ok(false);
        }

        let id = image.id.clone();
        items.push(image);
        if let Err(e) = self.write_snapshot(&items) {
            items.pop();
            return Err(e);
        }

        log::info!("⭐ Saved favorite {} ({} total)", id, items.len());
        Ok(true)
    }

    pub fn list(&self) -> Vec<FavoriteImage> {
        self.lock().map(|items| items.clone()).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.lock().map(|items| items.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, id: &str) -> bool {
        self.lock()
            .map(|items| items.iter().any(|item| item.id == id))
            .unwrap_or(false)
    }

    pub fn persist(&self) -> Result<()> {
        let items = self.lock()?;
        self.write_snapshot(&items)
    }

    /// Drop every favorite and persist the empty list.
    pub fn clear(&self) -> Result<()> {
        let mut items = self.lock()?;
        let previous = std::mem::take(&mut *items);
        if let Err(e) = self.write_snapshot(&items) {
            *items = previous;
            return Err(e);
        }
        log::info!("Cleared {} favorites", previous.len());
        Ok(())
    }

    fn write_snapshot(&self, items: &[FavoriteImage]) -> Result<()> {
        let raw = serde_json::to_string(items)?;
        self.store.write(FAVORITES_KEY, &raw)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<FavoriteImage>>> {
        self.items
            .lock()
            .map_err(|_| PixgenError::StorageError("favorites lock poisoned".into()))
    }
}

fn dedup_by_id(items: Vec<FavoriteImage>) -> Vec<FavoriteImage> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.id.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn favorite(id: &str, prompt: &str) -> FavoriteImage {
        FavoriteImage {
            id: id.to_string(),
            url: format!("https://image.pollinations.ai/prompt/{}", prompt),
            prompt: prompt.to_string(),
            seed: 7,
            model: "flux".to_string(),
            width: 1024,
            height: 1024,
            error: None,
        }
    }

    struct FailingStore;

    impl KeyValueStore for FailingStore {
        fn read(&self, _key: &str) -> Result<Option<String>> {
            Err(PixgenError::StorageError("disk gone".into()))
        }
        fn write(&self, _key: &str, _value: &str) -> Result<()> {
            Err(PixgenError::StorageError("disk gone".into()))
        }
        fn remove(&self, _key: &str) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_duplicate_id_keeps_first_entry() {
        let favorites = FavoritesStore::restore(Arc::new(MemoryStore::new()));
        assert!(favorites.add(favorite("a", "first")).unwrap());
        assert!(favorites.add(favorite("b", "second")).unwrap());
        assert!(!favorites.add(favorite("a", "replacement")).unwrap());

        let list = favorites.list();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].id, "a");
        assert_eq!(list[0].prompt, "first");
        assert_eq!(list[1].id, "b");
    }

    #[test]
    fn test_add_writes_through() {
        let store = Arc::new(MemoryStore::new());
        let favorites = FavoritesStore::restore(store.clone());
        favorites.add(favorite("a", "fox")).unwrap();

        let raw = store.read(FAVORITES_KEY).unwrap().unwrap();
        let persisted: Vec<FavoriteImage> = serde_json::from_str(&raw).unwrap();
        assert_eq!(persisted, favorites.list());
    }

    #[test]
    fn test_restore_round_trip_preserves_order() {
        let store = Arc::new(MemoryStore::new());
        let favorites = FavoritesStore::restore(store.clone());
        favorites.add(favorite("a", "fox")).unwrap();
        favorites.add(favorite("b", "owl")).unwrap();
        favorites.persist().unwrap();

        let restored = FavoritesStore::restore(store);
        let ids: Vec<_> = restored.list().into_iter().map(|f| f.id).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_corrupt_or_absent_snapshot_is_empty() {
        let store = Arc::new(MemoryStore::new());
        assert!(FavoritesStore::restore(store.clone()).is_empty());

        store.write(FAVORITES_KEY, "{not json").unwrap();
        assert!(FavoritesStore::restore(store.clone()).is_empty());

        store.write(FAVORITES_KEY, r#"{"id": "a"}"#).unwrap();
        assert!(FavoritesStore::restore(store).is_empty());

        assert!(FavoritesStore::restore(Arc::new(FailingStore)).is_empty());
    }

    #[test]
    fn test_failed_write_rolls_back() {
        let favorites = FavoritesStore::restore(Arc::new(FailingStore));
        assert!(favorites.add(favorite("a", "fox")).is_err());
        assert!(favorites.is_empty());
        assert!(!favorites.contains("a"));
    }

    #[test]
    fn test_restore_drops_duplicate_ids() {
        let store = Arc::new(MemoryStore::new());
        let raw = serde_json::to_string(&vec![
            favorite("a", "first"),
            favorite("a", "second"),
            favorite("b", "third"),
        ])
        .unwrap();
        store.write(FAVORITES_KEY, &raw).unwrap();

        let list = FavoritesStore::restore(store).list();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].prompt, "first");
    }

    #[test]
    fn test_clear_persists_empty_list() {
        let store = Arc::new(MemoryStore::new());
        let favorites = FavoritesStore::restore(store.clone());
        favorites.add(favorite("a", "fox")).unwrap();
        favorites.clear().unwrap();

        assert!(favorites.is_empty());
        assert_eq!(store.read(FAVORITES_KEY).unwrap().as_deref(), Some("[]"));
    }
}
