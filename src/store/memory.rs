// In-memory album store
// Keeps albums in a sorted map behind an async lock; used by tests and `--memory` runs

use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use super::{AlbumStore, StoreError};
use crate::model::Album;

/// Thread-safe in-memory store with the same primary-key semantics as the table
#[derive(Debug, Default)]
pub struct MemoryAlbumStore {
    albums: RwLock<BTreeMap<String, Album>>,
}

impl MemoryAlbumStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AlbumStore for MemoryAlbumStore {
    async fn list_all(&self) -> Result<Vec<Album>, StoreError> {
        Ok(self.albums.read().await.values().cloned().collect())
    }

    async fn find_by_id(&self, id: &str) -> Result<Album, StoreError> {
        self.albums
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn insert(&self, album: Album) -> Result<Album, StoreError> {
        let mut albums = self.albums.write().await;
        if albums.contains_key(&album.id) {
            return Err(StoreError::Database(format!(
                "duplicate key value violates unique constraint \"albums_pkey\": Key (id)=({}) already exists.",
                album.id
            )));
        }
        albums.insert(album.id.clone(), album.clone());
        Ok(album)
    }

    async fn delete_by_id(&self, id: &str) -> Result<u64, StoreError> {
        Ok(u64::from(self.albums.write().await.remove(id).is_some()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn album(id: &str) -> Album {
        Album {
            id: id.to_string(),
            title: "Blue Train".to_string(),
            artist: "John Coltrane".to_string(),
            price: 56.99,
        }
    }

    #[tokio::test]
    async fn test_insert_then_find() {
        let store = MemoryAlbumStore::new();
        let created = store.insert(album("1")).await.unwrap();
        assert_eq!(created, album("1"));
        assert_eq!(store.find_by_id("1").await.unwrap(), album("1"));
        assert_eq!(store.find_by_id("2").await, Err(StoreError::NotFound));
    }

    #[tokio::test]
    async fn test_duplicate_insert_keeps_original() {
        let store = MemoryAlbumStore::new();
        store.insert(album("1")).await.unwrap();

        let mut other = album("1");
        other.title = "Giant Steps".to_string();
        let err = store.insert(other).await.unwrap_err();
        assert!(matches!(err, StoreError::Database(msg) if msg.contains("albums_pkey")));

        assert_eq!(store.list_all().await.unwrap().len(), 1);
        assert_eq!(store.find_by_id("1").await.unwrap().title, "Blue Train");
    }

    #[tokio::test]
    async fn test_delete_reports_rows_affected() {
        let store = MemoryAlbumStore::new();
        store.insert(album("1")).await.unwrap();
        assert_eq!(store.delete_by_id("1").await.unwrap(), 1);
        assert_eq!(store.delete_by_id("1").await.unwrap(), 0);
        assert!(store.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_is_ordered_by_id() {
        let store = MemoryAlbumStore::new();
        store.insert(album("b")).await.unwrap();
        store.insert(album("a")).await.unwrap();
        let ids: Vec<String> = store
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|a| a.id)
            .collect();
        assert_eq!(ids, vec!["a", "b"]);
    }
}
