//! Album storage module
//!
//! Defines the data access contract the request handlers depend on, with a
//! `PostgreSQL` implementation for production and an in-memory one for tests
//! and local runs.

mod memory;
mod postgres;

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

use crate::config::{DatabaseConfig, StorageBackend};
use crate::model::Album;

pub use memory::MemoryAlbumStore;
pub use postgres::PgAlbumStore;

/// Errors surfaced by a store
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// No row matched the requested id
    #[error("album not found")]
    NotFound,

    /// Any other failure, carrying the driver's message verbatim
    #[error("{0}")]
    Database(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(error: sqlx::Error) -> Self {
        match error {
            sqlx::Error::RowNotFound => Self::NotFound,
            other => Self::Database(other.to_string()),
        }
    }
}

/// Data access contract for albums
///
/// Every call is attempted exactly once; implementations must not retry.
#[async_trait]
pub trait AlbumStore: Send + Sync {
    async fn list_all(&self) -> Result<Vec<Album>, StoreError>;

    /// Returns `StoreError::NotFound` when no album has this id
    async fn find_by_id(&self, id: &str) -> Result<Album, StoreError>;

    /// Duplicate ids fail with the store's own constraint error
    async fn insert(&self, album: Album) -> Result<Album, StoreError>;

    /// Returns the number of rows removed
    async fn delete_by_id(&self, id: &str) -> Result<u64, StoreError>;

    /// Readiness probe
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

pub type SharedAlbumStore = Arc<dyn AlbumStore>;

/// Build the store selected by configuration
///
/// The database configuration is only read for the `PostgreSQL` backend, so a
/// memory-backed run needs no `DB_*` variables.
pub async fn open(
    backend: StorageBackend,
) -> Result<SharedAlbumStore, Box<dyn std::error::Error>> {
    match backend {
        StorageBackend::Memory => Ok(Arc::new(MemoryAlbumStore::new())),
        StorageBackend::Postgres => {
            let db_config = DatabaseConfig::from_env()?;
            let store = PgAlbumStore::connect(&db_config).await?;
            Ok(Arc::new(store))
        }
    }
}
