//! `PostgreSQL` album store
//!
//! Pass-through statements against the externally provisioned table:
//!
//! ```sql
//! CREATE TABLE albums (
//!     id     TEXT PRIMARY KEY,
//!     title  TEXT NOT NULL,
//!     artist TEXT NOT NULL,
//!     price  DOUBLE PRECISION NOT NULL
//! );
//! ```

use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;

use super::{AlbumStore, StoreError};
use crate::config::DatabaseConfig;
use crate::logger;
use crate::model::Album;

const TABLE_EXISTS_QUERY: &str =
    "SELECT EXISTS (SELECT 1 FROM information_schema.tables WHERE table_name = 'albums')";

/// `PostgreSQL` implementation of `AlbumStore` over a connection pool
#[derive(Debug, Clone)]
pub struct PgAlbumStore {
    pool: PgPool,
}

impl PgAlbumStore {
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect the pool and run the startup checks
    ///
    /// Fails when the server is unreachable or the `albums` table is missing.
    /// The table is never created here.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let options = PgConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.user)
            .password(&config.password)
            .database(&config.name);

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await?;
        logger::log_database_connected(&config.address());

        let store = Self::new(pool);
        store.ping().await?;

        require_albums_table(
            sqlx::query_scalar::<_, bool>(TABLE_EXISTS_QUERY)
                .fetch_one(&store.pool)
                .await,
        )?;

        logger::log_info("Database connected successfully");
        Ok(store)
    }
}

/// Turn the table-existence query into a startup verdict, logging driver errors
fn require_albums_table(found: Result<bool, sqlx::Error>) -> Result<(), StoreError> {
    let exists = match found {
        Ok(exists) => exists,
        Err(e) => {
            logger::log_error(&format!("Failed to check for albums table: {e}"));
            false
        }
    };
    if exists {
        Ok(())
    } else {
        Err(StoreError::Database(
            "Albums table doesn't exist or can't be accessed".to_string(),
        ))
    }
}

#[async_trait]
impl AlbumStore for PgAlbumStore {
    async fn list_all(&self) -> Result<Vec<Album>, StoreError> {
        let albums = sqlx::query_as::<_, Album>("SELECT id, title, artist, price FROM albums")
            .fetch_all(&self.pool)
            .await?;
        Ok(albums)
    }

    async fn find_by_id(&self, id: &str) -> Result<Album, StoreError> {
        let album =
            sqlx::query_as::<_, Album>("SELECT id, title, artist, price FROM albums WHERE id = $1")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        Ok(album)
    }

    async fn insert(&self, album: Album) -> Result<Album, StoreError> {
        sqlx::query("INSERT INTO albums (id, title, artist, price) VALUES ($1, $2, $3, $4)")
            .bind(&album.id)
            .bind(&album.title)
            .bind(&album.artist)
            .bind(album.price)
            .execute(&self.pool)
            .await?;
        Ok(album)
    }

    async fn delete_by_id(&self, id: &str) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM albums WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
