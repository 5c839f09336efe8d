//! City repository: persistence and queries for users' saved cities.
//!
//! Uses SqlitePoolManager and the SavedCity model. Callers normally go through
//! [`crate::CityStore`], which runs every call on a dedicated worker task.

use crate::error::StorageError;
use crate::models::SavedCity;
use crate::sqlite_pool::SqlitePoolManager;
use chrono::Utc;
use tracing::{debug, info};

#[derive(Clone)]
pub struct CityRepository {
    pool_manager: SqlitePoolManager,
}

impl CityRepository {
    /// Opens the database and ensures the schema exists. Fails if the location is unwritable.
    pub async fn new(database_url: &str) -> Result<Self, StorageError> {
        let pool_manager = SqlitePoolManager::new(database_url).await?;
        let repo = Self { pool_manager };
        repo.init().await?;
        Ok(repo)
    }

    /// Idempotently creates the `cities` table and its index.
    pub async fn init(&self) -> Result<(), StorageError> {
        info!("Creating database tables if not exist");

        let pool = self.pool_manager.pool();

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS cities (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                city TEXT NOT NULL,
                created_at TEXT NOT NULL,
                UNIQUE(user_id, city)
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_cities_user_id ON cities(user_id)")
            .execute(pool)
            .await?;

        info!("Database tables created successfully");
        Ok(())
    }

    /// Saves `name` for `user_id`. Whitespace is trimmed; an empty name or an already saved
    /// (user, name) pair is a no-op. Returns whether a row was inserted.
    pub async fn add_city(&self, user_id: i64, name: &str) -> Result<bool, StorageError> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(false);
        }

        let result = sqlx::query(
            "INSERT OR IGNORE INTO cities (user_id, city, created_at) VALUES (?, ?, ?)",
        )
        .bind(user_id)
        .bind(name)
        .bind(Utc::now())
        .execute(self.pool_manager.pool())
        .await?;

        let inserted = result.rows_affected() > 0;
        debug!(user_id, city = %name, inserted, "add_city");
        Ok(inserted)
    }

    /// Lists the user's cities, oldest first (ties broken by id). Empty if none.
    pub async fn list_cities(&self, user_id: i64) -> Result<Vec<SavedCity>, StorageError> {
        let cities = sqlx::query_as::<_, SavedCity>(
            r#"
            SELECT id, user_id, city AS name, created_at
            FROM cities
            WHERE user_id = ?
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool_manager.pool())
        .await?;

        debug!(user_id, count = cities.len(), "list_cities");
        Ok(cities)
    }

    /// Returns the city name for `id` only if it belongs to `user_id`.
    pub async fn get_city_by_id(
        &self,
        user_id: i64,
        id: i64,
    ) -> Result<Option<String>, StorageError> {
        let name: Option<String> =
            sqlx::query_scalar("SELECT city FROM cities WHERE id = ? AND user_id = ?")
                .bind(id)
                .bind(user_id)
                .fetch_optional(self.pool_manager.pool())
                .await?;

        Ok(name)
    }
}
