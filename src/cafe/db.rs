//! Cafe database operations
//!
//! Every repository call is a single statement against the `cafe` table. The
//! pool lends out one connection per call and takes it back whether the
//! statement succeeds or fails.

use crate::cafe::error::StoreError;
use crate::cafe::models::{Cafe, CafeId, NewCafe};
use crate::error::AppError;
use rand::seq::SliceRandom;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{debug, info, warn};

const CAFE_COLUMNS: &str = "id, name, map_url, img_url, location, seats, \
     has_toilet, has_wifi, has_sockets, can_take_calls, coffee_price";

/// Database connection pool for cafe operations
pub struct CafeDb {
    pool: SqlitePool,
}

impl CafeDb {
    /// Open (or create) the database file and make sure the schema exists
    ///
    /// # Arguments
    /// * `db_path` - Path to the SQLite database file
    ///
    /// # Returns
    /// * `Ok(CafeDb)` if successful
    /// * `Err(AppError)` if connection or migration failed
    pub async fn new(db_path: &str) -> Result<Self, AppError> {
        // Ensure parent directory exists
        if let Some(parent) = PathBuf::from(db_path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    AppError::Internal(anyhow::anyhow!("Failed to create db directory: {}", e))
                })?;
            }
        }

        let connection_string = if db_path.starts_with("sqlite:") {
            db_path.to_string()
        } else {
            format!("sqlite:{}", db_path)
        };

        let options = SqliteConnectOptions::from_str(&connection_string)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Invalid database path: {}", e)))?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| {
                AppError::Internal(anyhow::anyhow!("Failed to connect to database: {}", e))
            })?;

        info!("Connected to SQLite database at: {}", db_path);

        let db = Self { pool };
        db.run_migrations().await?;

        Ok(db)
    }

    /// Apply the embedded schema; every statement is idempotent
    async fn run_migrations(&self) -> Result<(), AppError> {
        info!("Running database migrations...");

        let migration_sql = include_str!("../../migrations/001_create_cafes.sql");

        for statement in split_statements(migration_sql) {
            sqlx::query(&statement)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    AppError::Internal(anyhow::anyhow!(
                        "Migration failed: {} - Statement: {}",
                        e,
                        statement.chars().take(100).collect::<String>()
                    ))
                })?;
        }

        info!("Database migrations completed successfully");
        Ok(())
    }

    /// Get every cafe, ordered by id
    pub async fn list_all(&self) -> Result<Vec<Cafe>, StoreError> {
        let sql = format!("SELECT {} FROM cafe ORDER BY id", CAFE_COLUMNS);
        sqlx::query_as::<_, Cafe>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| storage_failure("list_all", e))
    }

    /// Get the id of every cafe, ordered by id
    pub async fn list_all_ids(&self) -> Result<Vec<CafeId>, StoreError> {
        sqlx::query_scalar::<_, CafeId>("SELECT id FROM cafe ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| storage_failure("list_all_ids", e))
    }

    /// Get a cafe by id
    pub async fn get_by_id(&self, id: CafeId) -> Result<Cafe, StoreError> {
        let sql = format!("SELECT {} FROM cafe WHERE id = ?", CAFE_COLUMNS);
        sqlx::query_as::<_, Cafe>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| storage_failure("get_by_id", e))?
            .ok_or(StoreError::NotFound(id))
    }

    /// Get all cafes whose location matches exactly (case-sensitive)
    pub async fn get_by_location(&self, location: &str) -> Result<Vec<Cafe>, StoreError> {
        let sql = format!(
            "SELECT {} FROM cafe WHERE location = ? ORDER BY id",
            CAFE_COLUMNS
        );
        sqlx::query_as::<_, Cafe>(&sql)
            .bind(location)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| storage_failure("get_by_location", e))
    }

    /// Insert a new cafe and return its generated id
    pub async fn create(&self, cafe: &NewCafe) -> Result<CafeId, StoreError> {
        let result = sqlx::query(
            "INSERT INTO cafe (name, map_url, img_url, location, seats, \
             has_toilet, has_wifi, has_sockets, can_take_calls, coffee_price) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&cafe.name)
        .bind(&cafe.map_url)
        .bind(&cafe.img_url)
        .bind(&cafe.location)
        .bind(&cafe.seats)
        .bind(cafe.has_toilet)
        .bind(cafe.has_wifi)
        .bind(cafe.has_sockets)
        .bind(cafe.can_take_calls)
        .bind(&cafe.coffee_price)
        .execute(&self.pool)
        .await
        .map_err(|e| storage_failure("create", e))?;

        let id = result.last_insert_rowid();
        debug!(cafe_id = id, name = %cafe.name, "Created cafe");
        Ok(id)
    }

    /// Set (or clear) the coffee price of an existing cafe
    pub async fn update_price(
        &self,
        id: CafeId,
        new_price: Option<&str>,
    ) -> Result<(), StoreError> {
        let result = sqlx::query("UPDATE cafe SET coffee_price = ? WHERE id = ?")
            .bind(new_price)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| storage_failure("update_price", e))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }

        debug!(cafe_id = id, new_price = ?new_price, "Updated coffee price");
        Ok(())
    }

    /// Get the database pool (for advanced operations if needed)
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

/// Pick one id uniformly at random, or `None` if there are none
pub fn pick_random(ids: &[CafeId]) -> Option<CafeId> {
    ids.choose(&mut rand::thread_rng()).copied()
}

fn storage_failure(operation: &'static str, err: sqlx::Error) -> StoreError {
    let err = StoreError::from(err);
    warn!(operation, error = %err, "Cafe storage operation failed");
    err
}

/// Strip `--` comments and split a migration script into statements
fn split_statements(sql: &str) -> Vec<String> {
    let mut cleaned = String::new();
    for line in sql.lines() {
        let code = match line.find("--") {
            Some(pos) => &line[..pos],
            None => line,
        };
        let code = code.trim();
        if code.is_empty() {
            continue;
        }
        cleaned.push_str(code);
        cleaned.push(' ');
    }

    cleaned
        .split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
