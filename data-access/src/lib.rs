//! Data Access Layer for the bookmark admin backend
//!
//! This module provides bookmark persistence using SQLite. The `url`
//! column is unique; inserting a second bookmark for the same URL fails
//! with [`PersistenceError::DuplicateUrl`].

pub mod schema;
pub mod repository;

pub use repository::*;

use bookmark_manager_core::*;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use repository::UNICODE_LOWER;
use rusqlite::functions::FunctionFlags;
use tokio_rusqlite::Connection;
use tracing::{debug, info};

/// Database statistics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseStats {
    pub bookmark_count: usize,
    pub schema_version: u32,
}

/// Database manager for handling SQLite connections
pub struct DatabaseManager {
    connection: Arc<Connection>,
}

impl DatabaseManager {
    /// Create a new database manager with the specified path
    pub async fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let path = db_path.as_ref().to_path_buf();
        info!("Opening bookmark database at {}", path.display());

        let connection = Connection::open(path)
            .await
            .map_err(|e| PersistenceError::Database {
                details: format!("Failed to open database: {}", e),
            })?;

        Self::with_connection(connection).await
    }

    /// Create an in-memory database (for testing)
    pub async fn in_memory() -> Result<Self> {
        let connection = Connection::open_in_memory()
            .await
            .map_err(|e| PersistenceError::Database {
                details: format!("Failed to create in-memory database: {}", e),
            })?;

        Self::with_connection(connection).await
    }

    async fn with_connection(connection: Connection) -> Result<Self> {
        let manager = Self {
            connection: Arc::new(connection),
        };

        manager.register_functions().await?;

        // Initialize schema
        manager.initialize_schema().await?;

        Ok(manager)
    }

    /// SQL functions the repository queries rely on
    ///
    /// `unicode_lower` folds case the way Rust does. SQLite's built-in
    /// `lower()` only folds ASCII.
    async fn register_functions(&self) -> Result<()> {
        self.connection
            .call(|conn| {
                conn.create_scalar_function(
                    UNICODE_LOWER,
                    1,
                    FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
                    |ctx| {
                        let text: Option<String> = ctx.get(0)?;
                        Ok(text.map(|t| t.to_lowercase()))
                    },
                )?;
                Ok(())
            })
            .await
            .map_err(|e| PersistenceError::Database {
                details: format!("Failed to register SQL functions: {}", e),
            })?;
        Ok(())
    }

    /// Apply all migrations and record them
    async fn initialize_schema(&self) -> Result<()> {
        self.connection
            .call(|conn| {
                for migration in schema::MIGRATIONS {
                    conn.execute_batch(migration.sql)?;
                    conn.execute(
                        "INSERT OR IGNORE INTO schema_migrations (version, applied_at, description) \
                         VALUES (?1, ?2, ?3)",
                        rusqlite::params![
                            migration.version,
                            Utc::now().timestamp(),
                            migration.description,
                        ],
                    )?;
                }
                Ok(())
            })
            .await
            .map_err(|e| PersistenceError::Database {
                details: format!("Failed to initialize schema: {}", e),
            })?;

        debug!("Schema initialized at version {}", schema::SCHEMA_VERSION);
        Ok(())
    }

    /// Get the connection for repository operations
    pub fn connection(&self) -> Arc<Connection> {
        Arc::clone(&self.connection)
    }

    /// Repository over this database
    pub fn bookmarks(&self) -> SqliteBookmarkRepository {
        SqliteBookmarkRepository::new(self.connection())
    }

    /// Get database statistics
    pub async fn stats(&self) -> Result<DatabaseStats> {
        self.connection
            .call(|conn| {
                let bookmark_count: i64 =
                    conn.query_row("SELECT COUNT(*) FROM bookmarks", [], |row| row.get(0))?;
                let schema_version: u32 = conn.query_row(
                    "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
                    [],
                    |row| row.get(0),
                )?;
                Ok(DatabaseStats {
                    bookmark_count: bookmark_count as usize,
                    schema_version,
                })
            })
            .await
            .map_err(|e| {
                PersistenceError::Database {
                    details: format!("Failed to read database stats: {}", e),
                }
                .into()
            })
    }
}
