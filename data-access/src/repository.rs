//! Repository implementations for data access

use bookmark_manager_core::*;
use tokio_rusqlite::Connection;
use std::sync::Arc;
use async_trait::async_trait;
use rusqlite::types::{Type, Value};
use rusqlite::Row;

/// Repository trait for bookmarks
#[async_trait]
pub trait BookmarkRepository: Send + Sync {
    async fn insert(&self, bookmark: &NewBookmark) -> Result<Bookmark>;
    async fn update(&self, bookmark: &Bookmark) -> Result<()>;
    async fn get_by_id(&self, id: BookmarkId) -> Result<Option<Bookmark>>;
    async fn get_by_url(&self, url: &str) -> Result<Option<Bookmark>>;
    async fn count_by_url(&self, url: &str) -> Result<usize>;
    async fn list(&self, filter: &BookmarkFilter, limit: usize, offset: usize) -> Result<Vec<Bookmark>>;
    async fn count(&self, filter: &BookmarkFilter) -> Result<usize>;
    /// Returns whether a row was deleted
    async fn delete(&self, id: BookmarkId) -> Result<bool>;
}

/// Case folding SQL function registered on every connection
pub(crate) const UNICODE_LOWER: &str = "unicode_lower";

const SELECT_COLUMNS: &str =
    "SELECT id, url, title, favicon, description, keywords, created_at FROM bookmarks";

/// Helper function to map a row to Bookmark
fn row_to_bookmark(row: &Row) -> rusqlite::Result<Bookmark> {
    let id: i64 = row.get(0)?;
    let url: String = row.get(1)?;
    let title: String = row.get(2)?;
    let favicon: Option<String> = row.get(3)?;
    let description: Option<String> = row.get(4)?;
    let keywords: Option<String> = row.get(5)?;
    let created_at_ms: i64 = row.get(6)?;

    Ok(Bookmark {
        id: BookmarkId(id),
        url,
        created_at: millis_to_datetime(created_at_ms)?,
        metadata: BookmarkMetadata {
            title,
            favicon,
            description,
            keywords,
        },
    })
}

/// Row counts beyond `i64::MAX` are clamped; SQLite integers are signed
fn sql_integer(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

fn millis_to_datetime(millis: i64) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            6,
            Type::Integer,
            format!("created_at out of range: {}", millis).into(),
        )
    })
}

/// Stored timestamps have millisecond precision
fn truncate_to_millis(timestamp: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(timestamp.timestamp_millis()).unwrap_or(timestamp)
}

/// Build the WHERE clause and its parameters for a list filter
///
/// Text filters are case-insensitive substring matches.
fn filter_clause(filter: &BookmarkFilter) -> (String, Vec<Value>) {
    let mut conditions = Vec::new();
    let mut params = Vec::new();

    let text_filters = [
        ("url", &filter.url_contains),
        ("title", &filter.title_contains),
        ("favicon", &filter.favicon_contains),
        ("description", &filter.description_contains),
        ("keywords", &filter.keywords_contains),
    ];
    for (column, needle) in text_filters {
        if let Some(needle) = needle {
            params.push(Value::Text(needle.to_lowercase()));
            conditions.push(format!(
                "instr({}(COALESCE({}, '')), ?{}) > 0",
                UNICODE_LOWER,
                column,
                params.len()
            ));
        }
    }

    if let Some(after) = filter.created_after {
        params.push(Value::Integer(after.timestamp_millis()));
        conditions.push(format!("created_at >= ?{}", params.len()));
    }
    if let Some(before) = filter.created_before {
        params.push(Value::Integer(before.timestamp_millis()));
        conditions.push(format!("created_at <= ?{}", params.len()));
    }

    if conditions.is_empty() {
        (String::new(), params)
    } else {
        (format!(" WHERE {}", conditions.join(" AND ")), params)
    }
}

fn is_unique_violation(e: &tokio_rusqlite::Error) -> bool {
    matches!(
        e,
        tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(err, _))
            if err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

fn database_error(action: &str, e: tokio_rusqlite::Error) -> BookmarkManagerError {
    PersistenceError::Database {
        details: format!("Failed to {}: {}", action, e),
    }
    .into()
}

/// SQLite implementation of BookmarkRepository
pub struct SqliteBookmarkRepository {
    connection: Arc<Connection>,
}

impl SqliteBookmarkRepository {
    pub fn new(connection: Arc<Connection>) -> Self {
        Self { connection }
    }
}

#[async_trait]
impl BookmarkRepository for SqliteBookmarkRepository {
    async fn insert(&self, bookmark: &NewBookmark) -> Result<Bookmark> {
        let mut new = bookmark.clone();
        new.created_at = truncate_to_millis(new.created_at);
        let row = new.clone();

        let id = self.connection
            .call(move |conn| {
                conn.execute(
                    r#"
                    INSERT INTO bookmarks (url, title, favicon, description, keywords, created_at)
                    VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                    "#,
                    rusqlite::params![
                        row.url,
                        row.metadata.title,
                        row.metadata.favicon,
                        row.metadata.description,
                        row.metadata.keywords,
                        row.created_at.timestamp_millis(),
                    ],
                )?;
                Ok(conn.last_insert_rowid())
            })
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    BookmarkManagerError::from(PersistenceError::DuplicateUrl { url: bookmark.url.clone() })
                } else {
                    database_error("insert bookmark", e)
                }
            })?;

        Ok(Bookmark::from_new(BookmarkId(id), new))
    }

    async fn update(&self, bookmark: &Bookmark) -> Result<()> {
        let row = bookmark.clone();

        let changed = self.connection
            .call(move |conn| {
                let changed = conn.execute(
                    r#"
                    UPDATE bookmarks
                    SET url = ?1, title = ?2, favicon = ?3, description = ?4, keywords = ?5, created_at = ?6
                    WHERE id = ?7
                    "#,
                    rusqlite::params![
                        row.url,
                        row.metadata.title,
                        row.metadata.favicon,
                        row.metadata.description,
                        row.metadata.keywords,
                        row.created_at.timestamp_millis(),
                        row.id.value(),
                    ],
                )?;
                Ok(changed)
            })
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    BookmarkManagerError::from(PersistenceError::DuplicateUrl { url: bookmark.url.clone() })
                } else {
                    database_error("update bookmark", e)
                }
            })?;

        if changed == 0 {
            return Err(PersistenceError::NotFound { id: bookmark.id }.into());
        }
        Ok(())
    }

    async fn get_by_id(&self, id: BookmarkId) -> Result<Option<Bookmark>> {
        self.connection
            .call(move |conn| {
                let mut stmt = conn.prepare(&format!("{} WHERE id = ?1", SELECT_COLUMNS))?;

                match stmt.query_row([id.value()], row_to_bookmark) {
                    Ok(bookmark) => Ok(Some(bookmark)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(|e| database_error("get bookmark", e))
    }

    async fn get_by_url(&self, url: &str) -> Result<Option<Bookmark>> {
        let url_str = url.to_string();

        self.connection
            .call(move |conn| {
                let mut stmt = conn.prepare(&format!("{} WHERE url = ?1 LIMIT 1", SELECT_COLUMNS))?;

                match stmt.query_row([&url_str], row_to_bookmark) {
                    Ok(bookmark) => Ok(Some(bookmark)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(|e| database_error("get bookmark by URL", e))
    }

    async fn count_by_url(&self, url: &str) -> Result<usize> {
        let url_str = url.to_string();

        self.connection
            .call(move |conn| {
                let count: i64 = conn.query_row(
                    "SELECT COUNT(*) FROM bookmarks WHERE url = ?1",
                    [&url_str],
                    |row| row.get(0),
                )?;
                Ok(count as usize)
            })
            .await
            .map_err(|e| database_error("count bookmarks by URL", e))
    }

    async fn list(&self, filter: &BookmarkFilter, limit: usize, offset: usize) -> Result<Vec<Bookmark>> {
        let (where_clause, mut params) = filter_clause(filter);
        params.push(Value::Integer(sql_integer(limit)));
        let limit_index = params.len();
        params.push(Value::Integer(sql_integer(offset)));
        let offset_index = params.len();

        let sql = format!(
            "{}{} ORDER BY created_at DESC, id DESC LIMIT ?{} OFFSET ?{}",
            SELECT_COLUMNS, where_clause, limit_index, offset_index
        );

        self.connection
            .call(move |conn| {
                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt.query_map(rusqlite::params_from_iter(params), row_to_bookmark)?;
                let bookmarks = rows.collect::<rusqlite::Result<Vec<_>>>()?;
                Ok(bookmarks)
            })
            .await
            .map_err(|e| database_error("list bookmarks", e))
    }

    async fn count(&self, filter: &BookmarkFilter) -> Result<usize> {
        let (where_clause, params) = filter_clause(filter);
        let sql = format!("SELECT COUNT(*) FROM bookmarks{}", where_clause);

        self.connection
            .call(move |conn| {
                let count: i64 = conn.query_row(&sql, rusqlite::params_from_iter(params), |row| row.get(0))?;
                Ok(count as usize)
            })
            .await
            .map_err(|e| database_error("count bookmarks", e))
    }

    async fn delete(&self, id: BookmarkId) -> Result<bool> {
        let deleted = self.connection
            .call(move |conn| {
                let deleted = conn.execute("DELETE FROM bookmarks WHERE id = ?1", [id.value()])?;
                Ok(deleted)
            })
            .await
            .map_err(|e| database_error("delete bookmark", e))?;

        Ok(deleted > 0)
    }
}
