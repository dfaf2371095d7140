//! Bookmark record source for search resolution.

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::{Pool, Postgres, Row};

use folio_core::{Bookmark, Error, RecordSource, Result};

/// PostgreSQL record source for bookmarks.
#[derive(Clone)]
pub struct PgBookmarkRepository {
    pool: Pool<Postgres>,
}

impl PgBookmarkRepository {
    /// Create a new PgBookmarkRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordSource<Bookmark> for PgBookmarkRepository {
    async fn by_ids(&self, ids: &[i64]) -> Result<HashMap<i64, Vec<Bookmark>>> {
        let rows = sqlx::query(
            "SELECT id, pseud_id, notes, created_at_utc FROM bookmarks WHERE id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        let mut grouped: HashMap<i64, Vec<Bookmark>> = HashMap::new();
        for row in rows {
            let bookmark = Bookmark {
                id: row.get("id"),
                pseud_id: row.get("pseud_id"),
                notes: row.get("notes"),
                created_at_utc: row.get("created_at_utc"),
            };
            grouped.entry(bookmark.id).or_default().push(bookmark);
        }
        Ok(grouped)
    }
}
