//! Work record source for search resolution.

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::{Pool, Postgres, Row};

use folio_core::{Error, RecordSource, Result, Work};

/// PostgreSQL record source for works.
#[derive(Clone)]
pub struct PgWorkRepository {
    pool: Pool<Postgres>,
}

impl PgWorkRepository {
    /// Create a new PgWorkRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordSource<Work> for PgWorkRepository {
    async fn by_ids(&self, ids: &[i64]) -> Result<HashMap<i64, Vec<Work>>> {
        let rows = sqlx::query(
            "SELECT id, title, restricted, posted, summary, created_at_utc
             FROM works WHERE id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        let mut grouped: HashMap<i64, Vec<Work>> = HashMap::new();
        for row in rows {
            let work = Work {
                id: row.get("id"),
                title: row.get("title"),
                restricted: row.get("restricted"),
                posted: row.get("posted"),
                summary: row.get("summary"),
                created_at_utc: row.get("created_at_utc"),
            };
            grouped.entry(work.id).or_default().push(work);
        }
        Ok(grouped)
    }
}
