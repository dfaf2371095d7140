//! Tag label source for facet resolution.

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::{Pool, Postgres, Row};

use folio_core::{Error, LabelSource, Result};

/// PostgreSQL label source over the `tags` table.
///
/// Fandom, character, relationship, and freeform facet terms all reference
/// tag rows; their display label is the tag name.
#[derive(Clone)]
pub struct PgTagLabels {
    pool: Pool<Postgres>,
}

impl PgTagLabels {
    /// Create a new PgTagLabels with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LabelSource for PgTagLabels {
    async fn labels(&self, ids: &[i64]) -> Result<HashMap<i64, String>> {
        let rows = sqlx::query("SELECT id, name FROM tags WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)?;

        Ok(rows.iter().map(|r| (r.get("id"), r.get("name"))).collect())
    }
}
