//! Collection repository implementation.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use sqlx::{Pool, Postgres, Row};

use folio_core::{CollectionRepository, CollectionView, Error, LabelSource, Result};

/// Roles in `collection_participants` that hold administrative rights.
const MAINTAINER_ROLE: &str = "maintainer";

/// PostgreSQL implementation of CollectionRepository.
///
/// Also serves as the label source for the `collection` facet category.
#[derive(Clone)]
pub struct PgCollectionRepository {
    pool: Pool<Postgres>,
}

impl PgCollectionRepository {
    /// Create a new PgCollectionRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CollectionRepository for PgCollectionRepository {
    async fn view(&self, id: i64) -> Result<Option<CollectionView>> {
        let row = sqlx::query(
            "SELECT id, name, title, closed, moderated FROM collections WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        let Some(row) = row else {
            return Ok(None);
        };

        let maintainer_pseud_ids: HashSet<i64> = sqlx::query(
            "SELECT pseud_id FROM collection_participants
             WHERE collection_id = $1 AND role = $2",
        )
        .bind(id)
        .bind(MAINTAINER_ROLE)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?
        .iter()
        .map(|r| r.get("pseud_id"))
        .collect();

        // Maintainers may post too, so both roles count as posting participants
        let posting_participant_ids: HashSet<i64> = sqlx::query(
            "SELECT DISTINCT p.user_id
             FROM collection_participants cp
             JOIN pseuds p ON p.id = cp.pseud_id
             WHERE cp.collection_id = $1 AND cp.role IN ('maintainer', 'member')",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?
        .iter()
        .map(|r| r.get("user_id"))
        .collect();

        Ok(Some(CollectionView {
            id: row.get("id"),
            name: row.get("name"),
            title: row.get("title"),
            closed: row.get("closed"),
            moderated: row.get("moderated"),
            maintainer_pseud_ids,
            posting_participant_ids,
        }))
    }
}

#[async_trait]
impl LabelSource for PgCollectionRepository {
    async fn labels(&self, ids: &[i64]) -> Result<HashMap<i64, String>> {
        let rows = sqlx::query("SELECT id, title FROM collections WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)?;

        Ok(rows
            .iter()
            .map(|r| (r.get("id"), r.get("title")))
            .collect())
    }
}
