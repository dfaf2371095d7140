//! Item ownership views across every collectable kind.

use std::collections::HashSet;

use async_trait::async_trait;
use sqlx::{Pool, Postgres, Row};

use folio_core::{Error, ItemKind, ItemRef, ItemRepository, ItemView, OwnerView, Result};

/// PostgreSQL implementation of ItemRepository.
///
/// Works credit their creators through `creatorships`; bookmarks belong to
/// a single pseud. Both resolve to the same ownership projection.
#[derive(Clone)]
pub struct PgItemRepository {
    pool: Pool<Postgres>,
}

impl PgItemRepository {
    /// Create a new PgItemRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    async fn work_view(&self, id: i64) -> Result<Option<ItemView>> {
        let exists = sqlx::query("SELECT id FROM works WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?;
        if exists.is_none() {
            return Ok(None);
        }

        let pseud_ids: HashSet<i64> = sqlx::query(
            "SELECT pseud_id FROM creatorships
             WHERE creation_kind = 'work' AND creation_id = $1",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?
        .iter()
        .map(|r| r.get("pseud_id"))
        .collect();

        let owners = sqlx::query(
            "SELECT DISTINCT u.id AS user_id,
                    COALESCE(pref.auto_approve_invitations, false) AS auto_approve
             FROM creatorships c
             JOIN pseuds p ON p.id = c.pseud_id
             JOIN users u ON u.id = p.user_id
             LEFT JOIN user_preferences pref ON pref.user_id = u.id
             WHERE c.creation_kind = 'work' AND c.creation_id = $1
             ORDER BY u.id",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?
        .iter()
        .map(|r| OwnerView {
            user_id: r.get("user_id"),
            auto_approve_invitations: r.get("auto_approve"),
        })
        .collect();

        Ok(Some(ItemView {
            item: ItemRef::work(id),
            pseud_ids,
            owners,
        }))
    }

    async fn bookmark_view(&self, id: i64) -> Result<Option<ItemView>> {
        let row = sqlx::query(
            "SELECT b.pseud_id, p.user_id,
                    COALESCE(pref.auto_approve_invitations, false) AS auto_approve
             FROM bookmarks b
             JOIN pseuds p ON p.id = b.pseud_id
             LEFT JOIN user_preferences pref ON pref.user_id = p.user_id
             WHERE b.id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(row.map(|r| ItemView {
            item: ItemRef::bookmark(id),
            pseud_ids: HashSet::from([r.get::<i64, _>("pseud_id")]),
            owners: vec![OwnerView {
                user_id: r.get("user_id"),
                auto_approve_invitations: r.get("auto_approve"),
            }],
        }))
    }
}

#[async_trait]
impl ItemRepository for PgItemRepository {
    async fn item_view(&self, item: &ItemRef) -> Result<Option<ItemView>> {
        match item.kind {
            ItemKind::Work => self.work_view(item.id).await,
            ItemKind::Bookmark => self.bookmark_view(item.id).await,
        }
    }
}
