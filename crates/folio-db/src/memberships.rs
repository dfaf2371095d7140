//! Membership repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row};
use tracing::debug;

use folio_core::{
    ApprovalFilter, ApprovalStatus, Error, ItemKind, ItemRef, Membership, MembershipRepository,
    NewMembership, Result,
};

/// PostgreSQL implementation of MembershipRepository.
///
/// Rows live in `collection_items`; a unique index on
/// `(collection_id, item_kind, item_id)` backs the membership uniqueness
/// invariant against concurrent submitters.
#[derive(Clone)]
pub struct PgMembershipRepository {
    pool: Pool<Postgres>,
}

impl PgMembershipRepository {
    /// Create a new PgMembershipRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

const SELECT_COLUMNS: &str = "id, collection_id, item_kind, item_id, \
     user_approval_status, collection_approval_status, created_at_utc, updated_at_utc";

fn membership_from_row(row: &PgRow) -> Result<Membership> {
    let kind: String = row.get("item_kind");
    let kind = kind
        .parse::<ItemKind>()
        .map_err(|_| Error::Internal(format!("unexpected item_kind in collection_items: {kind}")))?;

    Ok(Membership {
        id: row.get("id"),
        collection_id: row.get("collection_id"),
        item: ItemRef::new(kind, row.get("item_id")),
        user_approval_status: row
            .get::<Option<i16>, _>("user_approval_status")
            .and_then(ApprovalStatus::from_raw),
        collection_approval_status: row
            .get::<Option<i16>, _>("collection_approval_status")
            .and_then(ApprovalStatus::from_raw),
        created_at_utc: row.get("created_at_utc"),
        updated_at_utc: row.get("updated_at_utc"),
    })
}

#[async_trait]
impl MembershipRepository for PgMembershipRepository {
    async fn find(&self, collection_id: i64, item: &ItemRef) -> Result<Option<Membership>> {
        let row = sqlx::query(&format!(
            "SELECT {SELECT_COLUMNS} FROM collection_items
             WHERE collection_id = $1 AND item_kind = $2 AND item_id = $3"
        ))
        .bind(collection_id)
        .bind(item.kind.as_str())
        .bind(item.id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        row.as_ref().map(membership_from_row).transpose()
    }

    async fn create(&self, new: NewMembership) -> Result<Membership> {
        let now = Utc::now();

        // The unique index is the last line of defense; the service checks
        // for duplicates before calling in.
        let row = sqlx::query(&format!(
            "INSERT INTO collection_items
                 (collection_id, item_kind, item_id,
                  user_approval_status, collection_approval_status,
                  created_at_utc, updated_at_utc)
             VALUES ($1, $2, $3, $4, $5, $6, $6)
             RETURNING {SELECT_COLUMNS}"
        ))
        .bind(new.collection_id)
        .bind(new.item.kind.as_str())
        .bind(new.item.id)
        .bind(new.user_approval_status.map(ApprovalStatus::as_raw))
        .bind(new.collection_approval_status.map(ApprovalStatus::as_raw))
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(Error::Database)?;

        let membership = membership_from_row(&row)?;
        debug!(
            subsystem = "db",
            component = "memberships",
            op = "create",
            db_table = "collection_items",
            membership_id = membership.id,
            collection_id = membership.collection_id,
            item_kind = %membership.item.kind,
            item_id = membership.item.id,
            "Membership row inserted"
        );
        Ok(membership)
    }

    async fn set_approval(
        &self,
        id: i64,
        user_status: Option<ApprovalStatus>,
        collection_status: Option<ApprovalStatus>,
    ) -> Result<()> {
        let result = sqlx::query(
            "UPDATE collection_items
             SET user_approval_status = $1, collection_approval_status = $2, updated_at_utc = $3
             WHERE id = $4",
        )
        .bind(user_status.map(ApprovalStatus::as_raw))
        .bind(collection_status.map(ApprovalStatus::as_raw))
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::MembershipNotFound(id));
        }
        Ok(())
    }

    async fn get(&self, id: i64) -> Result<Option<Membership>> {
        let row = sqlx::query(&format!(
            "SELECT {SELECT_COLUMNS} FROM collection_items WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        row.as_ref().map(membership_from_row).transpose()
    }

    async fn list_for_collection(
        &self,
        collection_id: i64,
        filter: ApprovalFilter,
    ) -> Result<Vec<Membership>> {
        let mut sql = format!(
            "SELECT {SELECT_COLUMNS} FROM collection_items WHERE collection_id = $1"
        );
        sql.push_str(approval_clause(filter));
        sql.push_str(" ORDER BY created_at_utc, id");

        let mut query = sqlx::query(&sql).bind(collection_id);
        if let ApprovalFilter::UserSide(status) | ApprovalFilter::CollectionSide(status) = filter {
            query = query.bind(status.as_raw());
        }

        let rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)?;

        rows.iter().map(membership_from_row).collect()
    }
}

/// Filter clause for membership listings. A NULL status matches no filter.
fn approval_clause(filter: ApprovalFilter) -> &'static str {
    match filter {
        ApprovalFilter::All => "",
        ApprovalFilter::UserSide(_) => " AND user_approval_status = $2",
        ApprovalFilter::CollectionSide(_) => " AND collection_approval_status = $2",
    }
}
