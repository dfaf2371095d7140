//! User repository implementation.

use std::collections::HashSet;

use async_trait::async_trait;
use sqlx::{Pool, Postgres, Row};

use folio_core::{Error, Result, User, UserRepository};

/// PostgreSQL implementation of UserRepository.
#[derive(Clone)]
pub struct PgUserRepository {
    pool: Pool<Postgres>,
}

impl PgUserRepository {
    /// Create a new PgUserRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn get(&self, id: i64) -> Result<Option<User>> {
        let row = sqlx::query("SELECT id, login FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?;

        let Some(row) = row else {
            return Ok(None);
        };

        let pseud_ids: HashSet<i64> = sqlx::query("SELECT id FROM pseuds WHERE user_id = $1")
            .bind(id)
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)?
            .iter()
            .map(|r| r.get("id"))
            .collect();

        Ok(Some(User {
            id: row.get("id"),
            login: row.get("login"),
            pseud_ids,
        }))
    }
}
