//! # folio-db
//!
//! PostgreSQL database layer for folio.
//!
//! This crate provides:
//! - Connection pool management
//! - Repository implementations for memberships, collections, users, and items
//! - Record and label sources backing search result resolution
//!
//! ## Example
//!
//! ```rust,ignore
//! use folio_core::{ItemRef, MembershipRepository};
//! use folio_db::Database;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("postgres://localhost/folio").await?;
//!
//!     let existing = db.memberships.find(collection_id, &ItemRef::work(work_id)).await?;
//!     println!("already in collection: {}", existing.is_some());
//!     Ok(())
//! }
//! ```

pub mod bookmarks;
pub mod collections;
pub mod items;
pub mod memberships;
pub mod pool;
pub mod tags;
pub mod users;
pub mod works;

// Test fixtures for integration tests; needs a live Postgres, so only
// compiled when the integration-tests feature is on.
#[cfg(feature = "integration-tests")]
pub mod test_fixtures;

// Re-export core types
pub use folio_core::*;

// Re-export repository implementations
pub use bookmarks::PgBookmarkRepository;
pub use collections::PgCollectionRepository;
pub use items::PgItemRepository;
pub use memberships::PgMembershipRepository;
pub use pool::{create_pool, create_pool_with_config, PoolConfig};
pub use tags::PgTagLabels;
pub use users::PgUserRepository;
pub use works::PgWorkRepository;

/// Combined database context with all repositories.
#[derive(Clone)]
pub struct Database {
    /// The underlying connection pool.
    pub pool: sqlx::Pool<sqlx::Postgres>,
    /// Membership repository for the approval workflow.
    pub memberships: PgMembershipRepository,
    /// Collection role data and `collection` facet labels.
    pub collections: PgCollectionRepository,
    /// Users and their pseuds.
    pub users: PgUserRepository,
    /// Item ownership views across collectable kinds.
    pub items: PgItemRepository,
    /// Work records for search resolution.
    pub works: PgWorkRepository,
    /// Bookmark records for search resolution.
    pub bookmarks: PgBookmarkRepository,
    /// Tag labels for facet resolution.
    pub tags: PgTagLabels,
}

impl Database {
    /// Create a new Database instance from a connection pool.
    pub fn new(pool: sqlx::Pool<sqlx::Postgres>) -> Self {
        Self {
            memberships: PgMembershipRepository::new(pool.clone()),
            collections: PgCollectionRepository::new(pool.clone()),
            users: PgUserRepository::new(pool.clone()),
            items: PgItemRepository::new(pool.clone()),
            works: PgWorkRepository::new(pool.clone()),
            bookmarks: PgBookmarkRepository::new(pool.clone()),
            tags: PgTagLabels::new(pool.clone()),
            pool,
        }
    }

    /// Connect with default pool configuration.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = create_pool(database_url).await?;
        Ok(Self::new(pool))
    }
}
