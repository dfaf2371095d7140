//! Core traits for folio abstractions.
//!
//! These traits define the interfaces that concrete implementations
//! must satisfy, enabling pluggable backends and testability.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::*;

// =============================================================================
// MEMBERSHIP REPOSITORY
// =============================================================================

/// Data for a new membership row.
#[derive(Debug, Clone)]
pub struct NewMembership {
    pub collection_id: i64,
    pub item: ItemRef,
    pub user_approval_status: Option<ApprovalStatus>,
    pub collection_approval_status: Option<ApprovalStatus>,
}

/// Filter for membership listings (maintainer and owner review queues).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ApprovalFilter {
    #[default]
    All,
    /// Filter on the owner side's status.
    UserSide(ApprovalStatus),
    /// Filter on the collection side's status.
    CollectionSide(ApprovalStatus),
}

/// Repository for membership persistence.
#[async_trait]
pub trait MembershipRepository: Send + Sync {
    /// Unique-key lookup by `(collection_id, item.kind, item.id)`.
    async fn find(&self, collection_id: i64, item: &ItemRef) -> Result<Option<Membership>>;

    /// Insert a new membership.
    async fn create(&self, new: NewMembership) -> Result<Membership>;

    /// Persist both approval sides.
    async fn set_approval(
        &self,
        id: i64,
        user_status: Option<ApprovalStatus>,
        collection_status: Option<ApprovalStatus>,
    ) -> Result<()>;

    /// Fetch a membership by ID.
    async fn get(&self, id: i64) -> Result<Option<Membership>>;

    /// List a collection's memberships, optionally filtered by approval state.
    async fn list_for_collection(
        &self,
        collection_id: i64,
        filter: ApprovalFilter,
    ) -> Result<Vec<Membership>>;
}

// =============================================================================
// IDENTITY / ROLE COLLABORATORS
// =============================================================================

/// Read access to collection role data.
#[async_trait]
pub trait CollectionRepository: Send + Sync {
    /// Load the approval-relevant projection of a collection.
    async fn view(&self, id: i64) -> Result<Option<CollectionView>>;
}

/// Read access to item ownership data across every collectable kind.
#[async_trait]
pub trait ItemRepository: Send + Sync {
    /// Load the approval-relevant projection of an item.
    async fn item_view(&self, item: &ItemRef) -> Result<Option<ItemView>>;
}

/// Read access to users and their pseuds.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn get(&self, id: i64) -> Result<Option<User>>;
}

// =============================================================================
// SEARCH RESOLUTION SOURCES
// =============================================================================

/// Bulk fetch of stored records by ID for one record kind.
///
/// Results are grouped by ID; a single ID may in principle map to more
/// than one record.
#[async_trait]
pub trait RecordSource<R>: Send + Sync {
    async fn by_ids(&self, ids: &[i64]) -> Result<HashMap<i64, Vec<R>>>;
}

/// Bulk display-label resolution for facet terms.
///
/// IDs with no surviving entity are simply absent from the map.
#[async_trait]
pub trait LabelSource: Send + Sync {
    async fn labels(&self, ids: &[i64]) -> Result<HashMap<i64, String>>;
}
