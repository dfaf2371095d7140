//! Membership submission service.
//!
//! The service is the explicit caller-side replacement for persistence
//! lifecycle hooks: it validates a submission, inserts the membership, runs
//! the auto-approval pass exactly once, and persists the resulting
//! statuses. Atomicity across the insert and the status write relies on the
//! surrounding persistence transaction; the service itself adds no locking
//! and is meant for single-threaded-per-request use.

use std::sync::Arc;

use tracing::{debug, info};

use folio_core::{
    ApprovalFilter, ApprovalStatus, CollectionRepository, Error, ItemRef, ItemRepository,
    Membership, MembershipRepository, NewMembership, Result, UserRepository, ValidationErrors,
    ValidationFailure,
};

use crate::rules;

/// A request to add an item to a collection.
#[derive(Debug, Clone)]
pub struct SubmitRequest {
    pub collection_id: i64,
    pub item: ItemRef,
    /// Raw owner-side status, validated against {-1, 0, 1} when present.
    pub user_approval_status: Option<i16>,
    /// Raw collection-side status, validated against {-1, 0, 1} when present.
    pub collection_approval_status: Option<i16>,
}

impl SubmitRequest {
    pub fn new(collection_id: i64, item: ItemRef) -> Self {
        Self {
            collection_id,
            item,
            user_approval_status: None,
            collection_approval_status: None,
        }
    }
}

/// Orchestrates membership submission and review actions.
pub struct MembershipService {
    memberships: Arc<dyn MembershipRepository>,
    collections: Arc<dyn CollectionRepository>,
    items: Arc<dyn ItemRepository>,
    users: Arc<dyn UserRepository>,
}

impl MembershipService {
    pub fn new(
        memberships: Arc<dyn MembershipRepository>,
        collections: Arc<dyn CollectionRepository>,
        items: Arc<dyn ItemRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            memberships,
            collections,
            items,
            users,
        }
    }

    /// Wire the service against the PostgreSQL repositories.
    pub fn from_database(db: &folio_db::Database) -> Self {
        Self::new(
            Arc::new(db.memberships.clone()),
            Arc::new(db.collections.clone()),
            Arc::new(db.items.clone()),
            Arc::new(db.users.clone()),
        )
    }

    /// Submit an item to a collection on behalf of `acting_user_id`.
    ///
    /// Validates first, collecting every failure before reporting; nothing
    /// is persisted on a validation error. On success the auto-approval
    /// pass runs once and the final statuses are written back.
    pub async fn submit(
        &self,
        req: SubmitRequest,
        acting_user_id: Option<i64>,
    ) -> Result<Membership> {
        let acting = match acting_user_id {
            Some(id) => self.users.get(id).await?,
            None => None,
        };
        let collection = self.collections.view(req.collection_id).await?;
        let item = self.items.item_view(&req.item).await?;

        let mut errors = ValidationErrors::new();
        let user_status = validate_status(req.user_approval_status, &mut errors);
        let collection_status = validate_status(req.collection_approval_status, &mut errors);

        if self
            .memberships
            .find(req.collection_id, &req.item)
            .await?
            .is_some()
        {
            errors.push(ValidationFailure::AlreadyInCollection);
        }

        if let Some(collection) = &collection {
            if collection.closed {
                errors.push(ValidationFailure::CollectionClosed {
                    title: collection.title.clone(),
                });
            }
        }

        if !errors.is_empty() {
            debug!(
                subsystem = "approvals",
                component = "membership_service",
                op = "submit",
                collection_id = req.collection_id,
                item_kind = %req.item.kind,
                item_id = req.item.id,
                error = %errors,
                "Submission rejected"
            );
            return Err(Error::Validation(errors));
        }

        let mut membership = self
            .memberships
            .create(NewMembership {
                collection_id: req.collection_id,
                item: req.item,
                user_approval_status: user_status,
                collection_approval_status: collection_status,
            })
            .await?;

        rules::auto_approve(
            &mut membership,
            acting.as_ref(),
            item.as_ref(),
            collection.as_ref(),
        );
        self.memberships
            .set_approval(
                membership.id,
                membership.user_approval_status,
                membership.collection_approval_status,
            )
            .await?;

        info!(
            subsystem = "approvals",
            component = "membership_service",
            op = "submit",
            membership_id = membership.id,
            collection_id = membership.collection_id,
            item_kind = %membership.item.kind,
            item_id = membership.item.id,
            approved_by_user = membership.approved_by_user(),
            approved_by_collection = membership.approved_by_collection(),
            "Membership created"
        );
        Ok(membership)
    }

    /// Approve a membership on behalf of an acting user.
    pub async fn approve(&self, membership_id: i64, acting_user_id: i64) -> Result<Membership> {
        self.review(membership_id, acting_user_id, rules::approve)
            .await
    }

    /// Reject a membership on behalf of an acting user.
    pub async fn reject(&self, membership_id: i64, acting_user_id: i64) -> Result<Membership> {
        self.review(membership_id, acting_user_id, rules::reject)
            .await
    }

    /// A collection's memberships, optionally filtered by approval state.
    pub async fn list_for_collection(
        &self,
        collection_id: i64,
        filter: ApprovalFilter,
    ) -> Result<Vec<Membership>> {
        self.memberships
            .list_for_collection(collection_id, filter)
            .await
    }

    async fn review(
        &self,
        membership_id: i64,
        acting_user_id: i64,
        rule: impl Fn(
            &mut Membership,
            Option<&folio_core::User>,
            Option<&folio_core::ItemView>,
            Option<&folio_core::CollectionView>,
        ),
    ) -> Result<Membership> {
        let mut membership = self
            .memberships
            .get(membership_id)
            .await?
            .ok_or(Error::MembershipNotFound(membership_id))?;
        let acting = self
            .users
            .get(acting_user_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("user {acting_user_id}")))?;
        let collection = self.collections.view(membership.collection_id).await?;
        let item = self.items.item_view(&membership.item).await?;

        rule(
            &mut membership,
            Some(&acting),
            item.as_ref(),
            collection.as_ref(),
        );
        self.memberships
            .set_approval(
                membership.id,
                membership.user_approval_status,
                membership.collection_approval_status,
            )
            .await?;
        Ok(membership)
    }
}

fn validate_status(raw: Option<i16>, errors: &mut ValidationErrors) -> Option<ApprovalStatus> {
    match raw {
        None => None,
        Some(value) => match ApprovalStatus::from_raw(value) {
            Some(status) => Some(status),
            None => {
                errors.push(ValidationFailure::InvalidStatus(value));
                None
            }
        },
    }
}
