//! Approval rules for collection memberships.
//!
//! Each membership carries two independent tri-state flags: the owner side
//! and the collection side. The rules here decide which side an acting user
//! may flip, and what the one-shot auto-approval pass does right after a
//! submission is persisted. They are pure functions over collaborator
//! projections; persistence stays with the caller.

use tracing::debug;

use folio_core::{CollectionView, ItemView, Membership, User};

/// Approve on behalf of the acting user.
///
/// Sets the owner side when `user` is among the item's owners, and the
/// collection side when `user` shares at least one pseud with the
/// collection's maintainers. The checks are independent; either, both, or
/// neither may fire. An absent user, item, or collection leaves the
/// corresponding side untouched.
pub fn approve(
    membership: &mut Membership,
    user: Option<&User>,
    item: Option<&ItemView>,
    collection: Option<&CollectionView>,
) {
    if let (Some(user), Some(item)) = (user, item) {
        if item.owned_by(user.id) {
            membership.approve_by_user();
        }
    }
    if let (Some(user), Some(collection)) = (user, collection) {
        if collection.is_maintainer(user) {
            membership.approve_by_collection();
        }
    }
}

/// Reject on behalf of the acting user, symmetric to [`approve`].
///
/// An absent user is a no-op on both sides: with an explicit acting-user
/// parameter there is no one whose ownership or maintainership could match.
pub fn reject(
    membership: &mut Membership,
    user: Option<&User>,
    item: Option<&ItemView>,
    collection: Option<&CollectionView>,
) {
    if let (Some(user), Some(item)) = (user, item) {
        if item.owned_by(user.id) {
            membership.reject_by_user();
        }
    }
    if let (Some(user), Some(collection)) = (user, collection) {
        if collection.is_maintainer(user) {
            membership.reject_by_collection();
        }
    }
}

/// The one-shot pass run immediately after a submission is persisted.
///
/// 1. Approve with the acting user, who is the person who just added the
///    item and may be either an owner or a moderator.
/// 2. Approve for the collection when it is unmoderated, the acting user
///    maintains it, or the acting user is a posting participant sharing a
///    pseud credited on the item.
/// 3. Approve for the owner side when any owner auto-approves collection
///    invitations or is a posting participant; the first qualifying owner
///    wins and the scan stops.
pub fn auto_approve(
    membership: &mut Membership,
    acting: Option<&User>,
    item: Option<&ItemView>,
    collection: Option<&CollectionView>,
) {
    approve(membership, acting, item, collection);

    if let Some(collection) = collection {
        let participant_with_credit = match (acting, item) {
            (Some(user), Some(item)) => {
                collection.is_posting_participant(user.id) && user.holds_any_pseud(&item.pseud_ids)
            }
            _ => false,
        };
        let maintainer = acting.map(|u| collection.is_maintainer(u)).unwrap_or(false);

        if !collection.moderated || maintainer || participant_with_credit {
            membership.approve_by_collection();
        }
    }

    if let Some(item) = item {
        for owner in &item.owners {
            let participant = collection
                .map(|c| c.is_posting_participant(owner.user_id))
                .unwrap_or(false);
            if owner.auto_approve_invitations || participant {
                membership.approve_by_user();
                break;
            }
        }
    }

    debug!(
        subsystem = "approvals",
        component = "rules",
        op = "auto_approve",
        membership_id = membership.id,
        approved_by_user = membership.approved_by_user(),
        approved_by_collection = membership.approved_by_collection(),
        "Auto-approval pass complete"
    );
}
