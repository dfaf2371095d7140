//! Core data models for the folio archive.
//!
//! These types are shared across all folio crates and represent the core
//! domain entities: collection memberships, the users and collections that
//! approve them, and the records the search layer resolves.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;

// =============================================================================
// APPROVAL STATUS
// =============================================================================

/// One side's approval state on a collection membership.
///
/// Stored as a nullable `SMALLINT` column; the wire values match the
/// historical encoding (rejected = -1, neutral = 0, approved = 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(i16)]
pub enum ApprovalStatus {
    Rejected = -1,
    Neutral = 0,
    Approved = 1,
}

impl ApprovalStatus {
    /// Form options as (label, value) pairs, neutral first.
    pub const OPTIONS: [(&'static str, i16); 3] =
        [("Neutral", 0), ("Approved", 1), ("Rejected", -1)];

    /// Decode a raw column value. Returns `None` for anything outside
    /// {-1, 0, 1}.
    pub fn from_raw(raw: i16) -> Option<Self> {
        match raw {
            -1 => Some(Self::Rejected),
            0 => Some(Self::Neutral),
            1 => Some(Self::Approved),
            _ => None,
        }
    }

    /// The stored column value.
    pub fn as_raw(self) -> i16 {
        self as i16
    }

    /// Human-readable label for form rendering.
    pub fn label(self) -> &'static str {
        match self {
            Self::Rejected => "Rejected",
            Self::Neutral => "Neutral",
            Self::Approved => "Approved",
        }
    }
}

// =============================================================================
// ITEMS
// =============================================================================

/// The closed set of collectable kinds.
///
/// Every kind is owner-capable: its records expose the users who own them,
/// which the approval rules consult.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Work,
    Bookmark,
}

impl ItemKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Work => "work",
            Self::Bookmark => "bookmark",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemKind {
    type Err = Error;

    /// Parse a kind identifier. Singular and plural forms are accepted;
    /// anything else is an `UnknownSearchKind` resolution error.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "work" | "works" => Ok(Self::Work),
            "bookmark" | "bookmarks" => Ok(Self::Bookmark),
            _ => Err(Error::UnknownSearchKind(s.to_string())),
        }
    }
}

/// A reference to one collectable item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemRef {
    pub kind: ItemKind,
    pub id: i64,
}

impl ItemRef {
    pub fn new(kind: ItemKind, id: i64) -> Self {
        Self { kind, id }
    }

    pub fn work(id: i64) -> Self {
        Self::new(ItemKind::Work, id)
    }

    pub fn bookmark(id: i64) -> Self {
        Self::new(ItemKind::Bookmark, id)
    }
}

impl fmt::Display for ItemRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.kind, self.id)
    }
}

// =============================================================================
// MEMBERSHIP
// =============================================================================

/// A membership linking one item to one collection.
///
/// The two approval sides are independent tri-state flags; neither
/// transitions through an ordered sequence, and a later approve/reject can
/// reach any value from any other.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Membership {
    pub id: i64,
    pub collection_id: i64,
    pub item: ItemRef,
    pub user_approval_status: Option<ApprovalStatus>,
    pub collection_approval_status: Option<ApprovalStatus>,
    pub created_at_utc: DateTime<Utc>,
    pub updated_at_utc: DateTime<Utc>,
}

impl Membership {
    pub fn approve_by_user(&mut self) {
        self.user_approval_status = Some(ApprovalStatus::Approved);
    }

    pub fn reject_by_user(&mut self) {
        self.user_approval_status = Some(ApprovalStatus::Rejected);
    }

    pub fn approve_by_collection(&mut self) {
        self.collection_approval_status = Some(ApprovalStatus::Approved);
    }

    pub fn reject_by_collection(&mut self) {
        self.collection_approval_status = Some(ApprovalStatus::Rejected);
    }

    pub fn approved_by_user(&self) -> bool {
        self.user_approval_status == Some(ApprovalStatus::Approved)
    }

    pub fn rejected_by_user(&self) -> bool {
        self.user_approval_status == Some(ApprovalStatus::Rejected)
    }

    pub fn approved_by_collection(&self) -> bool {
        self.collection_approval_status == Some(ApprovalStatus::Approved)
    }

    pub fn rejected_by_collection(&self) -> bool {
        self.collection_approval_status == Some(ApprovalStatus::Rejected)
    }

    /// Fully approved: both the owner side and the collection side.
    pub fn approved(&self) -> bool {
        self.approved_by_user() && self.approved_by_collection()
    }
}

// =============================================================================
// IDENTITY / ROLE VIEWS
// =============================================================================

/// A user and the pseuds (named identities) they may act under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub login: String,
    pub pseud_ids: HashSet<i64>,
}

impl User {
    /// Whether this user holds at least one of the given pseuds.
    pub fn holds_any_pseud(&self, pseud_ids: &HashSet<i64>) -> bool {
        !self.pseud_ids.is_disjoint(pseud_ids)
    }
}

/// The projection of a collection the approval rules consult.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionView {
    pub id: i64,
    /// URL-safe short name.
    pub name: String,
    /// Display title, used in user-facing messages.
    pub title: String,
    /// Closed collections accept no new items.
    pub closed: bool,
    /// Moderated collections require explicit maintainer approval.
    pub moderated: bool,
    /// Pseuds holding administrative rights over the collection.
    pub maintainer_pseud_ids: HashSet<i64>,
    /// Users permitted to contribute items.
    pub posting_participant_ids: HashSet<i64>,
}

impl CollectionView {
    /// Whether the user shares at least one pseud with the maintainer set.
    pub fn is_maintainer(&self, user: &User) -> bool {
        user.holds_any_pseud(&self.maintainer_pseud_ids)
    }

    pub fn is_posting_participant(&self, user_id: i64) -> bool {
        self.posting_participant_ids.contains(&user_id)
    }
}

/// One owner of an item, with the preference the auto-approval pass reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerView {
    pub user_id: i64,
    /// "Automatically approve collection invitations" preference.
    pub auto_approve_invitations: bool,
}

/// The projection of an item the approval rules consult.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemView {
    pub item: ItemRef,
    /// Pseuds credited on the item, not necessarily every pseud its owners hold.
    pub pseud_ids: HashSet<i64>,
    pub owners: Vec<OwnerView>,
}

impl ItemView {
    pub fn owned_by(&self, user_id: i64) -> bool {
        self.owners.iter().any(|o| o.user_id == user_id)
    }
}

// =============================================================================
// SEARCH-FACING RECORDS
// =============================================================================

/// A posted work as the search layer resolves it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Work {
    pub id: i64,
    pub title: String,
    pub restricted: bool,
    pub posted: bool,
    pub summary: Option<String>,
    pub created_at_utc: DateTime<Utc>,
}

/// A bookmark as the search layer resolves it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bookmark {
    pub id: i64,
    pub pseud_id: i64,
    pub notes: Option<String>,
    pub created_at_utc: DateTime<Utc>,
}
