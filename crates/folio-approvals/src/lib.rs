//! # folio-approvals
//!
//! Collection-membership approval workflow for folio.
//!
//! This crate provides:
//! - The approval rules: who may approve or reject a membership, and the
//!   auto-approval pass that runs once after a submission is persisted
//! - `MembershipService`, the submission entry point that validates,
//!   inserts, and applies the auto-approval pass
//!
//! ## Example
//!
//! ```rust,ignore
//! use folio_approvals::{MembershipService, SubmitRequest};
//! use folio_core::ItemRef;
//! use folio_db::Database;
//!
//! let db = Database::connect("postgres://localhost/folio").await?;
//! let service = MembershipService::from_database(&db);
//!
//! let membership = service
//!     .submit(SubmitRequest::new(collection_id, ItemRef::work(work_id)), Some(user_id))
//!     .await?;
//! assert!(membership.approved_by_user());
//! ```

pub mod rules;
pub mod service;

// Re-export core types
pub use folio_core::*;

pub use service::{MembershipService, SubmitRequest};
