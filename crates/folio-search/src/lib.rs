//! # folio-search
//!
//! Search result resolution for folio.
//!
//! The search index returns ranked raw IDs and facet term counts; this
//! crate turns one response page into stored records and labeled facet
//! values:
//! - `SearchRegistry` maps kind identifiers to typed record fetchers and
//!   facet categories to label sources
//! - `SearchResults` resolves hit IDs against the backing store in one
//!   bulk fetch, preserving relevance order and tolerating stale index
//!   entries
//!
//! ## Example
//!
//! ```rust,ignore
//! use folio_core::SearchResponse;
//! use folio_db::Database;
//! use folio_search::SearchRegistry;
//!
//! let db = Database::connect("postgres://localhost/folio").await?;
//! let registry = SearchRegistry::from_database(&db);
//!
//! let response = SearchResponse::from_json(&engine_payload)?;
//! let results = registry.work_results(response);
//! for work in results.items().await? {
//!     println!("{}", work.title);
//! }
//! ```

pub mod facets;
pub mod registry;
pub mod results;

// Re-export core types
pub use folio_core::*;

pub use registry::{FacetLabelRegistry, KindedResults, SearchRegistry};
pub use results::SearchResults;
