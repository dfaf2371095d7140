//! Search collaborator types.
//!
//! The search index is an opaque collaborator: per query it returns a
//! ranked page of raw IDs, optional facet term counts, and pagination
//! metadata. These types model that page; resolving it against the backing
//! store lives in `folio-search`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// One ranked result record as the engine returns it.
///
/// The ID is raw text; the index does not know or care what it refers to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawHit {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
}

/// One `(term, count)` pair inside a facet category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetTerm {
    pub term: String,
    pub count: i64,
}

/// Pagination metadata delegated straight through to callers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    pub total_pages: i64,
    pub total_entries: i64,
    pub per_page: i64,
    pub offset: i64,
    pub current_page: i64,
}

/// One page of engine output.
///
/// `facets` is `None` when the query requested no facet data; that is
/// distinct from a query that requested facets and matched none.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub hits: Vec<RawHit>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facets: Option<BTreeMap<String, Vec<FacetTerm>>>,
    #[serde(default)]
    pub page: PageInfo,
}

impl SearchResponse {
    /// Parse a page from the engine's JSON payload.
    pub fn from_json(payload: &str) -> Result<Self> {
        Ok(serde_json::from_str(payload)?)
    }

    /// Raw hit IDs in relevance order.
    pub fn hit_ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.hits.iter().map(|hit| hit.id.as_str())
    }
}

/// A resolved, human-readable facet value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchFacet {
    /// The facet term as the engine returned it.
    pub id: String,
    /// The referenced entity's display label.
    pub name: String,
    pub count: i64,
}

impl SearchFacet {
    pub fn new(id: impl Into<String>, name: impl Into<String>, count: i64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            count,
        }
    }
}
