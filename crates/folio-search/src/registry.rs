//! Kind and facet-category registries.
//!
//! The engine identifies what it indexed by name: a kind identifier per
//! query ("works") and a category name per facet ("fandom"). Both resolve
//! through an explicit registry over a closed set of names; an unknown
//! name is a resolution error, never reflection.

use std::collections::HashMap;
use std::sync::Arc;

use folio_core::{
    Bookmark, Error, ItemKind, LabelSource, RecordSource, Result, SearchResponse, Work,
};

use crate::results::SearchResults;

/// Maps facet category names to the label sources that resolve their terms.
#[derive(Clone, Default)]
pub struct FacetLabelRegistry {
    sources: HashMap<String, Arc<dyn LabelSource>>,
}

impl FacetLabelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a label source for a category, builder-style.
    pub fn with(mut self, category: impl Into<String>, source: Arc<dyn LabelSource>) -> Self {
        self.sources.insert(category.into(), source);
        self
    }

    /// Resolve a category name to its label source.
    pub fn resolve(&self, category: &str) -> Result<&Arc<dyn LabelSource>> {
        self.sources
            .get(category)
            .ok_or_else(|| Error::UnknownFacetCategory(category.to_string()))
    }

    /// The registered category names, in no particular order.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.sources.keys().map(String::as_str)
    }
}

/// Typed record fetchers for every searchable kind, plus facet labels.
#[derive(Clone)]
pub struct SearchRegistry {
    works: Arc<dyn RecordSource<Work>>,
    bookmarks: Arc<dyn RecordSource<Bookmark>>,
    labels: FacetLabelRegistry,
}

/// One response page resolved under the kind the caller named.
pub enum KindedResults {
    Works(SearchResults<Work>),
    Bookmarks(SearchResults<Bookmark>),
}

impl SearchRegistry {
    pub fn new(
        works: Arc<dyn RecordSource<Work>>,
        bookmarks: Arc<dyn RecordSource<Bookmark>>,
        labels: FacetLabelRegistry,
    ) -> Self {
        Self {
            works,
            bookmarks,
            labels,
        }
    }

    /// Wire the registry against the PostgreSQL repositories.
    ///
    /// The tag table labels the fandom/character/relationship/freeform
    /// facet categories; the collection facet labels from collections.
    pub fn from_database(db: &folio_db::Database) -> Self {
        let tags: Arc<dyn LabelSource> = Arc::new(db.tags.clone());
        let labels = FacetLabelRegistry::new()
            .with("fandom", tags.clone())
            .with("character", tags.clone())
            .with("relationship", tags.clone())
            .with("freeform", tags)
            .with("collection", Arc::new(db.collections.clone()));
        Self::new(
            Arc::new(db.works.clone()),
            Arc::new(db.bookmarks.clone()),
            labels,
        )
    }

    /// Resolve a kind identifier and wrap the response for that kind.
    pub fn results(&self, kind: &str, response: SearchResponse) -> Result<KindedResults> {
        Ok(match kind.parse::<ItemKind>()? {
            ItemKind::Work => KindedResults::Works(self.work_results(response)),
            ItemKind::Bookmark => KindedResults::Bookmarks(self.bookmark_results(response)),
        })
    }

    pub fn work_results(&self, response: SearchResponse) -> SearchResults<Work> {
        SearchResults::new(response, self.works.clone(), self.labels.clone())
    }

    pub fn bookmark_results(&self, response: SearchResponse) -> SearchResults<Bookmark> {
        SearchResults::new(response, self.bookmarks.clone(), self.labels.clone())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use async_trait::async_trait;
    use folio_core::PageInfo;

    use super::*;

    struct EmptySource;

    #[async_trait]
    impl<R: Send + 'static> RecordSource<R> for EmptySource {
        async fn by_ids(&self, _ids: &[i64]) -> Result<HashMap<i64, Vec<R>>> {
            Ok(HashMap::new())
        }
    }

    fn registry() -> SearchRegistry {
        SearchRegistry::new(
            Arc::new(EmptySource),
            Arc::new(EmptySource),
            FacetLabelRegistry::new(),
        )
    }

    fn response() -> SearchResponse {
        SearchResponse {
            hits: vec![],
            facets: None,
            page: PageInfo::default(),
        }
    }

    #[test]
    fn resolves_known_kind_identifiers() {
        assert!(matches!(
            registry().results("works", response()),
            Ok(KindedResults::Works(_))
        ));
        assert!(matches!(
            registry().results("bookmark", response()),
            Ok(KindedResults::Bookmarks(_))
        ));
    }

    #[test]
    fn rejects_unknown_kind_identifier() {
        match registry().results("chapters", response()) {
            Err(Error::UnknownSearchKind(kind)) => assert_eq!(kind, "chapters"),
            _ => panic!("expected UnknownSearchKind"),
        }
    }

    #[test]
    fn label_registry_rejects_unknown_category() {
        let labels = FacetLabelRegistry::new();
        match labels.resolve("warnings") {
            Err(Error::UnknownFacetCategory(category)) => assert_eq!(category, "warnings"),
            _ => panic!("expected UnknownFacetCategory"),
        }
    }
}
