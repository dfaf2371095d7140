//! Resolution of one search response page against the backing store.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::OnceCell;
use tracing::{debug, trace};

use folio_core::{RecordSource, Result, SearchFacet, SearchResponse};

use crate::facets::resolve_category;
use crate::registry::FacetLabelRegistry;

/// A lazy view over one response page for one record kind.
///
/// `items` and `facets` are each computed once and cached for the life of
/// the instance. The caching matches the single-threaded-per-request model
/// this runs under; one instance is not meant to be shared across requests.
pub struct SearchResults<R> {
    response: SearchResponse,
    records: Arc<dyn RecordSource<R>>,
    labels: FacetLabelRegistry,
    items: OnceCell<Vec<R>>,
    facets: OnceCell<Option<BTreeMap<String, Vec<SearchFacet>>>>,
}

impl<R: Clone + Send + Sync> SearchResults<R> {
    pub fn new(
        response: SearchResponse,
        records: Arc<dyn RecordSource<R>>,
        labels: FacetLabelRegistry,
    ) -> Self {
        Self {
            response,
            records,
            labels,
            items: OnceCell::new(),
            facets: OnceCell::new(),
        }
    }

    /// The resolved records, in the response's relevance order.
    ///
    /// One bulk fetch resolves every hit ID; hit IDs with no stored record
    /// are dropped silently, tolerating drift between the index and the
    /// store. Computed on first call, cached after.
    pub async fn items(&self) -> Result<&[R]> {
        let items = self.items.get_or_try_init(|| self.resolve_items()).await?;
        Ok(items.as_slice())
    }

    /// Facet values with display labels, keyed by category.
    ///
    /// `None` when the response carries no facet data at all; a response
    /// with facet data but no matching terms yields an empty map instead.
    /// Terms whose entity no longer exists are dropped. Computed on first
    /// call, cached after.
    pub async fn facets(&self) -> Result<Option<&BTreeMap<String, Vec<SearchFacet>>>> {
        let facets = self.facets.get_or_try_init(|| self.resolve_facets()).await?;
        Ok(facets.as_ref())
    }

    pub async fn len(&self) -> Result<usize> {
        Ok(self.items().await?.len())
    }

    pub async fn is_empty(&self) -> Result<bool> {
        Ok(self.items().await?.is_empty())
    }

    pub async fn get(&self, index: usize) -> Result<Option<&R>> {
        Ok(self.items().await?.get(index))
    }

    /// The raw page this view wraps.
    pub fn response(&self) -> &SearchResponse {
        &self.response
    }

    // Pagination metadata, straight from the underlying response.

    pub fn total_pages(&self) -> i64 {
        self.response.page.total_pages
    }

    pub fn total_entries(&self) -> i64 {
        self.response.page.total_entries
    }

    pub fn per_page(&self) -> i64 {
        self.response.page.per_page
    }

    pub fn offset(&self) -> i64 {
        self.response.page.offset
    }

    pub fn current_page(&self) -> i64 {
        self.response.page.current_page
    }

    async fn resolve_items(&self) -> Result<Vec<R>> {
        let start = Instant::now();

        // Step through the hit list in order to preserve relevance ranking
        let ordered_ids: Vec<i64> = self
            .response
            .hit_ids()
            .filter_map(|raw| match raw.parse::<i64>() {
                Ok(id) => Some(id),
                Err(_) => {
                    trace!(
                        subsystem = "search",
                        component = "results",
                        hit_id = raw,
                        "Skipping unparsable hit ID"
                    );
                    None
                }
            })
            .collect();

        let mut seen = HashSet::new();
        let distinct: Vec<i64> = ordered_ids
            .iter()
            .copied()
            .filter(|id| seen.insert(*id))
            .collect();

        let grouped = self.records.by_ids(&distinct).await?;

        let mut items = Vec::with_capacity(ordered_ids.len());
        let mut dropped = 0usize;
        for id in &ordered_ids {
            match grouped.get(id) {
                Some(records) => items.extend(records.iter().cloned()),
                None => {
                    dropped += 1;
                    trace!(
                        subsystem = "search",
                        component = "results",
                        hit_id = id,
                        "Hit ID missing from store, dropping"
                    );
                }
            }
        }

        debug!(
            subsystem = "search",
            component = "results",
            op = "items",
            hit_count = self.response.hits.len(),
            result_count = items.len(),
            dropped_count = dropped,
            duration_ms = start.elapsed().as_millis() as u64,
            "Resolved search page"
        );
        Ok(items)
    }

    async fn resolve_facets(&self) -> Result<Option<BTreeMap<String, Vec<SearchFacet>>>> {
        let Some(raw) = &self.response.facets else {
            return Ok(None);
        };

        let mut resolved = BTreeMap::new();
        for (category, terms) in raw {
            let source = self.labels.resolve(category)?;
            let facets = resolve_category(source.as_ref(), terms).await?;
            debug!(
                subsystem = "search",
                component = "results",
                op = "facets",
                facet_category = category.as_str(),
                facet_count = facets.len(),
                "Resolved facet category"
            );
            resolved.insert(category.clone(), facets);
        }
        Ok(Some(resolved))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use folio_core::{Error, FacetTerm, LabelSource, PageInfo, RawHit};

    use super::*;

    /// Record store fake: any ID it was seeded with resolves, counting calls.
    struct SeededStore {
        rows: HashMap<i64, Vec<&'static str>>,
        calls: AtomicUsize,
    }

    impl SeededStore {
        fn new(rows: &[(i64, &'static str)]) -> Self {
            let mut map: HashMap<i64, Vec<&'static str>> = HashMap::new();
            for (id, name) in rows {
                map.entry(*id).or_default().push(name);
            }
            Self {
                rows: map,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl RecordSource<&'static str> for SeededStore {
        async fn by_ids(&self, ids: &[i64]) -> Result<HashMap<i64, Vec<&'static str>>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(ids
                .iter()
                .filter_map(|id| self.rows.get(id).map(|rows| (*id, rows.clone())))
                .collect())
        }
    }

    struct SeededLabels(HashMap<i64, String>);

    #[async_trait]
    impl LabelSource for SeededLabels {
        async fn labels(&self, ids: &[i64]) -> Result<HashMap<i64, String>> {
            Ok(ids
                .iter()
                .filter_map(|id| self.0.get(id).map(|label| (*id, label.clone())))
                .collect())
        }
    }

    fn response(ids: &[&str]) -> SearchResponse {
        SearchResponse {
            hits: ids
                .iter()
                .map(|id| RawHit {
                    id: id.to_string(),
                    score: None,
                })
                .collect(),
            facets: None,
            page: PageInfo {
                total_pages: 2,
                total_entries: 27,
                per_page: 20,
                offset: 0,
                current_page: 1,
            },
        }
    }

    fn results(
        response: SearchResponse,
        store: Arc<SeededStore>,
        labels: FacetLabelRegistry,
    ) -> SearchResults<&'static str> {
        SearchResults::new(response, store, labels)
    }

    #[tokio::test]
    async fn items_preserve_relevance_order_and_drop_missing_ids() {
        let store = Arc::new(SeededStore::new(&[(3, "three"), (5, "five")]));
        let r = results(response(&["5", "3", "9"]), store, FacetLabelRegistry::new());

        assert_eq!(r.items().await.unwrap(), &["five", "three"]);
    }

    #[tokio::test]
    async fn items_fetch_from_store_exactly_once() {
        let store = Arc::new(SeededStore::new(&[(1, "one")]));
        let r = results(response(&["1"]), store.clone(), FacetLabelRegistry::new());

        r.items().await.unwrap();
        r.items().await.unwrap();
        assert_eq!(r.len().await.unwrap(), 1);
        assert_eq!(store.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn duplicate_hit_ids_resolve_at_each_position() {
        let store = Arc::new(SeededStore::new(&[(4, "four"), (2, "two")]));
        let r = results(response(&["4", "2", "4"]), store, FacetLabelRegistry::new());

        assert_eq!(r.items().await.unwrap(), &["four", "two", "four"]);
    }

    #[tokio::test]
    async fn grouped_ids_flatten_in_order() {
        // Two records behind one ID, e.g. a store that groups revisions
        let store = Arc::new(SeededStore::new(&[(6, "a"), (6, "b"), (1, "one")]));
        let r = results(response(&["6", "1"]), store, FacetLabelRegistry::new());

        assert_eq!(r.items().await.unwrap(), &["a", "b", "one"]);
    }

    #[tokio::test]
    async fn unparsable_hit_ids_are_skipped() {
        let store = Arc::new(SeededStore::new(&[(7, "seven")]));
        let r = results(
            response(&["7", "not-a-number"]),
            store,
            FacetLabelRegistry::new(),
        );

        assert_eq!(r.items().await.unwrap(), &["seven"]);
    }

    #[tokio::test]
    async fn collection_protocol_reads_resolved_items() {
        let store = Arc::new(SeededStore::new(&[(1, "one"), (2, "two")]));
        let r = results(response(&["2", "1"]), store, FacetLabelRegistry::new());

        assert!(!r.is_empty().await.unwrap());
        assert_eq!(r.len().await.unwrap(), 2);
        assert_eq!(r.get(0).await.unwrap(), Some(&"two"));
        assert_eq!(r.get(5).await.unwrap(), None);
    }

    #[tokio::test]
    async fn empty_page_resolves_empty() {
        let store = Arc::new(SeededStore::new(&[]));
        let r = results(response(&[]), store, FacetLabelRegistry::new());

        assert!(r.is_empty().await.unwrap());
    }

    #[test]
    fn pagination_delegates_to_the_response() {
        let store = Arc::new(SeededStore::new(&[]));
        let r = results(response(&[]), store, FacetLabelRegistry::new());

        assert_eq!(r.total_pages(), 2);
        assert_eq!(r.total_entries(), 27);
        assert_eq!(r.per_page(), 20);
        assert_eq!(r.offset(), 0);
        assert_eq!(r.current_page(), 1);
    }

    #[tokio::test]
    async fn facets_absent_when_response_has_none() {
        let store = Arc::new(SeededStore::new(&[]));
        let r = results(response(&[]), store, FacetLabelRegistry::new());

        assert_eq!(r.facets().await.unwrap(), None);
    }

    #[tokio::test]
    async fn facets_present_but_empty_is_an_empty_map() {
        let store = Arc::new(SeededStore::new(&[]));
        let mut resp = response(&[]);
        resp.facets = Some(BTreeMap::new());
        let r = results(resp, store, FacetLabelRegistry::new());

        let facets = r.facets().await.unwrap().expect("facets should be present");
        assert!(facets.is_empty());
    }

    #[tokio::test]
    async fn facets_resolve_labels_and_skip_missing_entities() {
        let store = Arc::new(SeededStore::new(&[]));
        let labels = FacetLabelRegistry::new().with(
            "fandom",
            Arc::new(SeededLabels(HashMap::from([(10, "Stargate SG-1".to_string())]))),
        );

        let mut resp = response(&[]);
        resp.facets = Some(BTreeMap::from([(
            "fandom".to_string(),
            vec![
                FacetTerm {
                    term: "10".to_string(),
                    count: 4,
                },
                FacetTerm {
                    term: "11".to_string(),
                    count: 2,
                },
            ],
        )]));
        let r = results(resp, store, labels);

        let facets = r.facets().await.unwrap().unwrap();
        assert_eq!(
            facets["fandom"],
            vec![SearchFacet::new("10", "Stargate SG-1", 4)]
        );
    }

    #[tokio::test]
    async fn facets_with_unregistered_category_error() {
        let store = Arc::new(SeededStore::new(&[]));
        let mut resp = response(&[]);
        resp.facets = Some(BTreeMap::from([(
            "warnings".to_string(),
            vec![FacetTerm {
                term: "1".to_string(),
                count: 1,
            }],
        )]));
        let r = results(resp, store, FacetLabelRegistry::new());

        match r.facets().await {
            Err(Error::UnknownFacetCategory(category)) => assert_eq!(category, "warnings"),
            _ => panic!("expected UnknownFacetCategory"),
        }
    }
}
