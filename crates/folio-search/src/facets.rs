//! Facet term resolution.

use folio_core::{FacetTerm, LabelSource, Result, SearchFacet};
use tracing::trace;

/// Resolve one category's terms into labeled facet values.
///
/// One bulk label fetch covers the whole term list; the output keeps the
/// engine's term order. Terms that do not parse as IDs or whose entity no
/// longer exists are dropped.
pub async fn resolve_category(
    source: &dyn LabelSource,
    terms: &[FacetTerm],
) -> Result<Vec<SearchFacet>> {
    let ids: Vec<i64> = terms
        .iter()
        .filter_map(|term| term.term.parse::<i64>().ok())
        .collect();
    let labels = source.labels(&ids).await?;

    let mut facets = Vec::with_capacity(terms.len());
    for term in terms {
        let Ok(id) = term.term.parse::<i64>() else {
            continue;
        };
        match labels.get(&id) {
            Some(name) => facets.push(SearchFacet::new(term.term.clone(), name.clone(), term.count)),
            None => {
                trace!(
                    subsystem = "search",
                    component = "facets",
                    term = term.term.as_str(),
                    "Facet term missing from store, dropping"
                );
            }
        }
    }
    Ok(facets)
}
