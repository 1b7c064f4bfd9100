//! Client-side search over already loaded listings.

use super::scorer::{ApproximateScorer, Scorer, Searchable};
use std::sync::Arc;

/// Filters and ranks an in-memory collection against a free-text query.
///
/// Cheap to clone; the scorer is shared.
#[derive(Clone)]
pub struct SearchFilter {
    scorer: Arc<dyn Scorer>,
}

impl std::fmt::Debug for SearchFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchFilter").finish_non_exhaustive()
    }
}

impl Default for SearchFilter {
    fn default() -> Self {
        Self::new(ApproximateScorer::default())
    }
}

impl SearchFilter {
    /// Creates a filter using `scorer`.
    pub fn new(scorer: impl Scorer + 'static) -> Self {
        Self {
            scorer: Arc::new(scorer),
        }
    }

    /// Returns the items matching `query`, most similar first.
    ///
    /// A blank query returns `items` unchanged. Otherwise items without a match are
    /// dropped and the rest are sorted by ascending distance; ties keep their
    /// original order, so the result is deterministic.
    ///
    /// # Examples
    ///
    /// ```
    /// use service_finder::search::SearchFilter;
    /// use service_finder::Service;
    ///
    /// let listing = |id: i64, name: &str| -> Service {
    ///     serde_json::from_value(serde_json::json!({ "service_id": id, "name": name })).unwrap()
    /// };
    /// let services = vec![listing(1, "Plumbing Fix"), listing(2, "House Cleaning")];
    ///
    /// let filter = SearchFilter::default();
    /// let hits = filter.apply(&services, "plumbin");
    /// assert_eq!(hits.len(), 1);
    /// assert_eq!(hits[0].service_id, 1);
    /// assert_eq!(filter.apply(&services, "").len(), 2);
    /// ```
    #[must_use]
    pub fn apply<T: Searchable + Clone>(&self, items: &[T], query: &str) -> Vec<T> {
        let _span = tracing::debug_span!("apply_search_filter", total = items.len(), query_len = query.len())
            .entered();

        if query.trim().is_empty() {
            return items.to_vec();
        }

        let mut ranked: Vec<(f64, &T)> = items
            .iter()
            .filter_map(|item| self.scorer.score(query, item).map(|distance| (distance, item)))
            .collect();
        ranked.sort_by(|a, b| a.0.total_cmp(&b.0));

        tracing::debug!(matched = ranked.len(), "search filter applied");
        ranked.into_iter().map(|(_, item)| item.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Service;
    use crate::search::SkimScorer;

    fn listing(id: i64, name: &str, category: &str, description: &str) -> Service {
        serde_json::from_value(serde_json::json!({
            "service_id": id,
            "name": name,
            "category": category,
            "description": description,
        }))
        .unwrap()
    }

    fn catalog() -> Vec<Service> {
        vec![
            listing(1, "Plumbing Fix", "plumbing", "Leaks and blocked drains"),
            listing(2, "House Cleaning", "cleaning", "Weekly home cleaning"),
            listing(3, "Math Tutor", "teaching", "Algebra for school kids"),
        ]
    }

    #[test]
    fn blank_query_is_identity() {
        let services = catalog();
        assert_eq!(SearchFilter::default().apply(&services, "   "), services);
    }

    #[test]
    fn no_match_is_empty_not_error() {
        assert!(SearchFilter::default().apply(&catalog(), "xyz123notfound").is_empty());
    }

    #[test]
    fn description_and_category_are_searched() {
        let filter = SearchFilter::default();
        let by_description = filter.apply(&catalog(), "algebra");
        assert_eq!(by_description.len(), 1);
        assert_eq!(by_description[0].service_id, 3);

        let by_category = filter.apply(&catalog(), "teaching");
        assert_eq!(by_category[0].service_id, 3);
    }

    #[test]
    fn closer_matches_rank_first() {
        let services = vec![
            listing(1, "Cleanng crew", "", ""),
            listing(2, "Cleaning crew", "", ""),
        ];
        let ranked = SearchFilter::default().apply(&services, "cleaning");
        let ids: Vec<i64> = ranked.iter().map(|s| s.service_id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn ties_keep_input_order() {
        let services = vec![
            listing(5, "Wall painting", "painting", ""),
            listing(4, "Door painting", "painting", ""),
        ];
        let ids: Vec<i64> = SearchFilter::default()
            .apply(&services, "painting")
            .iter()
            .map(|s| s.service_id)
            .collect();
        assert_eq!(ids, vec![5, 4]);
    }

    #[test]
    fn scorer_is_swappable() {
        let filter = SearchFilter::new(SkimScorer::default());
        let hits = filter.apply(&catalog(), "hs cln");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].service_id, 2);
    }
}
