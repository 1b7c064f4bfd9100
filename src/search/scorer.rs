//! Pluggable fuzzy scoring.
//!
//! A [`Scorer`] measures how far a query is from a piece of text. Distances are
//! normalized so that `0.0` is a perfect match and larger is worse; `None` means
//! "not a match at all". Callers only depend on the trait, so the matching
//! algorithm can be swapped without touching the filter or the screens.

use crate::domain::ServiceFinderError;
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Default tolerance of [`ApproximateScorer`]: at most 30% of the query may be
/// edited to match.
pub const DEFAULT_THRESHOLD: f64 = 0.3;

/// Selects the scorer built from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScorerKind {
    /// [`ApproximateScorer`] with the configured threshold.
    #[default]
    Approximate,

    /// [`SkimScorer`]; the threshold does not apply.
    Skim,
}

impl FromStr for ScorerKind {
    type Err = ServiceFinderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "approximate" => Ok(Self::Approximate),
            "skim" => Ok(Self::Skim),
            other => Err(ServiceFinderError::Config(format!("unknown search scorer {other:?}"))),
        }
    }
}

/// A record that can be searched.
pub trait Searchable {
    /// Text fields considered by the search, in priority order.
    fn search_fields(&self) -> Vec<&str>;
}

impl Searchable for crate::domain::Service {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.category.as_str(), self.name.as_str(), self.description.as_str()]
    }
}

/// Distance function between a query and a text.
pub trait Scorer: Send + Sync {
    /// Returns the distance of `text` from `query`, or `None` if it does not match.
    fn distance(&self, query: &str, text: &str) -> Option<f64>;

    /// Returns the best (smallest) distance over all fields of `record`.
    fn score(&self, query: &str, record: &dyn Searchable) -> Option<f64> {
        record
            .search_fields()
            .into_iter()
            .filter_map(|field| self.distance(query, field))
            .reduce(f64::min)
    }
}

/// Typo-tolerant substring matching.
///
/// The distance is the smallest edit distance between the query and any substring
/// of the text, divided by the query length. Matching is case-insensitive and
/// operates on characters, not bytes.
///
/// # Examples
///
/// ```
/// use service_finder::search::{ApproximateScorer, Scorer};
///
/// let scorer = ApproximateScorer::default();
/// assert_eq!(scorer.distance("plumbin", "Plumbing Fix"), Some(0.0));
/// assert!(scorer.distance("plumbng", "Plumbing Fix").is_some());
/// assert_eq!(scorer.distance("xyz123notfound", "House Cleaning"), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApproximateScorer {
    threshold: f64,
}

impl ApproximateScorer {
    /// Creates a scorer accepting matches whose normalized distance is at most
    /// `threshold`.
    #[must_use]
    pub const fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    /// Smallest edit distance between `query` and any substring of `text`.
    fn best_substring_distance(query: &[char], text: &[char]) -> usize {
        let mut previous: Vec<usize> = (0..=query.len()).collect();
        let mut best = query.len();

        for &t in text {
            let mut current = Vec::with_capacity(query.len() + 1);
            current.push(0);
            for (i, &q) in query.iter().enumerate() {
                let substitution = previous[i] + usize::from(q != t);
                let insertion = current[i] + 1;
                let deletion = previous[i + 1] + 1;
                current.push(substitution.min(insertion).min(deletion));
            }
            best = best.min(current[query.len()]);
            previous = current;
        }

        best
    }
}

impl Default for ApproximateScorer {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD)
    }
}

impl Scorer for ApproximateScorer {
    fn distance(&self, query: &str, text: &str) -> Option<f64> {
        let query: Vec<char> = query.trim().to_lowercase().chars().collect();
        if query.is_empty() {
            return Some(0.0);
        }
        let text: Vec<char> = text.to_lowercase().chars().collect();

        #[allow(clippy::cast_precision_loss)]
        let ratio = Self::best_substring_distance(&query, &text) as f64 / query.len() as f64;
        (ratio <= self.threshold).then_some(ratio)
    }
}

/// Subsequence matching with the Skim V2 algorithm.
///
/// Every whitespace-separated token of the query must match; the Skim scores are
/// summed and mapped to a distance of `1 / (1 + score)`.
#[derive(Default)]
pub struct SkimScorer {
    matcher: SkimMatcherV2,
}

impl std::fmt::Debug for SkimScorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SkimScorer").finish_non_exhaustive()
    }
}

impl Scorer for SkimScorer {
    fn distance(&self, query: &str, text: &str) -> Option<f64> {
        let tokens: Vec<String> = query.split_whitespace().map(str::to_lowercase).collect();
        if tokens.is_empty() {
            return Some(0.0);
        }

        let text = text.to_lowercase();
        let mut total = 0_i64;
        for token in &tokens {
            total += self.matcher.fuzzy_match(&text, token)?;
        }

        #[allow(clippy::cast_precision_loss)]
        let score = total.max(0) as f64;
        Some(1.0 / (1.0 + score))
    }
}
