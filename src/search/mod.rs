//! Client-side fuzzy search.
//!
//! - `scorer`: the [`Scorer`] trait and its implementations
//! - `filter`: [`SearchFilter`], which ranks a loaded list against a query

pub mod filter;
pub mod scorer;

pub use filter::SearchFilter;
pub use scorer::{ApproximateScorer, Scorer, ScorerKind, Searchable, SkimScorer, DEFAULT_THRESHOLD};
