//! Review domain model and rating helpers.

use super::error::{Result, ServiceFinderError};
use serde::{Deserialize, Serialize};

/// Lowest rating a review may carry.
pub const MIN_RATING: u8 = 1;

/// Highest rating a review may carry.
pub const MAX_RATING: u8 = 5;

/// Feedback on exactly one service.
///
/// `rating` travels as a numeral string (`"1"`..`"5"`). No submitter identity is
/// attached, so a service may collect any number of reviews.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub service_id: i64,
    pub review_id: i64,
    pub rating: String,
    #[serde(default)]
    pub review_text: String,
    #[serde(default)]
    pub image_urls: Vec<String>,
}

impl Review {
    /// Parses the rating, returning `None` for anything outside 1–5.
    #[must_use]
    pub fn rating_value(&self) -> Option<u8> {
        self.rating
            .trim()
            .parse::<u8>()
            .ok()
            .filter(|r| (MIN_RATING..=MAX_RATING).contains(r))
    }
}

/// Payload for posting a review (`POST /api/services/reviews`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewReview {
    pub service_id: i64,
    pub rating: String,
    pub review_text: String,
    pub image_urls: Vec<String>,
}

impl NewReview {
    /// Builds a review payload, encoding the rating as its numeral string.
    #[must_use]
    pub fn new(service_id: i64, rating: u8, review_text: impl Into<String>, image_urls: Vec<String>) -> Self {
        Self {
            service_id,
            rating: rating.to_string(),
            review_text: review_text.into(),
            image_urls,
        }
    }

    /// Rejects ratings outside 1–5.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceFinderError::Validation`] when no valid star rating was chosen.
    pub fn validate(&self) -> Result<()> {
        let valid = self
            .rating
            .trim()
            .parse::<u8>()
            .is_ok_and(|r| (MIN_RATING..=MAX_RATING).contains(&r));

        if valid {
            Ok(())
        } else {
            Err(ServiceFinderError::Validation(
                "Please select a rating between 1 and 5".to_string(),
            ))
        }
    }
}

/// Label shown under the star picker for a chosen rating.
#[must_use]
pub const fn rating_label(rating: u8) -> Option<&'static str> {
    match rating {
        1 => Some("Worst"),
        2 => Some("Not Bad"),
        3 => Some("Good"),
        4 => Some("Best"),
        5 => Some("Great"),
        _ => None,
    }
}

/// Mean rating across reviews, rounded to one decimal place.
///
/// Ratings that do not parse as 1–5 are left out of both the sum and the count.
/// An empty list (or one without any usable rating) yields `0.0`.
///
/// # Examples
///
/// ```
/// use service_finder::domain::review::{average_rating, Review};
///
/// let review = |rating: &str| Review {
///     service_id: 1,
///     review_id: 0,
///     rating: rating.to_string(),
///     review_text: String::new(),
///     image_urls: vec![],
/// };
/// assert_eq!(average_rating(&[review("3"), review("5")]), 4.0);
/// assert_eq!(average_rating(&[]), 0.0);
/// ```
#[must_use]
pub fn average_rating(reviews: &[Review]) -> f64 {
    let ratings: Vec<f64> = reviews
        .iter()
        .filter_map(Review::rating_value)
        .map(f64::from)
        .collect();

    if ratings.is_empty() {
        return 0.0;
    }

    #[allow(clippy::cast_precision_loss)]
    let mean = ratings.iter().sum::<f64>() / ratings.len() as f64;
    (mean * 10.0).round() / 10.0
}
