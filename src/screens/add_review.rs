//! Add-review screen: star rating, text and images for one service.

use super::settled;
use super::viewmodel::stars;
use crate::api::MarketplaceApi;
use crate::app::Store;
use crate::device::{Capabilities, ImageSelection};
use crate::domain::{rating_label, NewReview, Result, Review, MAX_RATING, MIN_RATING};
use std::sync::Arc;

/// Alert shown after a review was stored.
pub const REVIEW_THANKS_MESSAGE: &str = "Thank you for your review";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddReviewView {
    pub service_id: i64,
    pub stars: [bool; MAX_RATING as usize],
    /// Label for the chosen rating, absent until one is chosen.
    pub rating_label: Option<&'static str>,
    pub review_text: String,
    pub image_urls: Vec<String>,
}

pub struct AddReviewScreen<A> {
    store: Arc<Store<A>>,
    capabilities: Capabilities,
    service_id: i64,
    rating: u8,
    pub review_text: String,
    pub images: ImageSelection,
}

impl<A: MarketplaceApi> AddReviewScreen<A> {
    pub fn new(store: Arc<Store<A>>, capabilities: Capabilities, service_id: i64) -> Self {
        Self {
            store,
            capabilities,
            service_id,
            rating: 0,
            review_text: String::new(),
            images: ImageSelection::default(),
        }
    }

    /// Selects a star rating, clamped to 1–5.
    pub fn set_rating(&mut self, rating: u8) {
        self.rating = rating.clamp(MIN_RATING, MAX_RATING);
    }

    #[must_use]
    pub const fn rating(&self) -> u8 {
        self.rating
    }

    /// Opens the picker and appends the chosen images.
    ///
    /// # Errors
    ///
    /// Propagates picker failures.
    pub async fn pick_images(&mut self) -> Result<usize> {
        self.images.pick_more(self.capabilities.images.as_ref()).await
    }

    /// Submits the review, thanks the user and reloads the service's reviews.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceFinderError::Validation`](crate::ServiceFinderError::Validation)
    /// if no rating was chosen, or the backend error; the store has already
    /// raised an alert in both cases.
    pub async fn submit(&mut self) -> Result<Review> {
        let review = NewReview::new(
            self.service_id,
            self.rating,
            self.review_text.clone(),
            self.images.to_vec(),
        );

        let created = self.store.create_review(review).await?;
        tracing::info!(review_id = created.review_id, service_id = self.service_id, "review posted");
        self.store.notify(REVIEW_THANKS_MESSAGE);
        settled(self.store.fetch_reviews(self.service_id).await)?;
        Ok(created)
    }

    #[must_use]
    pub fn view(&self) -> AddReviewView {
        AddReviewView {
            service_id: self.service_id,
            stars: stars(self.rating),
            rating_label: rating_label(self.rating),
            review_text: self.review_text.clone(),
            image_urls: self.images.to_vec(),
        }
    }
}
