//! Service detail screen.
//!
//! Shows one listing with its images, average rating, reviews and related
//! listings, and lets the user contact the provider.

use super::settled;
use super::viewmodel::{ReviewCard, ServiceCard};
use crate::api::MarketplaceApi;
use crate::app::{AppState, Store};
use crate::device::{Capabilities, ContactIntent};
use crate::domain::{category_label, Result};
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Text shown when the listing cannot be loaded.
pub const DETAIL_FAILED_MESSAGE: &str = "Failed to load service details. Please try again later.";

#[derive(Debug, Clone, PartialEq)]
pub struct ServiceDetail {
    pub name: String,
    pub description: String,
    pub price: String,
    pub city: String,
    pub category: String,
    pub image_urls: Vec<String>,
    pub listed_ago: Option<String>,

    /// Mean rating, formatted with one decimal ("4.0"), "0" without reviews.
    pub average_rating: String,
    pub review_count: usize,
    pub reviews_loading: bool,
    pub reviews_error: Option<String>,
    pub reviews: Vec<ReviewCard>,
    pub related: Vec<ServiceCard>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DetailBody {
    Loading,
    Failed(String),
    Loaded(Box<ServiceDetail>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetailView {
    pub service_id: i64,
    pub body: DetailBody,
}

pub struct DetailScreen<A> {
    store: Arc<Store<A>>,
    capabilities: Capabilities,
    service_id: i64,
}

impl<A: MarketplaceApi> DetailScreen<A> {
    pub fn new(store: Arc<Store<A>>, capabilities: Capabilities, service_id: i64) -> Self {
        Self {
            store,
            capabilities,
            service_id,
        }
    }

    /// Loads the listing and its reviews concurrently; each settles on its own.
    ///
    /// The catalog is loaded as well if nothing has requested it yet, since related
    /// listings are drawn from it.
    ///
    /// # Errors
    ///
    /// Only internal store errors; failed fetches are shown inline.
    pub async fn mount(&self) -> Result<()> {
        let catalog_requested = self.store.read(|state| state.services.is_requested())?;

        let catalog = async {
            if catalog_requested {
                Ok(())
            } else {
                self.store.fetch_all_services().await
            }
        };

        let (service, reviews, catalog) = tokio::join!(
            self.store.fetch_service_by_id(self.service_id),
            self.store.fetch_reviews(self.service_id),
            catalog
        );

        settled(service)?;
        settled(reviews)?;
        settled(catalog)
    }

    /// Reloads the reviews, e.g. after returning from the add-review screen.
    ///
    /// # Errors
    ///
    /// Only internal store errors.
    pub async fn refresh_reviews(&self) -> Result<()> {
        settled(self.store.fetch_reviews(self.service_id).await)
    }

    /// Hands a contact intent to the platform.
    pub fn contact(&self, intent: &ContactIntent) {
        tracing::debug!(service_id = self.service_id, uri = %intent.uri(), "contact requested");
        self.capabilities.launcher.launch(intent);
    }

    /// Computes the view.
    ///
    /// # Errors
    ///
    /// Returns an error if the state lock is poisoned.
    pub fn view(&self) -> Result<DetailView> {
        let now = Utc::now();
        let body = self.store.read(|state| self.body(state, now))?;
        Ok(DetailView {
            service_id: self.service_id,
            body,
        })
    }

    fn body(&self, state: &AppState, now: DateTime<Utc>) -> DetailBody {
        if state.service.loading {
            return DetailBody::Loading;
        }

        let service = match (&state.service.error, &state.service.data) {
            (None, Some(service)) if service.service_id == self.service_id => service,
            (None, _) if !state.service.is_requested() => return DetailBody::Loading,
            _ => return DetailBody::Failed(DETAIL_FAILED_MESSAGE.to_string()),
        };

        let reviews_current = state.reviews_service_id == Some(self.service_id) || state.reviews.loading;
        let reviews: Vec<ReviewCard> = if reviews_current {
            state.reviews.data.iter().map(ReviewCard::from).collect()
        } else {
            Vec::new()
        };
        let average = if reviews.is_empty() { 0.0 } else { state.average_rating() };

        DetailBody::Loaded(Box::new(ServiceDetail {
            name: service.name.clone(),
            description: service.description.clone(),
            price: service.price.clone(),
            city: service.city.clone(),
            category: category_label(&service.category).map_or_else(|| service.category.clone(), str::to_string),
            image_urls: service.image_urls.clone(),
            listed_ago: service.listed_ago(now),
            average_rating: format_rating(average),
            review_count: reviews.len(),
            reviews_loading: state.reviews.loading,
            reviews_error: state.reviews.error.clone(),
            reviews,
            related: state
                .related_services()
                .into_iter()
                .map(|related| ServiceCard::new(related, None, now))
                .collect(),
        }))
    }
}

fn format_rating(average: f64) -> String {
    if average == 0.0 {
        "0".to_string()
    } else {
        format!("{average:.1}")
    }
}
