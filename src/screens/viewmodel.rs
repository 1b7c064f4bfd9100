//! View model types representing renderable screen state.
//!
//! View models are computed from [`AppState`](crate::app::AppState) by the screen
//! controllers and consumed by whatever front-end draws them. They contain no
//! business logic, only display-ready data.

use crate::app::Resource;
use crate::domain::{category_label, Review, Service, MAX_RATING};
use crate::search::SearchFilter;
use chrono::{DateTime, Utc};

/// Text shown while a listing is loading.
pub const LOADING_MESSAGE: &str = "Loading...";

/// Text shown when a loaded or filtered listing is empty.
pub const EMPTY_MESSAGE: &str = "No services found";

/// Display information for one listing in a list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceCard {
    pub service_id: i64,
    pub name: String,
    pub price: String,
    pub city: String,

    /// Display label of the category, or the raw tag for unknown categories.
    pub category: String,

    /// Thumbnail reference, if the listing has images.
    pub cover_image: Option<String>,

    /// Age of the listing, e.g. "3h ago".
    pub listed_ago: Option<String>,

    /// Whether the listing is in the user's city.
    pub is_nearby: bool,
}

impl ServiceCard {
    #[must_use]
    pub fn new(service: &Service, user_city: Option<&str>, now: DateTime<Utc>) -> Self {
        let is_nearby = user_city.is_some_and(|city| {
            !city.is_empty() && city.eq_ignore_ascii_case(service.city.trim())
        });

        Self {
            service_id: service.service_id,
            name: service.name.clone(),
            price: service.price.clone(),
            city: service.city.clone(),
            category: category_label(&service.category)
                .map_or_else(|| service.category.clone(), str::to_string),
            cover_image: service.cover_image().map(str::to_string),
            listed_ago: service.listed_ago(now),
            is_nearby,
        }
    }
}

/// What a list area shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListBody {
    Loading,
    Error(String),
    Empty(String),
    Cards(Vec<ServiceCard>),
}

impl ListBody {
    /// Derives the list area from a resource triple and a search query.
    ///
    /// Loading takes precedence over an error, and an error over data.
    #[must_use]
    pub fn from_resource(
        resource: &Resource<Vec<Service>>,
        filter: &SearchFilter,
        query: &str,
        user_city: Option<&str>,
        now: DateTime<Utc>,
    ) -> Self {
        if resource.loading {
            return Self::Loading;
        }
        if let Some(error) = &resource.error {
            return Self::Error(error.clone());
        }

        let visible = filter.apply(&resource.data, query);
        if visible.is_empty() {
            return Self::Empty(EMPTY_MESSAGE.to_string());
        }

        Self::Cards(
            visible
                .iter()
                .map(|service| ServiceCard::new(service, user_city, now))
                .collect(),
        )
    }

    /// Cards shown, empty for every other state.
    #[must_use]
    pub fn cards(&self) -> &[ServiceCard] {
        match self {
            Self::Cards(cards) => cards,
            _ => &[],
        }
    }
}

/// Filled/empty state of the five rating stars.
#[must_use]
pub fn stars(rating: u8) -> [bool; MAX_RATING as usize] {
    std::array::from_fn(|index| index < usize::from(rating))
}

/// Display information for one review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewCard {
    pub review_id: i64,
    pub stars: [bool; MAX_RATING as usize],
    pub text: String,
    pub image_urls: Vec<String>,
}

impl From<&Review> for ReviewCard {
    fn from(review: &Review) -> Self {
        Self {
            review_id: review.review_id,
            stars: stars(review.rating_value().unwrap_or(0)),
            text: review.review_text.clone(),
            image_urls: review.image_urls.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(id: i64, city: &str) -> Service {
        serde_json::from_value(serde_json::json!({
            "service_id": id,
            "name": "Tap repair",
            "city": city,
            "category": "plumbing",
            "image_urls": ["file:///tap.jpg"],
        }))
        .unwrap()
    }

    #[test]
    fn stars_fill_up_to_rating() {
        assert_eq!(stars(3), [true, true, true, false, false]);
        assert_eq!(stars(0), [false; 5]);
    }

    #[test]
    fn card_uses_category_label_and_city_match() {
        let card = ServiceCard::new(&listing(1, "Pune"), Some("pune"), Utc::now());
        assert_eq!(card.category, "Plumbing");
        assert_eq!(card.cover_image.as_deref(), Some("file:///tap.jpg"));
        assert!(card.is_nearby);

        let card = ServiceCard::new(&listing(1, "Pune"), None, Utc::now());
        assert!(!card.is_nearby);
    }

    #[test]
    fn body_precedence_is_loading_then_error_then_data() {
        let filter = SearchFilter::default();
        let mut resource: Resource<Vec<Service>> = Resource::default();
        resource.succeed(vec![listing(1, "Pune")]);

        resource.begin(2);
        assert_eq!(ListBody::from_resource(&resource, &filter, "", None, Utc::now()), ListBody::Loading);

        resource.fail("Network error: offline");
        assert_eq!(
            ListBody::from_resource(&resource, &filter, "", None, Utc::now()),
            ListBody::Error("Network error: offline".into())
        );

        resource.begin(3);
        resource.succeed(vec![listing(1, "Pune")]);
        let body = ListBody::from_resource(&resource, &filter, "tap", None, Utc::now());
        assert_eq!(body.cards().len(), 1);

        let body = ListBody::from_resource(&resource, &filter, "xyz123notfound", None, Utc::now());
        assert_eq!(body, ListBody::Empty(EMPTY_MESSAGE.into()));
    }
}
