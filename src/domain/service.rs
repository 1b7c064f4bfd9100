//! Service listing domain model.
//!
//! A [`Service`] is one marketplace listing as returned by the backend. The client
//! never assigns `service_id`; new listings are described by [`NewService`] and the
//! server hands back the stored record.

use super::error::{Result, ServiceFinderError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const SECONDS_PER_MINUTE: i64 = 60;
const SECONDS_PER_HOUR: i64 = 3600;
const SECONDS_PER_DAY: i64 = 86400;

/// Category tags offered by the add-service form, with display labels.
///
/// The backend accepts any tag; this list only seeds pickers.
pub const KNOWN_CATEGORIES: [(&str, &str); 5] = [
    ("cleaning", "Cleaning"),
    ("plumbing", "Plumbing"),
    ("electrical", "Electrical"),
    ("teaching", "Teaching"),
    ("painting", "Painting"),
];

/// Message shown when a required add-service field is missing.
pub const MISSING_FIELDS_MESSAGE: &str = "Please fill all fields";

/// A service listing.
///
/// # Fields
///
/// - `service_id`: server-assigned identifier, unique within the catalog
/// - `latitude` / `longitude`: decimal-degree strings as captured on the device
/// - `city`: derived by reverse geocoding at creation time, not authoritative
/// - `price`: free-form string, rendered as-is
/// - `category`: open-ended tag such as `"plumbing"`
/// - `created_at` / `modified_at`: server timestamps, passed through untouched
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub service_id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub latitude: String,
    #[serde(default)]
    pub longitude: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub image_urls: Vec<String>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub modified_at: String,
}

impl Service {
    /// Returns the first image, used as the card thumbnail.
    #[must_use]
    pub fn cover_image(&self) -> Option<&str> {
        self.image_urls.first().map(String::as_str)
    }

    /// Returns `true` if `other` belongs to the same category but is a different listing.
    #[must_use]
    pub fn is_related_to(&self, other: &Self) -> bool {
        self.service_id != other.service_id && self.category == other.category
    }

    /// Returns a human-readable string describing how long ago the listing was created.
    ///
    /// The format varies based on the time elapsed:
    /// - Less than 1 minute: "just now"
    /// - Less than 1 hour: "Xm ago"
    /// - Less than 1 day: "Xh ago"
    /// - 1 day or more: "Xd ago"
    ///
    /// Returns `None` if `created_at` is not an RFC 3339 timestamp.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::{TimeZone, Utc};
    /// use service_finder::Service;
    ///
    /// let service = Service {
    ///     service_id: 1,
    ///     name: "Plumbing Fix".into(),
    ///     description: String::new(),
    ///     latitude: String::new(),
    ///     longitude: String::new(),
    ///     city: String::new(),
    ///     price: "40".into(),
    ///     category: "plumbing".into(),
    ///     image_urls: vec![],
    ///     created_at: "2024-03-01T10:00:00Z".into(),
    ///     modified_at: String::new(),
    /// };
    /// let now = Utc.with_ymd_and_hms(2024, 3, 1, 13, 0, 0).unwrap();
    /// assert_eq!(service.listed_ago(now).as_deref(), Some("3h ago"));
    /// ```
    #[must_use]
    pub fn listed_ago(&self, now: DateTime<Utc>) -> Option<String> {
        let created = DateTime::parse_from_rfc3339(&self.created_at).ok()?;
        let diff = (now - created.with_timezone(&Utc)).num_seconds();

        let label = if diff < SECONDS_PER_MINUTE {
            "just now".to_string()
        } else if diff < SECONDS_PER_HOUR {
            format!("{}m ago", diff / SECONDS_PER_MINUTE)
        } else if diff < SECONDS_PER_DAY {
            format!("{}h ago", diff / SECONDS_PER_HOUR)
        } else {
            format!("{}d ago", diff / SECONDS_PER_DAY)
        };
        Some(label)
    }
}

/// Payload for creating a listing (`POST /api/services`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewService {
    pub name: String,
    pub description: String,
    pub latitude: String,
    pub longitude: String,
    pub city: String,
    pub price: String,
    pub category: String,
    pub image_urls: Vec<String>,
}

impl NewService {
    /// Checks the fields the add-service form requires.
    ///
    /// Name, description, price and category must be non-blank and at least one
    /// image must be attached. Location and city are optional: the listing is still
    /// accepted when location permission was denied.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceFinderError::Validation`] naming the form-level problem.
    pub fn validate(&self) -> Result<()> {
        let blank = [&self.name, &self.description, &self.price, &self.category]
            .iter()
            .any(|field| field.trim().is_empty());

        if blank || self.image_urls.is_empty() {
            return Err(ServiceFinderError::Validation(MISSING_FIELDS_MESSAGE.to_string()));
        }
        Ok(())
    }
}

/// Returns the display label for a known category tag.
#[must_use]
pub fn category_label(tag: &str) -> Option<&'static str> {
    KNOWN_CATEGORIES
        .iter()
        .find(|(known, _)| *known == tag)
        .map(|(_, label)| *label)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn valid_input() -> NewService {
        NewService {
            name: "Pipe repair".into(),
            description: "Leaks and clogs".into(),
            latitude: "12.97".into(),
            longitude: "77.59".into(),
            city: "Bengaluru".into(),
            price: "500".into(),
            category: "plumbing".into(),
            image_urls: vec!["file:///tmp/a.jpg".into()],
        }
    }

    #[test]
    fn complete_input_passes_validation() {
        assert!(valid_input().validate().is_ok());
    }

    #[test]
    fn empty_category_is_rejected() {
        let input = NewService { category: String::new(), ..valid_input() };
        let err = input.validate().unwrap_err();
        assert!(matches!(err, ServiceFinderError::Validation(_)));
    }

    #[test]
    fn missing_images_are_rejected() {
        let input = NewService { image_urls: vec![], ..valid_input() };
        assert!(input.validate().is_err());
    }

    #[test]
    fn blank_name_is_rejected() {
        let input = NewService { name: "   ".into(), ..valid_input() };
        assert!(input.validate().is_err());
    }

    #[test]
    fn missing_location_is_accepted() {
        let input = NewService {
            latitude: String::new(),
            longitude: String::new(),
            city: String::new(),
            ..valid_input()
        };
        assert!(input.validate().is_ok());
    }

    #[test]
    fn service_decodes_with_sparse_fields() {
        let service: Service = serde_json::from_str(
            r#"{"service_id": 7, "name": "Tutoring", "category": "teaching"}"#,
        )
        .unwrap();
        assert_eq!(service.service_id, 7);
        assert!(service.image_urls.is_empty());
        assert_eq!(service.cover_image(), None);
    }

    #[test]
    fn listed_ago_buckets() {
        let mut service: Service = serde_json::from_str(
            r#"{"service_id": 1, "name": "x", "created_at": "2024-03-01T00:00:00Z"}"#,
        )
        .unwrap();
        let base = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();

        assert_eq!(service.listed_ago(base).as_deref(), Some("just now"));
        assert_eq!(
            service.listed_ago(base + chrono::Duration::minutes(5)).as_deref(),
            Some("5m ago")
        );
        assert_eq!(
            service.listed_ago(base + chrono::Duration::days(2)).as_deref(),
            Some("2d ago")
        );

        service.created_at = "yesterday".into();
        assert_eq!(service.listed_ago(base), None);
    }

    #[test]
    fn related_means_same_category_other_listing() {
        let a: Service = serde_json::from_str(r#"{"service_id": 1, "name": "a", "category": "painting"}"#).unwrap();
        let b = Service { service_id: 2, ..a.clone() };
        let c = Service { service_id: 3, category: "cleaning".into(), ..a.clone() };

        assert!(a.is_related_to(&b));
        assert!(!a.is_related_to(&a));
        assert!(!a.is_related_to(&c));
    }

    #[test]
    fn known_category_labels() {
        assert_eq!(category_label("electrical"), Some("Electrical"));
        assert_eq!(category_label("gardening"), None);
    }
}
