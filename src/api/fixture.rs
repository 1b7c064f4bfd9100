//! Fixture-backed marketplace backend.
//!
//! [`FixtureApi`] serves the full [`MarketplaceApi`] surface from an in-memory data
//! set loaded from a JSON file. It lets the client run without a server (offline
//! demos, tests) while keeping the server's observable behavior: ids and timestamps
//! are assigned on create, unknown ids answer 404, and reviews must reference an
//! existing service.
//!
//! When opened with [`FixtureApi::open`], writes are persisted back to the file with
//! an atomic write (write-to-temp + rename) so a crash never leaves a torn file.
//!
//! # File Format
//!
//! ```json
//! {
//!   "services": [
//!     { "service_id": 1, "name": "Plumbing Fix", "category": "plumbing", "price": "40" }
//!   ],
//!   "reviews": [
//!     { "service_id": 1, "review_id": 1, "rating": "5", "review_text": "Fast" }
//!   ]
//! }
//! ```

use super::backend::MarketplaceApi;
use crate::domain::{NewReview, NewService, Result, Review, Service, ServiceFinderError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

/// Serialized fixture contents.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FixtureData {
    #[serde(default)]
    pub services: Vec<Service>,
    #[serde(default)]
    pub reviews: Vec<Review>,
}

/// In-memory backend seeded from fixture data.
///
/// # Thread Safety
///
/// Data lives behind a `Mutex`; every call holds it only for the duration of the
/// in-memory operation, never across an await point.
#[derive(Debug)]
pub struct FixtureApi {
    data: Mutex<FixtureData>,
    /// Where writes are persisted; `None` keeps everything in memory.
    file_path: Option<PathBuf>,
}

impl FixtureApi {
    /// Creates a purely in-memory backend.
    #[must_use]
    pub fn new(data: FixtureData) -> Self {
        Self {
            data: Mutex::new(data),
            file_path: None,
        }
    }

    /// Opens a fixture file, persisting subsequent writes back to it.
    ///
    /// A missing file starts an empty catalog; the file is created on first write.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or is not valid
    /// fixture JSON.
    pub fn open(file_path: impl Into<PathBuf>) -> Result<Self> {
        let file_path = file_path.into();
        tracing::debug!(path = ?file_path, "opening fixture");

        let data = if file_path.exists() {
            Self::load_from_file(&file_path)?
        } else {
            tracing::debug!("fixture file missing, starting empty");
            FixtureData::default()
        };

        tracing::debug!(
            services = data.services.len(),
            reviews = data.reviews.len(),
            "fixture loaded"
        );

        Ok(Self {
            data: Mutex::new(data),
            file_path: Some(file_path),
        })
    }

    fn load_from_file(path: &Path) -> Result<FixtureData> {
        let contents = std::fs::read_to_string(path)?;
        serde_json::from_str(&contents)
            .map_err(|e| ServiceFinderError::Config(format!("invalid fixture {}: {e}", path.display())))
    }

    /// Writes the data set to disk if this fixture is file-backed.
    fn persist(&self, data: &FixtureData) -> Result<()> {
        let Some(path) = &self.file_path else {
            return Ok(());
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(data)
            .map_err(|e| ServiceFinderError::Worker(format!("failed to serialize fixture: {e}")))?;
        let tmp_path = path.with_extension("tmp");
        std::fs::write(&tmp_path, json)?;
        std::fs::rename(&tmp_path, path)?;

        tracing::trace!(path = ?path, "fixture saved");
        Ok(())
    }

    /// Replaces the in-memory data with `next` once it has been persisted.
    fn commit(&self, data: &mut FixtureData, next: FixtureData) -> Result<()> {
        self.persist(&next)?;
        *data = next;
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, FixtureData>> {
        self.data
            .lock()
            .map_err(|e| ServiceFinderError::Worker(format!("fixture lock poisoned: {e}")))
    }

    fn not_found(what: &str, id: i64) -> ServiceFinderError {
        ServiceFinderError::Status {
            status: 404,
            message: format!("{what} {id} not found"),
        }
    }
}

#[async_trait]
impl MarketplaceApi for FixtureApi {
    async fn list_services(&self) -> Result<Vec<Service>> {
        Ok(self.lock()?.services.clone())
    }

    async fn list_services_by_category(&self, category: &str) -> Result<Vec<Service>> {
        Ok(self
            .lock()?
            .services
            .iter()
            .filter(|s| s.category == category)
            .cloned()
            .collect())
    }

    async fn get_service(&self, service_id: i64) -> Result<Service> {
        self.lock()?
            .services
            .iter()
            .find(|s| s.service_id == service_id)
            .cloned()
            .ok_or_else(|| Self::not_found("Service", service_id))
    }

    async fn create_service(&self, service: &NewService) -> Result<Service> {
        let mut data = self.lock()?;
        let now = chrono::Utc::now().to_rfc3339();
        let service_id = data.services.iter().map(|s| s.service_id).max().unwrap_or(0) + 1;

        let created = Service {
            service_id,
            name: service.name.clone(),
            description: service.description.clone(),
            latitude: service.latitude.clone(),
            longitude: service.longitude.clone(),
            city: service.city.clone(),
            price: service.price.clone(),
            category: service.category.clone(),
            image_urls: service.image_urls.clone(),
            created_at: now.clone(),
            modified_at: now,
        };
        let mut next = data.clone();
        next.services.push(created.clone());
        self.commit(&mut data, next)?;

        tracing::debug!(service_id, "fixture service created");
        Ok(created)
    }

    async fn list_reviews(&self, service_id: i64) -> Result<Vec<Review>> {
        Ok(self
            .lock()?
            .reviews
            .iter()
            .filter(|r| r.service_id == service_id)
            .cloned()
            .collect())
    }

    async fn create_review(&self, review: &NewReview) -> Result<Review> {
        let mut data = self.lock()?;
        if !data.services.iter().any(|s| s.service_id == review.service_id) {
            return Err(Self::not_found("Service", review.service_id));
        }

        let review_id = data.reviews.iter().map(|r| r.review_id).max().unwrap_or(0) + 1;
        let created = Review {
            service_id: review.service_id,
            review_id,
            rating: review.rating.clone(),
            review_text: review.review_text.clone(),
            image_urls: review.image_urls.clone(),
        };
        let mut next = data.clone();
        next.reviews.push(created.clone());
        self.commit(&mut data, next)?;

        tracing::debug!(review_id, service_id = review.service_id, "fixture review created");
        Ok(created)
    }
}
