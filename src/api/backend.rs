//! Marketplace backend abstraction.
//!
//! This module defines the [`MarketplaceApi`] trait that abstracts over the REST
//! backend. The stores never talk to HTTP directly; they go through this trait so
//! the same state logic runs against the real server, an offline fixture, or a test
//! double.
//!
//! # Design Philosophy
//!
//! The trait is minimal and maps one method to one endpoint. There is no retry,
//! caching or deduplication at this layer: each call is exactly one request.

use crate::domain::{NewReview, NewService, Result, Review, Service};
use async_trait::async_trait;
use std::sync::Arc;

/// Operations offered by the marketplace backend.
///
/// # Implementations
///
/// - [`HttpClient`](crate::api::HttpClient): the REST backend over `reqwest`
/// - [`FixtureApi`](crate::api::FixtureApi): in-memory data seeded from a JSON file
#[async_trait]
pub trait MarketplaceApi: Send + Sync {
    /// `GET /api/services`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body cannot be decoded.
    async fn list_services(&self) -> Result<Vec<Service>>;

    /// `GET /api/services/category/{category}`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body cannot be decoded.
    async fn list_services_by_category(&self, category: &str) -> Result<Vec<Service>>;

    /// `GET /api/services/{id}`
    ///
    /// # Errors
    ///
    /// Returns an error if the service does not exist or the request fails.
    async fn get_service(&self, service_id: i64) -> Result<Service>;

    /// `POST /api/services`
    ///
    /// Returns the record as stored by the server, including its assigned id.
    ///
    /// # Errors
    ///
    /// Returns an error if the server rejects the listing or the request fails.
    async fn create_service(&self, service: &NewService) -> Result<Service>;

    /// `GET /api/services/{service_id}/reviews`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body cannot be decoded.
    async fn list_reviews(&self, service_id: i64) -> Result<Vec<Review>>;

    /// `POST /api/services/reviews`
    ///
    /// # Errors
    ///
    /// Returns an error if the referenced service does not exist or the request fails.
    async fn create_review(&self, review: &NewReview) -> Result<Review>;
}

#[async_trait]
impl<T: MarketplaceApi + ?Sized> MarketplaceApi for Arc<T> {
    async fn list_services(&self) -> Result<Vec<Service>> {
        (**self).list_services().await
    }

    async fn list_services_by_category(&self, category: &str) -> Result<Vec<Service>> {
        (**self).list_services_by_category(category).await
    }

    async fn get_service(&self, service_id: i64) -> Result<Service> {
        (**self).get_service(service_id).await
    }

    async fn create_service(&self, service: &NewService) -> Result<Service> {
        (**self).create_service(service).await
    }

    async fn list_reviews(&self, service_id: i64) -> Result<Vec<Review>> {
        (**self).list_reviews(service_id).await
    }

    async fn create_review(&self, review: &NewReview) -> Result<Review> {
        (**self).create_review(review).await
    }
}
