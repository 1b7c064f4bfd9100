//! Request/response protocol between the state container and the API worker.
//!
//! The store never calls the backend directly: it emits an [`ApiRequest`] inside an
//! action, the worker executes it and answers with an [`ApiResponse`], which is fed
//! back into the event handler. Both enums are plain data so they can be logged,
//! asserted on in tests, and serialized.

use crate::domain::{NewReview, NewService, Review, Service};
use serde::{Deserialize, Serialize};

/// Requests executed by the [`ApiWorker`](crate::worker::ApiWorker).
///
/// One variant per backend endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApiRequest {
    /// `GET /api/services`
    ListServices,

    /// `GET /api/services/category/{category}`
    ListServicesByCategory {
        /// Category tag, sent as a single path segment.
        category: String,
    },

    /// `GET /api/services/{id}`
    GetService { service_id: i64 },

    /// `POST /api/services`
    CreateService {
        /// Listing as entered on the add-service form.
        service: NewService,
    },

    /// `GET /api/services/{service_id}/reviews`
    ListReviews { service_id: i64 },

    /// `POST /api/services/reviews`
    CreateReview { review: NewReview },
}

impl ApiRequest {
    /// Short operation name used in log fields and error prefixes.
    #[must_use]
    pub const fn operation(&self) -> &'static str {
        match self {
            Self::ListServices => "list services",
            Self::ListServicesByCategory { .. } => "list services by category",
            Self::GetService { .. } => "get service",
            Self::CreateService { .. } => "create service",
            Self::ListReviews { .. } => "list reviews",
            Self::CreateReview { .. } => "create review",
        }
    }
}

/// Responses produced by the worker.
///
/// Each successful variant mirrors the request that produced it; any failure is
/// reported as [`ApiResponse::Error`] carrying the display text of the error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApiResponse {
    /// The full catalog was loaded.
    ServicesLoaded { services: Vec<Service> },

    /// Services of one category were loaded.
    CategoryLoaded {
        /// Tag the listing was requested for.
        category: String,

        /// Services returned by the backend.
        services: Vec<Service>,
    },

    /// A single service was loaded.
    ServiceLoaded { service: Service },

    /// A new listing was stored by the backend.
    ServiceCreated { service: Service },

    /// Reviews of one service were loaded.
    ReviewsLoaded { service_id: i64, reviews: Vec<Review> },

    /// A review was stored by the backend.
    ReviewCreated { review: Review },

    /// The request failed.
    Error {
        /// Human-readable error message.
        message: String,
    },
}

impl ApiResponse {
    /// Returns `true` for [`ApiResponse::Error`].
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}
