//! Backend access layer.
//!
//! Everything that leaves the process for the marketplace backend goes through the
//! [`MarketplaceApi`] trait.
//!
//! # Modules
//!
//! - `backend`: the trait, one method per REST endpoint
//! - `http`: `reqwest`-based client with fixed base URL, timeout and JSON headers
//! - `fixture`: in-memory backend seeded from (and optionally persisted to) JSON
//! - `models`: wire envelope and error body types
//!
//! # Endpoints
//!
//! | Method | Path | Trait method |
//! |---|---|---|
//! | GET | `/api/services` | `list_services` |
//! | GET | `/api/services/category/{category}` | `list_services_by_category` |
//! | GET | `/api/services/{id}` | `get_service` |
//! | POST | `/api/services` | `create_service` |
//! | GET | `/api/services/{service_id}/reviews` | `list_reviews` |
//! | POST | `/api/services/reviews` | `create_review` |

pub mod backend;
pub mod fixture;
pub mod http;
pub mod models;

pub use backend::MarketplaceApi;
pub use fixture::{FixtureApi, FixtureData};
pub use http::HttpClient;
