//! Domain layer for the service finder client.
//!
//! Core types shared by every other layer, independent of HTTP, device or UI
//! concerns.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`service`]: Service listings and the create-listing payload
//! - [`review`]: Reviews, the create-review payload and rating helpers
//!
//! # Examples
//!
//! ```
//! use service_finder::domain::{NewService, Result};
//!
//! fn draft() -> Result<NewService> {
//!     let draft = NewService {
//!         name: "Window cleaning".into(),
//!         description: "Streak-free, inside and out".into(),
//!         price: "30".into(),
//!         category: "cleaning".into(),
//!         image_urls: vec!["file:///photos/1.jpg".into()],
//!         ..Default::default()
//!     };
//!     draft.validate()?;
//!     Ok(draft)
//! }
//! # draft().unwrap();
//! ```

pub mod error;
pub mod review;
pub mod service;

pub use error::{Result, ServiceFinderError};
pub use review::{average_rating, rating_label, NewReview, Review, MAX_RATING, MIN_RATING};
pub use service::{category_label, NewService, Service, KNOWN_CATEGORIES, MISSING_FIELDS_MESSAGE};
