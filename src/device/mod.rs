//! Device capability adapters.
//!
//! Screens never call platform services directly; they receive a [`Capabilities`]
//! bundle of trait objects. A mobile shell injects real implementations, the
//! command-line front-end and the tests inject fixed or recording ones.
//!
//! # Modules
//!
//! - `location`: permission + current position
//! - `geocode`: reverse geocoding for city prefill
//! - `images`: gallery picking and the per-form image selection
//! - `intents`: call / e-mail / WhatsApp deep links
//! - `auth`: identity provider and the session's current user

pub mod auth;
pub mod geocode;
pub mod images;
pub mod intents;
pub mod location;

pub use auth::{AuthSession, Authenticator, FirebaseAuthenticator, User};
pub use geocode::{prefill_city, NominatimGeocoder, ReverseGeocoder};
pub use images::{ImagePicker, ImageSelection, QueuedImagePicker};
pub use intents::{ContactIntent, IntentLauncher, LoggingLauncher};
pub use location::{locate, Coordinates, FixedLocation, LocationProvider, Permission, PERMISSION_DENIED_MESSAGE};

use std::sync::Arc;

/// Capabilities injected into screen controllers.
#[derive(Clone)]
pub struct Capabilities {
    pub location: Arc<dyn LocationProvider>,
    pub geocoder: Arc<dyn ReverseGeocoder>,
    pub images: Arc<dyn ImagePicker>,
    pub launcher: Arc<dyn IntentLauncher>,
    pub auth: Arc<AuthSession>,
}

impl std::fmt::Debug for Capabilities {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Capabilities").finish_non_exhaustive()
    }
}
