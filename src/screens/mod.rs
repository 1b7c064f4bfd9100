//! Screen controllers.
//!
//! Each controller wires the [`Store`] and the device [`Capabilities`] together for
//! one screen: it issues the screen's fetches on mount, handles its user actions and
//! computes a plain view model from the current state. Rendering is left to the
//! front-end.
//!
//! # Screens
//!
//! - `home`: all services, search, category shortcuts, user city
//! - `category`: services of one category, search
//! - `detail`: one service with reviews, rating, related services, contact
//! - `add_service`: new listing form
//! - `add_review`: new review form
//! - `profile`: current user

pub mod add_review;
pub mod add_service;
pub mod category;
pub mod detail;
pub mod home;
pub mod profile;
pub mod viewmodel;

pub use add_review::{AddReviewScreen, AddReviewView, REVIEW_THANKS_MESSAGE};
pub use add_service::{AddServiceScreen, ServiceForm, SERVICE_ADDED_MESSAGE};
pub use category::{CategoryScreen, CategoryView};
pub use detail::{DetailBody, DetailScreen, DetailView, ServiceDetail, DETAIL_FAILED_MESSAGE};
pub use home::{CategoryChip, HomeScreen, HomeView};
pub use profile::{ProfileScreen, ProfileView};
pub use viewmodel::{ListBody, ReviewCard, ServiceCard};

use crate::api::MarketplaceApi;
use crate::app::Store;
use crate::device::{locate, prefill_city, Capabilities, Coordinates};
use crate::domain::{Result, ServiceFinderError};

/// Treats a failed backend request as settled.
///
/// The failure is already recorded in the resource's `error` field and rendered
/// from there; only internal errors propagate.
fn settled(result: Result<()>) -> Result<()> {
    match result {
        Err(ServiceFinderError::Request(message)) => {
            tracing::debug!(error = %message, "request failed, shown inline");
            Ok(())
        }
        other => other,
    }
}

/// Locates the user and looks up their city.
///
/// A refused permission raises an alert; any other failure is only logged. Either
/// way the screen carries on without a location.
async fn resolve_location<A: MarketplaceApi>(
    store: &Store<A>,
    capabilities: &Capabilities,
) -> Option<(Coordinates, Option<String>)> {
    match locate(capabilities.location.as_ref()).await {
        Ok(position) => {
            let city = prefill_city(capabilities.geocoder.as_ref(), &position).await;
            Some((position, city))
        }
        Err(e @ ServiceFinderError::PermissionDenied(_)) => {
            store.notify(e.to_string());
            None
        }
        Err(e) => {
            tracing::warn!(error = %e, "location unavailable");
            None
        }
    }
}
