//! Home screen: the full catalog with search and category shortcuts.

use super::viewmodel::ListBody;
use super::{resolve_location, settled};
use crate::api::MarketplaceApi;
use crate::app::Store;
use crate::device::{Capabilities, Coordinates};
use crate::domain::{Result, KNOWN_CATEGORIES};
use crate::search::SearchFilter;
use std::sync::Arc;

/// Shortcut to a category screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryChip {
    pub tag: &'static str,
    pub label: &'static str,
}

/// Renderable home screen state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeView {
    /// The user's city, when location and geocoding succeeded.
    pub city: Option<String>,
    pub query: String,
    pub categories: Vec<CategoryChip>,
    pub body: ListBody,
}

pub struct HomeScreen<A> {
    store: Arc<Store<A>>,
    capabilities: Capabilities,
    filter: SearchFilter,
    query: String,
    position: Option<Coordinates>,
    city: Option<String>,
}

impl<A: MarketplaceApi> HomeScreen<A> {
    pub fn new(store: Arc<Store<A>>, capabilities: Capabilities, filter: SearchFilter) -> Self {
        Self {
            store,
            capabilities,
            filter,
            query: String::new(),
            position: None,
            city: None,
        }
    }

    /// Locates the user and loads the catalog, concurrently.
    ///
    /// # Errors
    ///
    /// Only internal store errors; a failed fetch is shown inline.
    pub async fn mount(&mut self) -> Result<()> {
        let (location, fetched) = tokio::join!(
            resolve_location(&self.store, &self.capabilities),
            self.store.fetch_all_services()
        );

        if let Some((position, city)) = location {
            self.position = Some(position);
            self.city = city;
        }
        settled(fetched)
    }

    /// Pull-to-refresh: reloads the catalog.
    ///
    /// # Errors
    ///
    /// Only internal store errors.
    pub async fn refresh(&self) -> Result<()> {
        settled(self.store.fetch_all_services().await)
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    #[must_use]
    pub const fn position(&self) -> Option<&Coordinates> {
        self.position.as_ref()
    }

    /// Computes the view from the current store state.
    ///
    /// # Errors
    ///
    /// Returns an error if the state lock is poisoned.
    pub fn view(&self) -> Result<HomeView> {
        let now = chrono::Utc::now();
        let body = self.store.read(|state| {
            ListBody::from_resource(&state.services, &self.filter, &self.query, self.city.as_deref(), now)
        })?;

        Ok(HomeView {
            city: self.city.clone(),
            query: self.query.clone(),
            categories: KNOWN_CATEGORIES
                .iter()
                .map(|&(tag, label)| CategoryChip { tag, label })
                .collect(),
            body,
        })
    }
}
