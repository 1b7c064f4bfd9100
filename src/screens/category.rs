//! Category screen: the services of one category tag.

use super::settled;
use super::viewmodel::ListBody;
use crate::api::MarketplaceApi;
use crate::app::Store;
use crate::domain::{category_label, Result};
use crate::search::SearchFilter;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryView {
    pub title: String,
    pub query: String,
    pub body: ListBody,
}

pub struct CategoryScreen<A> {
    store: Arc<Store<A>>,
    filter: SearchFilter,
    category: String,
    query: String,
}

impl<A: MarketplaceApi> CategoryScreen<A> {
    pub fn new(store: Arc<Store<A>>, filter: SearchFilter, category: impl Into<String>) -> Self {
        Self {
            store,
            filter,
            category: category.into(),
            query: String::new(),
        }
    }

    /// Loads the category listing.
    ///
    /// # Errors
    ///
    /// Only internal store errors; a failed fetch is shown inline.
    pub async fn mount(&self) -> Result<()> {
        settled(self.store.fetch_services_by_category(&self.category).await)
    }

    /// Pull-to-refresh: reloads this category, not the full catalog.
    ///
    /// # Errors
    ///
    /// Only internal store errors.
    pub async fn refresh(&self) -> Result<()> {
        self.mount().await
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    /// Computes the view.
    ///
    /// Data loaded for a different category is never shown; until this category
    /// settles the list reads as loading.
    ///
    /// # Errors
    ///
    /// Returns an error if the state lock is poisoned.
    pub fn view(&self) -> Result<CategoryView> {
        let now = chrono::Utc::now();
        let body = self.store.read(|state| {
            let resource = &state.category_services;
            let belongs_here = state.active_category.as_deref() == Some(self.category.as_str());
            if !resource.loading && resource.error.is_none() && !belongs_here {
                return ListBody::Loading;
            }
            ListBody::from_resource(resource, &self.filter, &self.query, None, now)
        })?;

        Ok(CategoryView {
            title: category_label(&self.category).map_or_else(|| self.category.clone(), str::to_string),
            query: self.query.clone(),
            body,
        })
    }
}
