//! Add-service screen: the new listing form.

use super::resolve_location;
use crate::api::MarketplaceApi;
use crate::app::Store;
use crate::device::{Capabilities, ImageSelection};
use crate::domain::{NewService, Result, Service};
use std::sync::Arc;

/// Alert shown after a listing was stored.
pub const SERVICE_ADDED_MESSAGE: &str = "Service added successfully!";

/// Form fields. Location and city are filled from the device, not typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceForm {
    pub name: String,
    pub description: String,
    pub price: String,
    pub category: String,
    pub latitude: String,
    pub longitude: String,
    pub city: String,
    pub images: ImageSelection,
}

impl ServiceForm {
    #[must_use]
    pub fn to_new_service(&self) -> NewService {
        NewService {
            name: self.name.clone(),
            description: self.description.clone(),
            latitude: self.latitude.clone(),
            longitude: self.longitude.clone(),
            city: self.city.clone(),
            price: self.price.clone(),
            category: self.category.clone(),
            image_urls: self.images.to_vec(),
        }
    }

    /// Clears the typed fields and images; the device-provided location stays.
    pub fn reset(&mut self) {
        self.name.clear();
        self.description.clear();
        self.price.clear();
        self.category.clear();
        self.images.clear();
    }
}

pub struct AddServiceScreen<A> {
    store: Arc<Store<A>>,
    capabilities: Capabilities,
    pub form: ServiceForm,
}

impl<A: MarketplaceApi> AddServiceScreen<A> {
    pub fn new(store: Arc<Store<A>>, capabilities: Capabilities) -> Self {
        Self {
            store,
            capabilities,
            form: ServiceForm::default(),
        }
    }

    /// Prefills location and city. Never fails; a refused permission raises an alert.
    pub async fn mount(&mut self) {
        if let Some((position, city)) = resolve_location(&self.store, &self.capabilities).await {
            self.form.latitude = position.latitude;
            self.form.longitude = position.longitude;
            if let Some(city) = city {
                self.form.city = city;
            }
        }
    }

    /// Opens the picker and appends the chosen images.
    ///
    /// # Errors
    ///
    /// Propagates picker failures.
    pub async fn pick_images(&mut self) -> Result<usize> {
        self.form.images.pick_more(self.capabilities.images.as_ref()).await
    }

    /// Validates and submits the form.
    ///
    /// On success an alert confirms the listing and the form is reset. On failure
    /// the form is kept and the store has already raised an alert.
    ///
    /// # Errors
    ///
    /// Returns the validation or backend error.
    pub async fn submit(&mut self) -> Result<Service> {
        let created = self.store.create_service(self.form.to_new_service()).await?;
        tracing::info!(service_id = created.service_id, "service listed");
        self.form.reset();
        self.store.notify(SERVICE_ADDED_MESSAGE);
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_keeps_location() {
        let mut form = ServiceForm {
            name: "Tutor".into(),
            latitude: "12.9".into(),
            longitude: "77.5".into(),
            city: "Bengaluru".into(),
            ..Default::default()
        };
        form.images.append(["file:///x.jpg".to_string()]);

        form.reset();
        assert!(form.name.is_empty());
        assert!(form.images.is_empty());
        assert_eq!(form.city, "Bengaluru");
        assert_eq!(form.latitude, "12.9");
    }
}
