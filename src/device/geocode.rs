//! Reverse geocoding, used to prefill the city of a new listing.

use super::location::Coordinates;
use crate::domain::{Result, ServiceFinderError};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde::Deserialize;
use std::time::Duration;

/// Resolves coordinates to a city name.
#[async_trait]
pub trait ReverseGeocoder: Send + Sync {
    /// Returns the city at `position`, or `None` if the lookup has no city.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup service cannot be reached or answers with
    /// something other than a geocoding result.
    async fn city(&self, position: &Coordinates) -> Result<Option<String>>;
}

/// Best-effort city lookup: any failure is logged and yields `None`.
pub async fn prefill_city(geocoder: &dyn ReverseGeocoder, position: &Coordinates) -> Option<String> {
    match geocoder.city(position).await {
        Ok(city) => city,
        Err(e) => {
            tracing::warn!(error = %e, "reverse geocoding failed, leaving city blank");
            None
        }
    }
}

#[derive(Debug, Deserialize)]
struct ReverseResponse {
    #[serde(default)]
    address: Option<Address>,
}

#[derive(Debug, Deserialize)]
struct Address {
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
}

impl Address {
    fn into_city(self) -> Option<String> {
        self.city
            .or(self.town)
            .or(self.village)
            .filter(|name| !name.trim().is_empty())
    }
}

/// Nominatim-compatible reverse geocoder (`GET /reverse?format=json&lat=..&lon=..`).
#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    client: reqwest::Client,
    base_url: String,
}

impl NominatimGeocoder {
    /// Creates a geocoder for `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceFinderError::Config`] if the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("service-finder/", env!("CARGO_PKG_VERSION"))),
        );

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| ServiceFinderError::Config(format!("failed to build geocoder client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl ReverseGeocoder for NominatimGeocoder {
    async fn city(&self, position: &Coordinates) -> Result<Option<String>> {
        let url = format!("{}/reverse", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("format", "json"),
                ("lat", position.latitude.as_str()),
                ("lon", position.longitude.as_str()),
            ])
            .send()
            .await
            .map_err(|e| ServiceFinderError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ServiceFinderError::Status {
                status: status.as_u16(),
                message: format!("Request failed with status code {}", status.as_u16()),
            });
        }

        let body: ReverseResponse = response
            .json()
            .await
            .map_err(|e| ServiceFinderError::Decode(e.to_string()))?;

        let city = body.address.and_then(Address::into_city);
        tracing::debug!(city = ?city, "reverse geocoded");
        Ok(city)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Failing;

    #[async_trait]
    impl ReverseGeocoder for Failing {
        async fn city(&self, _position: &Coordinates) -> Result<Option<String>> {
            Err(ServiceFinderError::Network("offline".into()))
        }
    }

    #[tokio::test]
    async fn prefill_swallows_failures() {
        assert_eq!(prefill_city(&Failing, &Coordinates::new(0.0, 0.0)).await, None);
    }

    #[test]
    fn address_falls_back_to_town_then_village() {
        let body: ReverseResponse =
            serde_json::from_str(r#"{"address": {"town": "Hosur", "village": "Bagalur"}}"#).unwrap();
        assert_eq!(body.address.and_then(Address::into_city).as_deref(), Some("Hosur"));

        let body: ReverseResponse = serde_json::from_str(r#"{"address": {"village": "Bagalur"}}"#).unwrap();
        assert_eq!(body.address.and_then(Address::into_city).as_deref(), Some("Bagalur"));

        let body: ReverseResponse = serde_json::from_str(r#"{"error": "Unable to geocode"}"#).unwrap();
        assert_eq!(body.address.and_then(Address::into_city), None);
    }
}
