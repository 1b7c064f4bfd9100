//! Location capability.

use crate::domain::{Result, ServiceFinderError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Alert text shown when the user refuses location access.
pub const PERMISSION_DENIED_MESSAGE: &str = "Permission to access location was denied";

/// Outcome of a permission request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Granted,
    Denied,
}

/// A position in decimal degrees, kept as strings the way listings store them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: String,
    pub longitude: String,
}

impl Coordinates {
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude: latitude.to_string(),
            longitude: longitude.to_string(),
        }
    }
}

/// Device location service.
#[async_trait]
pub trait LocationProvider: Send + Sync {
    /// Asks the user for foreground location access.
    async fn request_permission(&self) -> Permission;

    /// Reads the current position. Only meaningful after a granted permission.
    ///
    /// # Errors
    ///
    /// Returns an error if no fix is available.
    async fn current_position(&self) -> Result<Coordinates>;
}

/// Requests permission and, if granted, reads the current position.
///
/// # Errors
///
/// Returns [`ServiceFinderError::PermissionDenied`] with
/// [`PERMISSION_DENIED_MESSAGE`] if access is refused, or the provider's error if no
/// position can be read.
pub async fn locate(provider: &dyn LocationProvider) -> Result<Coordinates> {
    match provider.request_permission().await {
        Permission::Granted => {
            let position = provider.current_position().await?;
            tracing::debug!(latitude = %position.latitude, longitude = %position.longitude, "position acquired");
            Ok(position)
        }
        Permission::Denied => {
            tracing::debug!("location permission denied");
            Err(ServiceFinderError::PermissionDenied(PERMISSION_DENIED_MESSAGE.to_string()))
        }
    }
}

/// Location provider with a fixed answer, for headless runs and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedLocation {
    position: Option<Coordinates>,
}

impl FixedLocation {
    /// Always grants access and reports `position`.
    #[must_use]
    pub const fn granted(position: Coordinates) -> Self {
        Self {
            position: Some(position),
        }
    }

    /// Always refuses access.
    #[must_use]
    pub const fn denied() -> Self {
        Self { position: None }
    }
}

#[async_trait]
impl LocationProvider for FixedLocation {
    async fn request_permission(&self) -> Permission {
        if self.position.is_some() {
            Permission::Granted
        } else {
            Permission::Denied
        }
    }

    async fn current_position(&self) -> Result<Coordinates> {
        self.position
            .clone()
            .ok_or_else(|| ServiceFinderError::PermissionDenied(PERMISSION_DENIED_MESSAGE.to_string()))
    }
}
