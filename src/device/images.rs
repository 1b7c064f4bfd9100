//! Image picking.
//!
//! Pickers return local image references (URIs). Forms keep them in an
//! [`ImageSelection`], where every pick appends to what was already chosen.

use crate::domain::{Result, ServiceFinderError};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Gallery / camera-roll picker.
#[async_trait]
pub trait ImagePicker: Send + Sync {
    /// Lets the user pick images. A cancelled pick returns an empty list.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceFinderError::PermissionDenied`] if gallery access is refused.
    async fn pick_images(&self, multiple: bool) -> Result<Vec<String>>;
}

/// Picker that replays pre-recorded picks, one batch per call.
///
/// Used by the command-line front-end (images passed as arguments) and by tests.
/// An exhausted queue behaves like a cancelled pick.
#[derive(Debug, Default)]
pub struct QueuedImagePicker {
    batches: Mutex<VecDeque<Vec<String>>>,
}

impl QueuedImagePicker {
    #[must_use]
    pub fn new(batches: impl IntoIterator<Item = Vec<String>>) -> Self {
        Self {
            batches: Mutex::new(batches.into_iter().collect()),
        }
    }

    /// Queues the result of a future pick.
    pub fn push(&self, batch: Vec<String>) {
        if let Ok(mut batches) = self.batches.lock() {
            batches.push_back(batch);
        }
    }
}

#[async_trait]
impl ImagePicker for QueuedImagePicker {
    async fn pick_images(&self, multiple: bool) -> Result<Vec<String>> {
        let mut batches = self
            .batches
            .lock()
            .map_err(|e| ServiceFinderError::Worker(format!("picker lock poisoned: {e}")))?;
        let mut batch = batches.pop_front().unwrap_or_default();
        if !multiple {
            batch.truncate(1);
        }
        Ok(batch)
    }
}

/// Images chosen so far on a form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageSelection {
    uris: Vec<String>,
}

impl ImageSelection {
    /// Appends `uris` to the selection.
    pub fn append(&mut self, uris: impl IntoIterator<Item = String>) {
        self.uris.extend(uris);
    }

    /// Runs a multi-select pick and appends the result; returns how many were added.
    ///
    /// # Errors
    ///
    /// Propagates the picker's error; the selection is left unchanged.
    pub async fn pick_more(&mut self, picker: &dyn ImagePicker) -> Result<usize> {
        let picked = picker.pick_images(true).await?;
        let added = picked.len();
        self.append(picked);
        tracing::debug!(added, total = self.uris.len(), "images appended");
        Ok(added)
    }

    /// Removes the image at `index`, if present.
    pub fn remove(&mut self, index: usize) -> Option<String> {
        (index < self.uris.len()).then(|| self.uris.remove(index))
    }

    pub fn clear(&mut self) {
        self.uris.clear();
    }

    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.uris
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.uris.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.uris.len()
    }

    #[must_use]
    pub fn to_vec(&self) -> Vec<String> {
        self.uris.clone()
    }
}
