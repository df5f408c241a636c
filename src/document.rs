//! Persisted document shape for a set of support images.
//!
//! ```json
//! { "selected": "<id>", "images": [ { "id", "url", "name", "locked", "visible", "bounds": {..} } ] }
//! ```

#[cfg(test)]
#[path = "document_test.rs"]
mod document_test;

use serde::{Deserialize, Serialize};

use crate::overlay::{OverlayDescriptor, OverlayId};

/// Errors crossing the JSON text boundary.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("invalid support image document: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("failed to serialize support image document: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// The overlay set as stored by the host.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected: Option<OverlayId>,
    #[serde(default)]
    pub images: Vec<OverlayDescriptor>,
}

impl Document {
    /// Parse a document from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::Parse`] if the text is not a valid document.
    pub fn from_json(text: &str) -> Result<Self, DocumentError> {
        serde_json::from_str(text).map_err(DocumentError::Parse)
    }

    /// Serialize to compact JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::Serialize`] if serialization fails.
    pub fn to_json(&self) -> Result<String, DocumentError> {
        serde_json::to_string(self).map_err(DocumentError::Serialize)
    }
}
