//! Overlay entity: one positioned, sized image above the viewport.
//!
//! Overlays are built from an [`OverlayDescriptor`], the sparse shape used both
//! for user-initiated adds and for persisted documents. Construction is total:
//! a descriptor without a URL is reported as an [`OverlayError`] and still
//! yields an overlay, which simply never renders.

#[cfg(test)]
#[path = "overlay_test.rs"]
mod overlay_test;

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geom::{Point, Rect};

/// Unique identifier for an overlay.
///
/// Any caller-supplied string is kept as is. Ids generated for overlays
/// added without one are v4 UUIDs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OverlayId(String);

impl OverlayId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// A fresh random id.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OverlayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OverlayId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for OverlayId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Problems found while building an overlay.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OverlayError {
    /// No resource locator was supplied, so the overlay can never render.
    #[error("support image {id} has no url")]
    MissingUrl { id: OverlayId },
}

/// Natural pixel size of an overlay's image resource.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResourceSize {
    pub width: f64,
    pub height: f64,
}

impl ResourceSize {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Width over height, when both are finite and positive.
    #[must_use]
    pub fn aspect_ratio(&self) -> Option<f64> {
        let ratio = self.width / self.height;
        (self.width > 0.0 && self.height > 0.0 && ratio.is_finite()).then_some(ratio)
    }
}

/// Sparse overlay description. Absent fields take their defaults on construction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OverlayDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<OverlayId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locked: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounds: Option<Rect>,
}

impl OverlayDescriptor {
    /// A descriptor holding only a URL.
    #[must_use]
    pub fn from_url(url: impl Into<String>) -> Self {
        Self { url: Some(url.into()), ..Default::default() }
    }

    #[must_use]
    pub fn with_bounds(mut self, bounds: Rect) -> Self {
        self.bounds = Some(bounds);
        self
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

impl From<&str> for OverlayDescriptor {
    fn from(url: &str) -> Self {
        Self::from_url(url)
    }
}

impl From<String> for OverlayDescriptor {
    fn from(url: String) -> Self {
        Self::from_url(url)
    }
}

/// A support image placed in world space.
#[derive(Debug, Clone, PartialEq)]
pub struct Overlay {
    pub id: OverlayId,
    pub url: Option<String>,
    pub name: String,
    pub bounds: Rect,
    pub locked: bool,
    pub visible: bool,
    resource: Option<ResourceSize>,
    selected: bool,
    dragging: bool,
    /// World point the bounds should stay centered on once the size is known.
    pending_center: Option<Point>,
}

impl Overlay {
    /// Build an overlay, filling defaults and generating an id when absent.
    ///
    /// A missing URL is logged; the overlay is still returned.
    pub fn new(descriptor: impl Into<OverlayDescriptor>) -> Self {
        let d = descriptor.into();
        let url = d.url.filter(|u| !u.is_empty());
        let overlay = Self {
            id: d.id.unwrap_or_else(OverlayId::generate),
            name: d.name.or_else(|| url.clone()).unwrap_or_default(),
            url,
            bounds: d.bounds.unwrap_or_default(),
            locked: d.locked.unwrap_or(false),
            visible: d.visible.unwrap_or(true),
            resource: None,
            selected: false,
            dragging: false,
            pending_center: None,
        };
        if let Err(err) = overlay.validate() {
            tracing::error!(%err, "support image created in degraded state");
        }
        overlay
    }

    /// Check the overlay can ever render.
    ///
    /// # Errors
    ///
    /// Returns [`OverlayError::MissingUrl`] when no URL is set.
    pub fn validate(&self) -> Result<(), OverlayError> {
        match self.url {
            Some(_) => Ok(()),
            None => Err(OverlayError::MissingUrl { id: self.id.clone() }),
        }
    }

    /// The persisted shape of this overlay; transient flags are omitted.
    #[must_use]
    pub fn descriptor(&self) -> OverlayDescriptor {
        OverlayDescriptor {
            id: Some(self.id.clone()),
            url: self.url.clone(),
            name: Some(self.name.clone()),
            locked: Some(self.locked),
            visible: Some(self.visible),
            bounds: Some(self.bounds),
        }
    }

    #[must_use]
    pub fn selected(&self) -> bool {
        self.selected
    }

    pub(crate) fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }

    #[must_use]
    pub fn dragging(&self) -> bool {
        self.dragging
    }

    pub(crate) fn set_dragging(&mut self, dragging: bool) {
        self.dragging = dragging;
    }

    /// Whether hit-testing and selection may consider this overlay.
    #[must_use]
    pub fn is_interactive(&self) -> bool {
        !self.locked && self.visible
    }

    #[must_use]
    pub fn resource_size(&self) -> Option<ResourceSize> {
        self.resource
    }

    /// Shift the bounds by a world-space displacement.
    pub fn move_by(&mut self, dx: f64, dy: f64) {
        self.bounds.translate(dx, dy);
        self.pending_center = None;
    }

    /// Replace the bounds outright.
    pub fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
        self.pending_center = None;
    }

    /// Place the bounds' center on `center`.
    ///
    /// If the size is still unknown the center is remembered and applied when
    /// the resource size arrives.
    pub fn center_on(&mut self, center: Point) {
        let b = &mut self.bounds;
        b.x = center.x - b.width * 0.5;
        b.y = center.y - b.height * 0.5;
        self.pending_center = (b.width == 0.0 || b.height == 0.0).then_some(center);
    }

    /// Record the natural resource size and backfill unset bounds dimensions.
    ///
    /// Dimensions the user already set are never overridden. Repeated calls
    /// with the same size change nothing.
    pub fn apply_resource_size(&mut self, size: ResourceSize) {
        self.resource = Some(size);
        if self.bounds.width == 0.0 {
            self.bounds.width = size.width;
        }
        if self.bounds.height == 0.0 {
            self.bounds.height = size.height;
        }
        if let Some(center) = self.pending_center.take() {
            self.center_on(center);
        }
    }
}
