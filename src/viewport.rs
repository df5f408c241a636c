//! Host viewport contract and the exclusive interaction mode held during a gesture.
//!
//! The host graph runtime owns pan, zoom and its own pointer behaviour
//! (panning the background, box-selecting elements). While an overlay is being
//! dragged or resized those behaviours must be switched off, and switched back
//! to exactly what they were afterwards. [`ExclusiveMode`] is the token that
//! represents "the host's flags are currently overridden"; it can only be given
//! back through [`ExclusiveMode::release`], which consumes it.

#[cfg(test)]
#[path = "viewport_test.rs"]
mod viewport_test;

use std::cell::Cell;

use crate::camera::Camera;
use crate::geom::{Point, Rect};

/// Host interaction switches that overlay gestures override.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InteractionFlags {
    /// Dragging on the background draws a selection box.
    pub box_selection: bool,
    /// Dragging on the background pans the viewport.
    pub panning: bool,
    /// Host elements can be grabbed and moved.
    pub grabbable: bool,
}

impl Default for InteractionFlags {
    fn default() -> Self {
        Self { box_selection: true, panning: true, grabbable: true }
    }
}

/// What the overlay engine needs from the host viewport.
pub trait Viewport {
    /// Current pan offset in container pixels.
    fn pan(&self) -> Point;

    /// Current zoom factor.
    fn zoom(&self) -> f64;

    /// The container's bounding box in client (page) coordinates.
    fn container_bounds(&self) -> Rect;

    /// The currently visible region in world coordinates.
    fn visible_extent(&self) -> Rect;

    fn interaction_flags(&self) -> InteractionFlags;

    fn set_interaction_flags(&mut self, flags: InteractionFlags);

    fn camera(&self) -> Camera {
        let pan = self.pan();
        Camera::new(pan.x, pan.y, self.zoom())
    }
}

/// Proof that the host is in exclusive manipulation mode.
///
/// Holds the flags that were active before the override so they can be
/// restored verbatim.
#[derive(Debug)]
#[must_use = "exclusive mode must be released to restore the host's flags"]
pub struct ExclusiveMode {
    saved: Option<InteractionFlags>,
}

impl ExclusiveMode {
    /// Snapshot the host flags and disable panning and box selection.
    pub fn acquire<V: Viewport + ?Sized>(viewport: &mut V) -> Self {
        let saved = viewport.interaction_flags();
        viewport.set_interaction_flags(InteractionFlags { box_selection: false, panning: false, ..saved });
        tracing::debug!(?saved, "host viewport switched to exclusive mode");
        Self { saved: Some(saved) }
    }

    /// The flags that will be restored on release.
    #[must_use]
    pub fn saved(&self) -> Option<InteractionFlags> {
        self.saved
    }

    /// Restore the snapshotted host flags.
    pub fn release<V: Viewport + ?Sized>(mut self, viewport: &mut V) {
        if let Some(saved) = self.saved.take() {
            viewport.set_interaction_flags(saved);
            tracing::debug!(?saved, "host viewport flags restored");
        }
    }
}

impl Drop for ExclusiveMode {
    fn drop(&mut self) {
        if let Some(saved) = self.saved {
            tracing::warn!(?saved, "exclusive mode dropped without restoring host flags");
        }
    }
}

/// A viewport with fixed geometry and no real host behind it.
///
/// Used by the replay tool and by tests. Counts container queries so cache
/// behaviour can be observed.
#[derive(Debug, Clone)]
pub struct Headless {
    pub camera: Camera,
    pub container: Rect,
    pub flags: InteractionFlags,
    container_queries: Cell<usize>,
}

impl Headless {
    /// A container of `width` × `height` at the page origin with an identity camera.
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            camera: Camera::default(),
            container: Rect::new(0.0, 0.0, width, height),
            flags: InteractionFlags::default(),
            container_queries: Cell::new(0),
        }
    }

    #[must_use]
    pub fn with_camera(mut self, camera: Camera) -> Self {
        self.camera = camera;
        self
    }

    #[must_use]
    pub fn with_container_origin(mut self, x: f64, y: f64) -> Self {
        self.container.x = x;
        self.container.y = y;
        self
    }

    /// How many times the container bounds were queried.
    #[must_use]
    pub fn container_queries(&self) -> usize {
        self.container_queries.get()
    }
}

impl Viewport for Headless {
    fn pan(&self) -> Point {
        Point::new(self.camera.pan_x, self.camera.pan_y)
    }

    fn zoom(&self) -> f64 {
        self.camera.zoom
    }

    fn container_bounds(&self) -> Rect {
        self.container_queries.set(self.container_queries.get() + 1);
        self.container
    }

    fn visible_extent(&self) -> Rect {
        let top_left = self.camera.screen_to_world(Point::new(0.0, 0.0));
        let bottom_right = self
            .camera
            .screen_to_world(Point::new(self.container.width, self.container.height));
        Rect::new(top_left.x, top_left.y, bottom_right.x - top_left.x, bottom_right.y - top_left.y)
    }

    fn interaction_flags(&self) -> InteractionFlags {
        self.flags
    }

    fn set_interaction_flags(&mut self, flags: InteractionFlags) {
        self.flags = flags;
    }
}
