//! Pan/zoom camera and the screen-to-world coordinate bridge.

#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use crate::geom::{Point, Rect};
use crate::viewport::Viewport;

/// Camera state of the host viewport.
///
/// `pan_x` / `pan_y` are in container pixels.
/// `zoom` is a scale factor (1.0 = no zoom).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub pan_x: f64,
    pub pan_y: f64,
    pub zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self { pan_x: 0.0, pan_y: 0.0, zoom: 1.0 }
    }
}

impl Camera {
    #[must_use]
    pub fn new(pan_x: f64, pan_y: f64, zoom: f64) -> Self {
        Self { pan_x, pan_y, zoom }
    }

    /// Convert a container-relative point to world coordinates.
    #[must_use]
    pub fn screen_to_world(&self, screen: Point) -> Point {
        Point {
            x: (screen.x - self.pan_x) / self.zoom,
            y: (screen.y - self.pan_y) / self.zoom,
        }
    }
}

/// Maps client (page) pointer coordinates into world space.
///
/// The container's on-screen bounding box is cached because querying it can
/// force a layout pass on the host; call [`CoordinateBridge::invalidate`]
/// whenever the container may have moved (load, window resize, re-layout).
#[derive(Debug, Clone, Default)]
pub struct CoordinateBridge {
    container: Option<Rect>,
}

impl CoordinateBridge {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Subtract the container origin, then the pan, then divide by zoom.
    pub fn screen_to_world<V: Viewport + ?Sized>(&mut self, client: Point, viewport: &V) -> Point {
        let container = self.container_bounds(viewport);
        let local = Point::new(client.x - container.x, client.y - container.y);
        viewport.camera().screen_to_world(local)
    }

    /// Cached container bounds, queried from the host on first use after invalidation.
    pub fn container_bounds<V: Viewport + ?Sized>(&mut self, viewport: &V) -> Rect {
        *self.container.get_or_insert_with(|| viewport.container_bounds())
    }

    /// Forget the cached container bounds.
    pub fn invalidate(&mut self) {
        self.container = None;
    }

    #[must_use]
    pub fn is_cached(&self) -> bool {
        self.container.is_some()
    }
}
