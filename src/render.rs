//! Rendering: draws the overlay layer through an abstract 2D painter.
//!
//! This module is the only place that issues drawing commands. It receives
//! read-only views of the collection and camera and produces painter calls;
//! the one thing it mutates is the image cache, to register URLs it sees for
//! the first time.
//!
//! All fallible painter calls propagate the painter's own error type. The
//! top-level caller decides what a failed frame means.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use crate::cache::{ImageCache, ImageRequest};
use crate::camera::Camera;
use crate::collection::OverlayCollection;
use crate::geom::Rect;

/// A 2D drawing target, typically a canvas context.
pub trait Painter {
    type Error;

    /// Clear `width` × `height` device pixels under the identity transform.
    ///
    /// # Errors
    ///
    /// Returns the painter's error if the surface is unusable.
    fn clear(&mut self, width: f64, height: f64) -> Result<(), Self::Error>;

    /// Replace the current transform with a uniform `scale` after a translation.
    ///
    /// # Errors
    ///
    /// Returns the painter's error if the transform is rejected.
    fn set_transform(&mut self, scale: f64, translate_x: f64, translate_y: f64) -> Result<(), Self::Error>;

    /// Begin fetching `url`. Completion is reported back to the engine.
    fn load_image(&mut self, url: &str);

    /// Draw the loaded image for `url` stretched into `bounds`.
    ///
    /// # Errors
    ///
    /// Returns the painter's error if the draw call fails.
    fn draw_image(&mut self, url: &str, bounds: Rect) -> Result<(), Self::Error>;

    /// Outline the selected overlay.
    ///
    /// # Errors
    ///
    /// Returns the painter's error if the draw call fails.
    fn stroke_rect(&mut self, rect: Rect) -> Result<(), Self::Error>;

    /// Fill and outline the resize handles as one path.
    ///
    /// # Errors
    ///
    /// Returns the painter's error if the draw call fails.
    fn fill_handles(&mut self, handles: &[Rect]) -> Result<(), Self::Error>;
}

/// Effective device-pixel ratio: the device ratio over the backing store's.
///
/// Missing or nonsensical inputs count as 1.
#[must_use]
pub fn pixel_ratio(device: f64, backing_store: f64) -> f64 {
    let sane = |v: f64| if v.is_finite() && v > 0.0 { v } else { 1.0 };
    sane(device) / sane(backing_store)
}

/// Size of the drawing surface in CSS and device pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Surface {
    pub css_width: f64,
    pub css_height: f64,
    pub pixel_ratio: f64,
    pub device_width: f64,
    pub device_height: f64,
}

impl Default for Surface {
    fn default() -> Self {
        Self { css_width: 0.0, css_height: 0.0, pixel_ratio: 1.0, device_width: 0.0, device_height: 0.0 }
    }
}

impl Surface {
    /// Track the container's size. Returns `true` when the device-pixel size
    /// changed and the backing surface must be reallocated.
    #[allow(clippy::float_cmp)]
    pub fn match_container(&mut self, css_width: f64, css_height: f64, pixel_ratio: f64) -> bool {
        let device_width = css_width * pixel_ratio;
        let device_height = css_height * pixel_ratio;
        self.css_width = css_width;
        self.css_height = css_height;
        self.pixel_ratio = pixel_ratio;
        if device_width == self.device_width && device_height == self.device_height {
            return false;
        }
        tracing::debug!(device_width, device_height, pixel_ratio, "overlay surface resized");
        self.device_width = device_width;
        self.device_height = device_height;
        true
    }
}

/// Draw the overlay layer: images back to front, then the selection chrome.
///
/// Overlays whose image has not loaded are skipped; the first sight of a URL
/// asks the painter to start loading it.
///
/// # Errors
///
/// Returns the first error reported by the painter.
pub fn draw<P: Painter>(
    painter: &mut P,
    collection: &OverlayCollection,
    cache: &mut ImageCache,
    camera: &Camera,
    surface: &Surface,
) -> Result<(), P::Error> {
    let ratio = surface.pixel_ratio;

    // Layer 1: clear and set up transforms.
    painter.clear(surface.device_width, surface.device_height)?;
    painter.set_transform(camera.zoom * ratio, camera.pan_x * ratio, camera.pan_y * ratio)?;

    // Layer 2: images, bottom of the z-order first.
    let mut selection = None;
    for overlay in collection.overlays().iter().rev().filter(|o| o.visible) {
        let Some(url) = overlay.url.as_deref() else {
            continue;
        };
        match cache.request(url) {
            ImageRequest::Start => painter.load_image(url),
            ImageRequest::Pending | ImageRequest::Failed => {}
            ImageRequest::Ready(_) => {
                painter.draw_image(url, overlay.bounds)?;
                if overlay.selected() {
                    selection = Some(overlay.bounds);
                }
            }
        }
    }

    // Layer 3: selection outline and handles.
    if let Some(bounds) = selection {
        painter.stroke_rect(bounds)?;
        painter.fill_handles(&collection.handles().rects())?;
    }

    Ok(())
}
