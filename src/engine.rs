//! The support-image extension: one value that owns the overlay collection,
//! the gesture controller, the coordinate bridge, the image cache and the
//! window-resize debounce, wired to a host [`Viewport`].
//!
//! The host forwards its events (pointer, key, pan, zoom, load, window
//! resize, image load completion) and drains [`Notification`]s after each
//! call to decide when to redraw or persist.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use std::time::Instant;

use crate::cache::{ImageCache, ImageRequest};
use crate::camera::CoordinateBridge;
use crate::collection::OverlayCollection;
use crate::config::Config;
use crate::consts::{DEFAULT_HANDLE_SIZE, HANDLE_COUNT};
use crate::controller::InteractionController;
use crate::debounce::Debouncer;
use crate::document::{Document, DocumentError};
use crate::event::Notification;
use crate::geom::{Point, Rect};
use crate::input::{Dispatch, Gesture, Key, PointerEvent};
use crate::overlay::{Overlay, OverlayDescriptor, OverlayId, ResourceSize};
use crate::render::{self, Painter, Surface};
use crate::viewport::Viewport;

/// Support images attached to one host viewport.
pub struct SupportImages<V: Viewport> {
    viewport: V,
    config: Config,
    collection: OverlayCollection,
    controller: InteractionController,
    bridge: CoordinateBridge,
    cache: ImageCache,
    resize_debounce: Debouncer,
    surface: Surface,
    pixel_ratio: f64,
    destroyed: bool,
}

impl<V: Viewport> SupportImages<V> {
    /// Attach to `viewport`.
    ///
    /// An invalid handle size in `config` is logged and replaced by the default.
    pub fn new(viewport: V, config: Config) -> Self {
        let handle_size = match config.validate() {
            Ok(()) => config.handle_size,
            Err(err) => {
                tracing::error!(%err, "invalid support image config; using the default handle size");
                DEFAULT_HANDLE_SIZE
            }
        };
        let mut collection = OverlayCollection::new(handle_size);
        collection.set_zoom(viewport.zoom());
        Self {
            viewport,
            config,
            collection,
            controller: InteractionController::new(config.aspect_ratio_key, config.axis_key),
            bridge: CoordinateBridge::new(),
            cache: ImageCache::new(),
            resize_debounce: Debouncer::new(config.resize_quiet()),
            surface: Surface::default(),
            pixel_ratio: 1.0,
            destroyed: false,
        }
    }

    // --- Accessors ---

    #[must_use]
    pub fn viewport(&self) -> &V {
        &self.viewport
    }

    /// Mutable host access, for hosts that change pan/zoom through the engine.
    pub fn viewport_mut(&mut self) -> &mut V {
        &mut self.viewport
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[must_use]
    pub fn collection(&self) -> &OverlayCollection {
        &self.collection
    }

    #[must_use]
    pub fn gesture(&self) -> &Gesture {
        self.controller.gesture()
    }

    #[must_use]
    pub fn cache(&self) -> &ImageCache {
        &self.cache
    }

    #[must_use]
    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    // --- Lookup and export ---

    /// All overlays, topmost first.
    #[must_use]
    pub fn images(&self) -> &[Overlay] {
        self.collection.overlays()
    }

    #[must_use]
    pub fn image(&self, id: &OverlayId) -> Option<&Overlay> {
        self.collection.get(id)
    }

    #[must_use]
    pub fn selected_image(&self) -> Option<&Overlay> {
        self.collection.selected()
    }

    /// The eight handle rectangles; all empty when nothing is selected.
    #[must_use]
    pub fn handles(&self) -> [Rect; HANDLE_COUNT] {
        self.collection.handles().rects()
    }

    #[must_use]
    pub fn to_document(&self) -> Document {
        self.collection.to_document()
    }

    /// # Errors
    ///
    /// Returns [`DocumentError::Serialize`] if serialization fails.
    pub fn to_json(&self) -> Result<String, DocumentError> {
        self.to_document().to_json()
    }

    /// Replace every overlay with those in `document` and ask for a redraw.
    pub fn load(&mut self, document: Document) {
        self.controller.abort(&mut self.viewport);
        self.collection.load(document);
        self.backfill_known_sizes();
        self.collection.notify(Notification::Render);
    }

    /// Parse and load a JSON document. On error nothing changes.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::Parse`] if the text is not a valid document.
    pub fn load_json(&mut self, text: &str) -> Result<(), DocumentError> {
        let document = Document::from_json(text).inspect_err(|err| {
            tracing::error!(%err, "support image document rejected");
        })?;
        self.load(document);
        Ok(())
    }

    // --- Collection operations ---

    /// Add an overlay, centering it in the visible extent when asked.
    pub fn add(&mut self, descriptor: impl Into<OverlayDescriptor>, center_in_viewport: bool) -> OverlayId {
        let center = center_in_viewport.then(|| self.viewport.visible_extent().center());
        let id = self.collection.add(descriptor, center);
        let known = self
            .collection
            .get(&id)
            .and_then(|o| o.url.as_deref())
            .and_then(|url| self.cache.size(url).map(|size| (url.to_owned(), size)));
        if let Some((url, size)) = known {
            self.collection.apply_resource_size(&url, size);
        }
        id
    }

    pub fn remove(&mut self, id: &OverlayId) {
        if self.controller.gesture().overlay_id() == Some(id) {
            self.controller.abort(&mut self.viewport);
        }
        self.collection.remove(id);
    }

    pub fn set_locked(&mut self, id: &OverlayId, locked: bool) {
        self.end_gesture_on(id);
        self.collection.set_locked(id, locked);
    }

    pub fn set_visible(&mut self, id: &OverlayId, visible: bool) {
        self.end_gesture_on(id);
        self.collection.set_visible(id, visible);
    }

    pub fn move_up(&mut self, id: &OverlayId) -> bool {
        self.collection.move_up(id)
    }

    pub fn move_down(&mut self, id: &OverlayId) -> bool {
        self.collection.move_down(id)
    }

    pub fn select(&mut self, id: &OverlayId) {
        self.collection.select(id);
    }

    pub fn clear_selection(&mut self) {
        self.collection.clear_selection();
    }

    /// Re-lay-out the handles for the current zoom and ask for a redraw.
    pub fn render(&mut self) {
        self.collection.set_zoom(self.viewport.zoom());
        self.collection.notify(Notification::Render);
    }

    // --- Host lifecycle ---

    pub fn on_viewport_load(&mut self) {
        if self.destroyed {
            return;
        }
        self.bridge.invalidate();
        self.match_surface();
        self.collection.notify(Notification::Load);
    }

    pub fn on_pan(&mut self) {
        if self.destroyed {
            return;
        }
        self.collection.notify(Notification::Pan);
    }

    pub fn on_zoom(&mut self) {
        if self.destroyed {
            return;
        }
        self.collection.set_zoom(self.viewport.zoom());
        self.collection.notify(Notification::Zoom);
    }

    /// Effective device-pixel ratio for the drawing surface; see [`render::pixel_ratio`].
    pub fn set_pixel_ratio(&mut self, pixel_ratio: f64) {
        self.pixel_ratio = pixel_ratio;
    }

    /// The window changed size at `now`. Acted on by [`Self::tick`] once the burst settles.
    pub fn on_window_resize(&mut self, now: Instant) {
        if !self.destroyed {
            self.resize_debounce.trigger(now);
        }
    }

    /// Drive timers. Returns `true` if a settled window resize was handled.
    pub fn tick(&mut self, now: Instant) -> bool {
        if !self.resize_debounce.poll(now) {
            return false;
        }
        self.bridge.invalidate();
        self.match_surface();
        self.collection.notify(Notification::ViewportResized);
        true
    }

    // --- Pointer and keyboard ---

    /// Build a background event for a client position, projecting it into world space.
    pub fn pointer_event(&mut self, client: Point) -> PointerEvent {
        let world = self.bridge.screen_to_world(client, &self.viewport);
        PointerEvent::at(client, world)
    }

    pub fn on_pointer_down(&mut self, event: &PointerEvent) -> Dispatch {
        if self.destroyed {
            return Dispatch::Continue;
        }
        self.controller.press(event, &mut self.collection, &mut self.viewport, &mut self.bridge)
    }

    pub fn on_pointer_move(&mut self, event: &PointerEvent) -> Dispatch {
        if self.destroyed {
            return Dispatch::Continue;
        }
        self.controller.pointer_move(event, &mut self.collection, &mut self.viewport, &mut self.bridge)
    }

    pub fn on_pointer_up(&mut self, _event: &PointerEvent) -> Dispatch {
        if self.destroyed {
            return Dispatch::Continue;
        }
        self.controller.release(&mut self.collection, &mut self.viewport)
    }

    pub fn on_key_down(&mut self, key: &Key) -> Dispatch {
        if self.destroyed {
            return Dispatch::Continue;
        }
        self.controller.key_down(key, &mut self.collection, &mut self.viewport)
    }

    /// The pointer left the tracked surface or the window lost focus.
    pub fn on_focus_lost(&mut self) {
        self.controller.focus_lost(&mut self.collection, &mut self.viewport);
    }

    /// Abort the active gesture, reverting its bounds.
    pub fn cancel(&mut self) -> Dispatch {
        self.controller.cancel(&mut self.collection, &mut self.viewport)
    }

    // --- Image resources ---

    /// Look up `url` in the image cache; [`ImageRequest::Start`] means "fetch it now".
    pub fn request_image(&mut self, url: &str) -> ImageRequest {
        self.cache.request(url)
    }

    /// An image finished loading with its natural size.
    pub fn on_image_loaded(&mut self, url: &str, width: f64, height: f64) {
        let size = ResourceSize::new(width, height);
        if !self.cache.resolve(url, size) {
            return;
        }
        let count = self.collection.apply_resource_size(url, size);
        tracing::debug!(url, width, height, count, "support image resource loaded");
        self.collection.notify(Notification::Render);
    }

    pub fn on_image_failed(&mut self, url: &str) {
        tracing::warn!(url, "support image resource failed to load");
        self.cache.fail(url);
    }

    /// Draw the overlay layer with `painter`.
    ///
    /// # Errors
    ///
    /// Returns the first error reported by the painter.
    pub fn draw<P: Painter>(&mut self, painter: &mut P) -> Result<(), P::Error> {
        let camera = self.viewport.camera();
        render::draw(painter, &self.collection, &mut self.cache, &camera, &self.surface)
    }

    // --- Notifications and teardown ---

    /// Drain every notification recorded since the last call.
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        self.collection.take_notifications()
    }

    /// Tear down: end any gesture, give the host its flags back, stop reacting
    /// to host events. Calling it again does nothing.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.controller.abort(&mut self.viewport);
        self.resize_debounce.reset();
        self.destroyed = true;
        tracing::debug!("support image extension destroyed");
        self.collection.notify(Notification::Destroy);
    }

    // --- Internals ---

    fn end_gesture_on(&mut self, id: &OverlayId) {
        if self.controller.gesture().overlay_id() == Some(id) {
            self.controller.focus_lost(&mut self.collection, &mut self.viewport);
        }
    }

    fn match_surface(&mut self) {
        let container = self.bridge.container_bounds(&self.viewport);
        self.surface.match_container(container.width, container.height, self.pixel_ratio);
    }

    fn backfill_known_sizes(&mut self) {
        let known: Vec<(String, ResourceSize)> = self
            .collection
            .overlays()
            .iter()
            .filter_map(|o| o.url.as_deref())
            .filter_map(|url| self.cache.size(url).map(|size| (url.to_owned(), size)))
            .collect();
        for (url, size) in known {
            self.collection.apply_resource_size(&url, size);
        }
    }
}

impl<V: Viewport> Drop for SupportImages<V> {
    fn drop(&mut self) {
        self.controller.abort(&mut self.viewport);
    }
}
