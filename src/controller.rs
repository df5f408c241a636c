//! Pointer gesture state machine.
//!
//! ```text
//!            press on overlay              release / focus lost
//!   Idle ─────────────────────► Dragging ─────────────────────► Idle
//!     │                                                          ▲
//!     │  press on handle                  release / focus lost   │
//!     └─────────────────────► Resizing ──────────────────────────┘
//!
//!   Escape / cancel from either active state reverts the bounds and goes Idle.
//! ```
//!
//! A press that hits something puts the host into exclusive mode for the
//! duration of the gesture. Every exit path (release, cancel, focus loss,
//! stale-gesture recovery, abort) gives the host flags back exactly once.

#[cfg(test)]
#[path = "controller_test.rs"]
mod controller_test;

use crate::camera::CoordinateBridge;
use crate::collection::OverlayCollection;
use crate::event::Notification;
use crate::geom::Rect;
use crate::hit::{Hit, hit_test_target};
use crate::input::{Button, Constraints, Dispatch, Gesture, Key, ModifierKey, Modifiers, PointerEvent};
use crate::overlay::OverlayId;
use crate::resize::{ResizeParams, resize};
use crate::viewport::{ExclusiveMode, Viewport};

/// Drives select, drag and resize from host pointer events.
#[derive(Debug)]
pub struct InteractionController {
    gesture: Gesture,
    grab: Option<ExclusiveMode>,
    aspect_key: ModifierKey,
    axis_key: ModifierKey,
}

impl Default for InteractionController {
    fn default() -> Self {
        Self::new(ModifierKey::Ctrl, ModifierKey::Shift)
    }
}

impl InteractionController {
    /// A controller mapping `aspect_key` to keep-aspect-ratio and `axis_key`
    /// to symmetric resize.
    #[must_use]
    pub fn new(aspect_key: ModifierKey, axis_key: ModifierKey) -> Self {
        Self { gesture: Gesture::Idle, grab: None, aspect_key, axis_key }
    }

    #[must_use]
    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    /// Whether the host is currently held in exclusive mode.
    #[must_use]
    pub fn holds_grab(&self) -> bool {
        self.grab.is_some()
    }

    /// Resize constraints for the given live modifier state.
    #[must_use]
    pub fn constraints(&self, modifiers: Modifiers) -> Constraints {
        Constraints {
            keep_aspect_ratio: modifiers.is_held(self.aspect_key),
            keep_axis: modifiers.is_held(self.axis_key),
        }
    }

    // --- Pointer events ---

    /// Handle a pointer press.
    pub fn press<V: Viewport + ?Sized>(
        &mut self,
        event: &PointerEvent,
        collection: &mut OverlayCollection,
        viewport: &mut V,
        bridge: &mut CoordinateBridge,
    ) -> Dispatch {
        if !self.gesture.is_idle() {
            tracing::warn!(gesture = ?self.gesture, "press during an unfinished gesture; finalizing it");
            self.finish(collection, viewport);
        }
        if event.button != Button::Primary {
            return Dispatch::Continue;
        }

        match hit_test_target(&event.target, event.world, collection) {
            Hit::Handle(handle) => {
                let Some((id, start_bounds)) = collection.selected().map(|o| (o.id.clone(), o.bounds)) else {
                    return Dispatch::Continue;
                };
                let start_world = bridge.screen_to_world(event.client, viewport);
                self.begin(Gesture::Resizing { id, handle, start_bounds, start_world }, viewport);
                Dispatch::Consumed
            }
            Hit::Overlay(id) => {
                collection.select(&id);
                let Some(start_bounds) = collection.get(&id).map(|o| o.bounds) else {
                    return Dispatch::Continue;
                };
                let last_world = bridge.screen_to_world(event.client, viewport);
                self.begin(Gesture::Dragging { id, start_bounds, last_world }, viewport);
                Dispatch::Consumed
            }
            Hit::None => {
                if collection.selected().is_some() {
                    collection.clear_selection();
                }
                Dispatch::Continue
            }
        }
    }

    /// Handle a pointer move. Only consumed while a gesture is active.
    pub fn pointer_move<V: Viewport + ?Sized>(
        &mut self,
        event: &PointerEvent,
        collection: &mut OverlayCollection,
        viewport: &mut V,
        bridge: &mut CoordinateBridge,
    ) -> Dispatch {
        match &mut self.gesture {
            Gesture::Idle => Dispatch::Continue,
            Gesture::Dragging { id, last_world, .. } => {
                let world = bridge.screen_to_world(event.client, viewport);
                let delta = world.minus(*last_world);
                let Some(overlay) = collection.get_mut(id) else {
                    let id = id.clone();
                    return self.vanished(&id, viewport);
                };
                overlay.set_dragging(true);
                overlay.move_by(delta.x, delta.y);
                *last_world = world;
                tracing::trace!(%id, dx = delta.x, dy = delta.y, "drag step");
                collection.relayout_handles();
                collection.notify(Notification::Position { id: id.clone() });
                Dispatch::Consumed
            }
            Gesture::Resizing { id, handle, start_bounds, start_world } => {
                let (id, handle, start_bounds, start_world) = (id.clone(), *handle, *start_bounds, *start_world);
                let world = bridge.screen_to_world(event.client, viewport);
                let Some(resource) = collection.get(&id).map(|o| o.resource_size()) else {
                    return self.vanished(&id, viewport);
                };
                let aspect_ratio = resource
                    .and_then(|size| size.aspect_ratio())
                    .or(Some(start_bounds.width / start_bounds.height));
                let params = ResizeParams {
                    handle,
                    constraints: self.constraints(event.modifiers),
                    aspect_ratio,
                    min_size: collection.min_size(),
                };
                let bounds = resize(start_bounds, world.minus(start_world), params);
                if let Some(overlay) = collection.get_mut(&id) {
                    overlay.set_bounds(bounds);
                }
                collection.relayout_handles();
                collection.notify(Notification::Resize { id });
                Dispatch::Consumed
            }
        }
    }

    /// Handle a pointer release, completing the active gesture.
    pub fn release<V: Viewport + ?Sized>(&mut self, collection: &mut OverlayCollection, viewport: &mut V) -> Dispatch {
        if self.gesture.is_idle() {
            return Dispatch::Continue;
        }
        self.finish(collection, viewport);
        Dispatch::Consumed
    }

    /// Escape cancels; every other key passes through.
    pub fn key_down<V: Viewport + ?Sized>(
        &mut self,
        key: &Key,
        collection: &mut OverlayCollection,
        viewport: &mut V,
    ) -> Dispatch {
        if key.is_escape() { self.cancel(collection, viewport) } else { Dispatch::Continue }
    }

    /// The pointer left the tracked surface. Finalize as if released.
    pub fn focus_lost<V: Viewport + ?Sized>(&mut self, collection: &mut OverlayCollection, viewport: &mut V) {
        if !self.gesture.is_idle() {
            tracing::debug!(gesture = ?self.gesture, "focus lost mid-gesture");
            self.finish(collection, viewport);
        }
    }

    /// Abort the active gesture and put the overlay back where it started.
    ///
    /// No completion notification fires.
    pub fn cancel<V: Viewport + ?Sized>(&mut self, collection: &mut OverlayCollection, viewport: &mut V) -> Dispatch {
        let gesture = std::mem::take(&mut self.gesture);
        let (id, start_bounds, notification) = match gesture {
            Gesture::Idle => return Dispatch::Continue,
            Gesture::Dragging { id, start_bounds, .. } => (id.clone(), start_bounds, Notification::Position { id }),
            Gesture::Resizing { id, start_bounds, .. } => (id.clone(), start_bounds, Notification::Resize { id }),
        };
        if let Some(overlay) = collection.get_mut(&id) {
            overlay.set_dragging(false);
            overlay.set_bounds(start_bounds);
            collection.relayout_handles();
            collection.notify(notification);
        }
        tracing::debug!(%id, "gesture cancelled");
        self.release_grab(viewport);
        Dispatch::Consumed
    }

    /// Drop the active gesture without touching any overlay.
    pub fn abort<V: Viewport + ?Sized>(&mut self, viewport: &mut V) {
        self.gesture = Gesture::Idle;
        self.release_grab(viewport);
    }

    // --- Internals ---

    fn begin<V: Viewport + ?Sized>(&mut self, gesture: Gesture, viewport: &mut V) {
        tracing::debug!(?gesture, "gesture started");
        if self.grab.is_none() {
            self.grab = Some(ExclusiveMode::acquire(viewport));
        }
        self.gesture = gesture;
    }

    fn finish<V: Viewport + ?Sized>(&mut self, collection: &mut OverlayCollection, viewport: &mut V) {
        match std::mem::take(&mut self.gesture) {
            Gesture::Idle => {}
            Gesture::Dragging { id, start_bounds, .. } => {
                tracing::debug!(%id, "drag finished");
                if let Some(after) = settle(collection, &id, start_bounds) {
                    collection.notify(Notification::MoveCompleted { id, before: start_bounds, after });
                }
            }
            Gesture::Resizing { id, start_bounds, .. } => {
                tracing::debug!(%id, "resize finished");
                if let Some(after) = settle(collection, &id, start_bounds) {
                    collection.notify(Notification::ResizeCompleted { id, before: start_bounds, after });
                }
            }
        }
        self.release_grab(viewport);
    }

    fn vanished<V: Viewport + ?Sized>(&mut self, id: &OverlayId, viewport: &mut V) -> Dispatch {
        tracing::debug!(%id, "support image vanished mid-gesture");
        self.abort(viewport);
        Dispatch::Continue
    }

    fn release_grab<V: Viewport + ?Sized>(&mut self, viewport: &mut V) {
        if let Some(grab) = self.grab.take() {
            grab.release(viewport);
        }
    }
}

/// Clear the drag flag and return the final bounds if they differ from `before`.
fn settle(collection: &mut OverlayCollection, id: &OverlayId, before: Rect) -> Option<Rect> {
    let overlay = collection.get_mut(id)?;
    overlay.set_dragging(false);
    let after = overlay.bounds;
    (!after.equals(&before)).then_some(after)
}
