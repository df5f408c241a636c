//! The ordered overlay collection: z-order, selection and the resize handles.
//!
//! Index 0 is the topmost overlay: it wins hit-tests and is drawn last.
//! "Move up" swaps an overlay toward index 0. New overlays are appended to
//! the end of the list, so an added overlay starts at the bottom of the
//! z-order, underneath everything already present.
//!
//! At most one overlay is selected at any time; the eight handles track that
//! overlay's bounds and are parked whenever the selection is empty. Every
//! mutation records [`Notification`]s in an outbox that the host drains with
//! [`OverlayCollection::take_notifications`].

#[cfg(test)]
#[path = "collection_test.rs"]
mod collection_test;

use crate::consts::DEFAULT_HANDLE_SIZE;
use crate::document::Document;
use crate::event::Notification;
use crate::geom::{Point, Rect};
use crate::handle::{HandleSet, handle_world_size, min_overlay_size};
use crate::overlay::{Overlay, OverlayDescriptor, OverlayId, ResourceSize};

/// Ordered overlays plus the handles for the current selection.
#[derive(Debug, Clone)]
pub struct OverlayCollection {
    overlays: Vec<Overlay>,
    handles: HandleSet,
    handle_base: f64,
    zoom: f64,
    /// Bounds of the selected overlay when it was selected.
    snapshot: Option<Rect>,
    outbox: Vec<Notification>,
}

impl Default for OverlayCollection {
    fn default() -> Self {
        Self::new(DEFAULT_HANDLE_SIZE)
    }
}

impl OverlayCollection {
    /// An empty collection whose handles are `handle_base` world units at zoom 1.
    #[must_use]
    pub fn new(handle_base: f64) -> Self {
        Self {
            overlays: Vec::new(),
            handles: HandleSet::new(handle_base),
            handle_base,
            zoom: 1.0,
            snapshot: None,
            outbox: Vec::new(),
        }
    }

    // --- Queries ---

    /// All overlays, topmost first.
    #[must_use]
    pub fn overlays(&self) -> &[Overlay] {
        &self.overlays
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.overlays.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.overlays.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: &OverlayId) -> Option<&Overlay> {
        self.overlays.iter().find(|o| o.id == *id)
    }

    pub(crate) fn get_mut(&mut self, id: &OverlayId) -> Option<&mut Overlay> {
        self.overlays.iter_mut().find(|o| o.id == *id)
    }

    #[must_use]
    pub fn index_of(&self, id: &OverlayId) -> Option<usize> {
        self.overlays.iter().position(|o| o.id == *id)
    }

    #[must_use]
    pub fn selected(&self) -> Option<&Overlay> {
        self.overlays.iter().find(|o| o.selected())
    }

    #[must_use]
    pub fn selected_id(&self) -> Option<OverlayId> {
        self.selected().map(|o| o.id.clone())
    }

    /// Bounds of the selected overlay at the moment it was selected.
    #[must_use]
    pub fn selection_snapshot(&self) -> Option<Rect> {
        self.snapshot
    }

    #[must_use]
    pub fn handles(&self) -> &HandleSet {
        &self.handles
    }

    #[must_use]
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Current handle edge length in world units.
    #[must_use]
    pub fn handle_size(&self) -> f64 {
        handle_world_size(self.handle_base, self.zoom)
    }

    /// Smallest width or height a resize may produce at the current zoom.
    #[must_use]
    pub fn min_size(&self) -> f64 {
        min_overlay_size(self.handle_size())
    }

    // --- Notifications ---

    /// Record a notification for the host.
    pub fn notify(&mut self, notification: Notification) {
        self.outbox.push(notification);
    }

    /// Drain every notification recorded since the last call.
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.outbox)
    }

    // --- Handles ---

    /// Track a new zoom factor and re-lay-out the handles for it.
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom;
        self.relayout_handles();
    }

    /// Reposition the handles around the selected overlay, or park them.
    pub fn relayout_handles(&mut self) {
        let size = self.handle_size();
        match self.selected().map(|o| o.bounds) {
            Some(bounds) => self.handles.layout(bounds, size),
            None => self.handles.park(),
        }
    }

    // --- Selection ---

    /// Make `id` the only selected overlay.
    ///
    /// No-op when the overlay is unknown, locked, hidden or already selected.
    pub fn select(&mut self, id: &OverlayId) {
        let Some(target) = self.get(id) else {
            tracing::debug!(%id, "select ignored: unknown support image");
            return;
        };
        if !target.is_interactive() || target.selected() {
            return;
        }

        self.deselect_all();
        let mut bounds = Rect::default();
        if let Some(target) = self.get_mut(id) {
            target.set_selected(true);
            bounds = target.bounds;
        }
        self.snapshot = Some(bounds);
        self.relayout_handles();
        tracing::debug!(%id, "support image selected");
        self.notify(Notification::Selection { id: id.clone() });
        self.notify(Notification::SelectionChanged { selected: Some(id.clone()) });
    }

    /// Deselect everything.
    pub fn clear_selection(&mut self) {
        self.deselect_all();
        self.snapshot = None;
        self.handles.park();
        self.notify(Notification::SelectionChanged { selected: None });
    }

    fn deselect_all(&mut self) {
        let mut dropped = Vec::new();
        for overlay in &mut self.overlays {
            if overlay.selected() {
                dropped.push(overlay.id.clone());
            }
            overlay.set_selected(false);
            overlay.set_dragging(false);
        }
        for id in dropped {
            self.notify(Notification::Deselected { id });
        }
    }

    /// Deselect `id` if it is the selection, announcing the change.
    fn force_deselect(&mut self, id: &OverlayId) {
        let Some(overlay) = self.get_mut(id) else {
            return;
        };
        overlay.set_dragging(false);
        if !overlay.selected() {
            return;
        }
        overlay.set_selected(false);
        self.snapshot = None;
        self.handles.park();
        self.notify(Notification::Deselected { id: id.clone() });
        self.notify(Notification::SelectionChanged { selected: None });
    }

    // --- Ordering ---

    /// Swap with the overlay above (toward index 0). Returns whether anything moved.
    pub fn move_up(&mut self, id: &OverlayId) -> bool {
        match self.index_of(id) {
            Some(i) if i > 0 => {
                self.overlays.swap(i, i - 1);
                self.notify(Notification::Changed { id: id.clone() });
                true
            }
            _ => false,
        }
    }

    /// Swap with the overlay below (toward the end). Returns whether anything moved.
    pub fn move_down(&mut self, id: &OverlayId) -> bool {
        match self.index_of(id) {
            Some(i) if i + 1 < self.overlays.len() => {
                self.overlays.swap(i, i + 1);
                self.notify(Notification::Changed { id: id.clone() });
                true
            }
            _ => false,
        }
    }

    // --- Membership ---

    /// Build and append an overlay, optionally centering it on `center`.
    pub fn add(&mut self, descriptor: impl Into<OverlayDescriptor>, center: Option<Point>) -> OverlayId {
        let mut overlay = Overlay::new(descriptor);
        if let Some(center) = center {
            overlay.center_on(center);
        }
        let id = overlay.id.clone();
        self.overlays.push(overlay);
        tracing::debug!(%id, "support image added");
        self.notify(Notification::Add { id: id.clone() });
        id
    }

    /// Remove by id. The notification fires whether or not it was present.
    pub fn remove(&mut self, id: &OverlayId) {
        self.force_deselect(id);
        if let Some(i) = self.index_of(id) {
            self.overlays.remove(i);
            tracing::debug!(%id, "support image removed");
        }
        self.notify(Notification::Remove { id: id.clone() });
    }

    // --- Flags ---

    /// Lock or unlock. Locking (or unlocking) ends any interaction with it.
    pub fn set_locked(&mut self, id: &OverlayId, locked: bool) {
        let Some(overlay) = self.get_mut(id) else {
            tracing::debug!(%id, "set_locked ignored: unknown support image");
            return;
        };
        overlay.locked = locked;
        self.force_deselect(id);
        self.notify(Notification::Changed { id: id.clone() });
    }

    /// Show or hide. Changing visibility ends any interaction with it.
    pub fn set_visible(&mut self, id: &OverlayId, visible: bool) {
        let Some(overlay) = self.get_mut(id) else {
            tracing::debug!(%id, "set_visible ignored: unknown support image");
            return;
        };
        overlay.visible = visible;
        self.force_deselect(id);
        self.notify(Notification::Changed { id: id.clone() });
    }

    // --- Resources ---

    /// Record a resolved resource size on every overlay showing `url`.
    ///
    /// Returns how many overlays use that URL.
    pub fn apply_resource_size(&mut self, url: &str, size: ResourceSize) -> usize {
        let mut count = 0;
        for overlay in &mut self.overlays {
            if overlay.url.as_deref() == Some(url) {
                overlay.apply_resource_size(size);
                count += 1;
            }
        }
        if count > 0 {
            self.relayout_handles();
        }
        count
    }

    // --- Persistence ---

    /// Snapshot the collection as a persisted document.
    #[must_use]
    pub fn to_document(&self) -> Document {
        Document {
            selected: self.selected_id(),
            images: self.overlays.iter().map(Overlay::descriptor).collect(),
        }
    }

    /// Replace the contents with a persisted document.
    ///
    /// Array order becomes z-order. The named selection is restored only if
    /// that overlay is selectable.
    pub fn load(&mut self, document: Document) {
        self.overlays.clear();
        self.snapshot = None;
        self.handles.park();
        self.overlays.extend(document.images.into_iter().map(Overlay::new));
        if let Some(id) = document.selected {
            self.select(&id);
        }
        tracing::debug!(count = self.overlays.len(), "support images loaded");
    }
}
