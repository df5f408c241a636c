//! Notifications emitted to the host and renderer.
//!
//! Every state change the renderer might care about is recorded as a
//! [`Notification`] in the collection's outbox. The host drains the outbox
//! after each call and redraws or persists as it sees fit.

use serde::Serialize;

use crate::geom::Rect;
use crate::overlay::OverlayId;

/// A tagged change notification.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Notification {
    /// The host viewport finished loading; the surface should be re-matched.
    Load,
    /// The host viewport panned.
    Pan,
    /// The host viewport zoomed; handles were re-laid-out.
    Zoom,
    /// An explicit redraw request (image loaded, `render()` called).
    Render,
    /// The window resize burst settled; the surface should be re-matched.
    ViewportResized,
    /// An overlay became the selection.
    Selection { id: OverlayId },
    /// The selection changed; `selected` is the new selection, if any.
    SelectionChanged { selected: Option<OverlayId> },
    /// A previously selected overlay lost the selection.
    Deselected { id: OverlayId },
    /// An overlay moved during a drag.
    Position { id: OverlayId },
    /// An overlay changed size during a resize.
    Resize { id: OverlayId },
    Add { id: OverlayId },
    Remove { id: OverlayId },
    /// Lock, visibility or z-order changed.
    Changed { id: OverlayId },
    /// A drag gesture ended with the bounds changed.
    MoveCompleted { id: OverlayId, before: Rect, after: Rect },
    /// A resize gesture ended with the bounds changed.
    ResizeCompleted { id: OverlayId, before: Rect, after: Rect },
    /// The extension was torn down.
    Destroy,
}

impl Notification {
    /// The tag string, as it appears in serialized form.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Load => "load",
            Self::Pan => "pan",
            Self::Zoom => "zoom",
            Self::Render => "render",
            Self::ViewportResized => "viewport-resized",
            Self::Selection { .. } => "selection",
            Self::SelectionChanged { .. } => "selection-changed",
            Self::Deselected { .. } => "deselected",
            Self::Position { .. } => "position",
            Self::Resize { .. } => "resize",
            Self::Add { .. } => "add",
            Self::Remove { .. } => "remove",
            Self::Changed { .. } => "changed",
            Self::MoveCompleted { .. } => "move-completed",
            Self::ResizeCompleted { .. } => "resize-completed",
            Self::Destroy => "destroy",
        }
    }
}
