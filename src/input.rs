//! Input model: pointer events, modifier keys and the gesture state.
//!
//! `PointerEvent` is what the host delivers for press, move and release.
//! `Gesture` is the active interaction tracked between press and release,
//! carrying everything needed to compute bounds on each move and to report
//! the before/after bounds once the gesture ends.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use serde::{Deserialize, Serialize};

use crate::geom::{Point, Rect};
use crate::handle::HandleId;
use crate::overlay::OverlayId;

/// Keyboard modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    /// Shift key is held.
    pub shift: bool,
    /// Ctrl key is held.
    pub ctrl: bool,
    /// Alt / Option key is held.
    pub alt: bool,
    /// Meta / Command key is held.
    pub meta: bool,
}

impl Modifiers {
    #[must_use]
    pub fn is_held(&self, key: ModifierKey) -> bool {
        match key {
            ModifierKey::Shift => self.shift,
            ModifierKey::Ctrl => self.ctrl,
            ModifierKey::Alt => self.alt,
            ModifierKey::Meta => self.meta,
        }
    }
}

/// A single modifier key, used to bind resize constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModifierKey {
    Shift,
    Ctrl,
    Alt,
    Meta,
}

impl ModifierKey {
    /// Parse a key name (`shift`, `ctrl`, `alt`, `meta`), case-insensitively.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "shift" => Some(Self::Shift),
            "ctrl" | "control" => Some(Self::Ctrl),
            "alt" | "option" => Some(Self::Alt),
            "meta" | "cmd" | "command" => Some(Self::Meta),
            _ => None,
        }
    }
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    #[default]
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button (or two-finger tap).
    Secondary,
}

/// A keyboard key.
///
/// The inner string holds the key name as reported by the host (e.g. `"Escape"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

impl Key {
    #[must_use]
    pub fn is_escape(&self) -> bool {
        self.0 == "Escape" || self.0 == "Esc"
    }
}

/// What the host's own hit-test found under the pointer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Target {
    /// The viewport background: overlays are hit-tested.
    #[default]
    Background,
    /// One of the host's own elements (a node or edge); overlays are skipped.
    Element,
    /// A target kind this crate does not know; reported and treated as no hit.
    Unknown(String),
}

/// A pointer event as delivered by the host.
#[derive(Debug, Clone, PartialEq)]
pub struct PointerEvent {
    /// Client (page) position; fed through the coordinate bridge for deltas.
    pub client: Point,
    /// World position as classified by the host; used for hit-testing.
    pub world: Point,
    pub target: Target,
    pub button: Button,
    /// Live modifier state at the time of the event.
    pub modifiers: Modifiers,
}

impl PointerEvent {
    /// A primary-button background event with no modifiers.
    #[must_use]
    pub fn at(client: Point, world: Point) -> Self {
        Self { client, world, target: Target::Background, button: Button::Primary, modifiers: Modifiers::default() }
    }

    #[must_use]
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    #[must_use]
    pub fn with_target(mut self, target: Target) -> Self {
        self.target = target;
        self
    }
}

/// Whether the host should continue processing an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum Dispatch {
    /// The event was not for an overlay; let the host handle it.
    Continue,
    /// An overlay consumed the event; stop host panning / box selection.
    Consumed,
}

/// Modifier-driven resize constraints, sampled on every move.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Constraints {
    /// Preserve the resource's width:height ratio.
    pub keep_aspect_ratio: bool,
    /// Resize symmetrically about the overlay's center.
    pub keep_axis: bool,
}

/// The active gesture.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Gesture {
    /// No gesture in progress; waiting for the next press.
    #[default]
    Idle,
    /// An overlay is being moved.
    Dragging {
        id: OverlayId,
        /// Bounds at press time.
        start_bounds: Rect,
        /// World-space pointer position at the previous event.
        last_world: Point,
    },
    /// The selected overlay is being resized by one of its handles.
    Resizing {
        id: OverlayId,
        handle: HandleId,
        /// Bounds at press time; also the limit rectangle for clamping.
        start_bounds: Rect,
        /// World-space pointer position at press time.
        start_world: Point,
    },
}

impl Gesture {
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// The overlay the gesture is manipulating, if any.
    #[must_use]
    pub fn overlay_id(&self) -> Option<&OverlayId> {
        match self {
            Self::Idle => None,
            Self::Dragging { id, .. } | Self::Resizing { id, .. } => Some(id),
        }
    }
}
