//! The eight resize handles drawn around the selected overlay.
//!
//! Handles are created once and repositioned in place whenever the selected
//! overlay's bounds or the zoom change. With nothing selected they are parked
//! as empty rectangles at the origin and hit-testing skips them.

#[cfg(test)]
#[path = "handle_test.rs"]
mod handle_test;

use serde::{Deserialize, Serialize};

use crate::consts::{HANDLE_COUNT, MIN_SIZE_IN_HANDLES};
use crate::geom::Rect;

/// Which corner or edge midpoint a handle sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HandleId {
    TopLeft,
    TopMiddle,
    TopRight,
    BottomLeft,
    BottomMiddle,
    BottomRight,
    MiddleLeft,
    MiddleRight,
}

/// Which side of an axis a handle pulls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Left or top edge.
    Start,
    /// Not on this axis (edge-midpoint handles).
    Middle,
    /// Right or bottom edge.
    End,
}

impl Side {
    /// Sign applied to a displacement to turn it into growth along this axis.
    #[must_use]
    pub fn sign(self) -> f64 {
        match self {
            Self::Start => -1.0,
            Self::Middle => 0.0,
            Self::End => 1.0,
        }
    }
}

impl HandleId {
    /// All handles in layout order.
    pub const ALL: [HandleId; HANDLE_COUNT] = [
        Self::TopLeft,
        Self::TopMiddle,
        Self::TopRight,
        Self::BottomLeft,
        Self::BottomMiddle,
        Self::BottomRight,
        Self::MiddleLeft,
        Self::MiddleRight,
    ];

    /// Short code used in logs and scripts.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::TopLeft => "tl",
            Self::TopMiddle => "tm",
            Self::TopRight => "tr",
            Self::BottomLeft => "bl",
            Self::BottomMiddle => "bm",
            Self::BottomRight => "br",
            Self::MiddleLeft => "ml",
            Self::MiddleRight => "mr",
        }
    }

    /// `(horizontal, vertical)` sides this handle drags.
    #[must_use]
    pub fn sides(self) -> (Side, Side) {
        match self {
            Self::TopLeft => (Side::Start, Side::Start),
            Self::TopMiddle => (Side::Middle, Side::Start),
            Self::TopRight => (Side::End, Side::Start),
            Self::BottomLeft => (Side::Start, Side::End),
            Self::BottomMiddle => (Side::Middle, Side::End),
            Self::BottomRight => (Side::End, Side::End),
            Self::MiddleLeft => (Side::Start, Side::Middle),
            Self::MiddleRight => (Side::End, Side::Middle),
        }
    }

    #[must_use]
    pub fn is_corner(self) -> bool {
        let (h, v) = self.sides();
        h != Side::Middle && v != Side::Middle
    }
}

/// Handle edge length in world units for the given zoom.
///
/// Scales inversely with zoom so handles stay grabbable when zoomed out, but
/// never drops below `base`.
#[must_use]
pub fn handle_world_size(base: f64, zoom: f64) -> f64 {
    let scaled = base / zoom;
    if scaled.is_finite() { scaled.max(base) } else { base }
}

/// Smallest width or height an overlay may be resized to.
#[must_use]
pub fn min_overlay_size(handle_size: f64) -> f64 {
    handle_size * MIN_SIZE_IN_HANDLES
}

/// The fixed set of eight handle rectangles, indexed in [`HandleId::ALL`] order.
#[derive(Debug, Clone)]
pub struct HandleSet {
    rects: [Rect; HANDLE_COUNT],
    size: f64,
}

impl HandleSet {
    /// Eight parked handles of the given edge length.
    #[must_use]
    pub fn new(size: f64) -> Self {
        Self { rects: [Rect::default(); HANDLE_COUNT], size }
    }

    /// Current handle edge length in world units.
    #[must_use]
    pub fn size(&self) -> f64 {
        self.size
    }

    /// Center each handle on its corner or edge midpoint of `bounds`.
    pub fn layout(&mut self, bounds: Rect, size: f64) {
        self.size = size;
        let half = size * 0.5;
        let xs = [bounds.x, bounds.x + bounds.width * 0.5, bounds.right()];
        let ys = [bounds.y, bounds.y + bounds.height * 0.5, bounds.bottom()];
        for (id, rect) in HandleId::ALL.iter().zip(&mut self.rects) {
            let (h, v) = id.sides();
            rect.set(xs[axis_index(h)] - half, ys[axis_index(v)] - half, size, size);
        }
    }

    /// Collapse every handle to an empty rectangle at the origin.
    pub fn park(&mut self) {
        self.rects = [Rect::default(); HANDLE_COUNT];
    }

    /// First handle containing the point, in layout order.
    #[must_use]
    pub fn hit(&self, x: f64, y: f64) -> Option<HandleId> {
        HandleId::ALL
            .into_iter()
            .zip(self.rects)
            .find(|(_, rect)| rect.contains_point(x, y))
            .map(|(id, _)| id)
    }

    /// Handle rectangles in layout order.
    #[must_use]
    pub fn rects(&self) -> [Rect; HANDLE_COUNT] {
        self.rects
    }
}

fn axis_index(side: Side) -> usize {
    match side {
        Side::Start => 0,
        Side::Middle => 1,
        Side::End => 2,
    }
}
