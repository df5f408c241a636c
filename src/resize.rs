//! Constrained resize arithmetic.
//!
//! A resize is computed from the bounds at gesture start and the total
//! pointer displacement since then, so each move is independent of the last
//! and clamping never lets an edge drift away from the pointer.
//!
//! The displacement is first turned into *growth* per axis: a handle on the
//! start side (left/top) grows the rectangle when dragged toward negative
//! coordinates, a handle on the end side when dragged toward positive ones.
//! Edge-midpoint handles produce no growth on their own axis' perpendicular
//! unless the aspect ratio is locked.
//!
//! Each axis then has an anchor that stays put: the opposite edge for a free
//! resize, or the center when resizing symmetrically or when the axis only
//! follows the aspect ratio. The minimum-size clamp is applied against that
//! same anchor, taken from the start bounds.

#[cfg(test)]
#[path = "resize_test.rs"]
mod resize_test;

use crate::geom::{Point, Rect};
use crate::handle::{HandleId, Side};
use crate::input::Constraints;

/// The fixed point of one axis during a resize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// The left/top edge stays put.
    Start,
    /// The center stays put.
    Center,
    /// The right/bottom edge stays put.
    End,
}

impl Anchor {
    fn for_side(side: Side, keep_axis: bool) -> Self {
        match side {
            Side::Middle => Self::Center,
            _ if keep_axis => Self::Center,
            Side::Start => Self::End,
            Side::End => Self::Start,
        }
    }

    /// Origin coordinate for an extent of `len` anchored within `[start, start + start_len]`.
    fn origin(self, start: f64, start_len: f64, len: f64) -> f64 {
        match self {
            Self::Start => start,
            Self::Center => start + (start_len - len) * 0.5,
            Self::End => start + start_len - len,
        }
    }
}

/// Inputs for a single resize step.
#[derive(Debug, Clone, Copy)]
pub struct ResizeParams {
    pub handle: HandleId,
    pub constraints: Constraints,
    /// Width over height to preserve when `keep_aspect_ratio` is set.
    pub aspect_ratio: Option<f64>,
    /// Floor for width and height.
    pub min_size: f64,
}

/// Turn a raw displacement into growth that keeps `aspect_ratio`.
///
/// Edge handles derive the perpendicular growth from their own axis. Corner
/// handles pick one signed displacement: the larger of the two when `dx` is
/// positive, the smaller when it is negative, `dy` when `dx` is zero. The
/// other axis is re-derived from it, with the sign flipped for the top-right
/// and bottom-left corners whose axes pull in opposite directions.
fn proportional_growth(handle: HandleId, delta: Point, aspect_ratio: f64) -> (f64, f64) {
    let (h, v) = handle.sides();
    if !handle.is_corner() {
        return if h == Side::Middle {
            let grow_h = delta.y * v.sign();
            (grow_h * aspect_ratio, grow_h)
        } else {
            let grow_w = delta.x * h.sign();
            (grow_w, grow_w / aspect_ratio)
        };
    }

    let (dx, dy) = (delta.x, delta.y);
    let follow_x = (dx > 0.0 && dx >= dy) || (dx < 0.0 && dx <= dy);
    let same_way = h.sign() * v.sign();
    let (dx, dy) = if follow_x { (dx, dx * same_way / aspect_ratio) } else { (dy * same_way * aspect_ratio, dy) };
    (dx * h.sign(), dy * v.sign())
}

/// Compute new bounds for dragging `params.handle` by `delta` from `start`.
///
/// The result never has a width or height below `params.min_size`.
#[must_use]
pub fn resize(start: Rect, delta: Point, params: ResizeParams) -> Rect {
    if !delta.x.is_finite() || !delta.y.is_finite() {
        return start;
    }

    let (h, v) = params.handle.sides();
    let ratio = params
        .aspect_ratio
        .filter(|r| r.is_finite() && *r > 0.0 && params.constraints.keep_aspect_ratio);
    let (mut grow_w, mut grow_h) = match ratio {
        Some(ratio) => proportional_growth(params.handle, delta, ratio),
        None => (delta.x * h.sign(), delta.y * v.sign()),
    };

    if params.constraints.keep_axis {
        grow_w *= 2.0;
        grow_h *= 2.0;
    }

    let width = (start.width + grow_w).max(params.min_size);
    let height = (start.height + grow_h).max(params.min_size);
    let x = Anchor::for_side(h, params.constraints.keep_axis).origin(start.x, start.width, width);
    let y = Anchor::for_side(v, params.constraints.keep_axis).origin(start.y, start.height, height);

    tracing::trace!(handle = params.handle.code(), grow_w, grow_h, x, y, width, height, "resize step");
    Rect::new(x, y, width, height)
}
