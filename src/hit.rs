#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::collection::OverlayCollection;
use crate::geom::Point;
use crate::handle::HandleId;
use crate::input::Target;
use crate::overlay::OverlayId;

/// What a press landed on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Hit {
    /// Nothing of ours: the background or a host element.
    None,
    /// The body of an interactive overlay.
    Overlay(OverlayId),
    /// One of the selected overlay's resize handles.
    Handle(HandleId),
}

/// Test what lies under `world`, checking the selection's handles first.
///
/// Overlays are tested topmost first, skipping locked and hidden ones.
#[must_use]
pub fn hit_test(world: Point, collection: &OverlayCollection) -> Hit {
    if collection.selected().is_some() {
        if let Some(handle) = collection.handles().hit(world.x, world.y) {
            return Hit::Handle(handle);
        }
    }
    collection
        .overlays()
        .iter()
        .filter(|o| o.is_interactive())
        .find(|o| o.bounds.contains_point(world.x, world.y))
        .map_or(Hit::None, |o| Hit::Overlay(o.id.clone()))
}

/// Hit-test only when the host reports the background under the pointer.
#[must_use]
pub fn hit_test_target(target: &Target, world: Point, collection: &OverlayCollection) -> Hit {
    match target {
        Target::Background => hit_test(world, collection),
        Target::Element => Hit::None,
        Target::Unknown(kind) => {
            tracing::error!(%kind, "unknown hit target; ignoring event");
            Hit::None
        }
    }
}
