#![allow(clippy::float_cmp)]

use std::time::Duration;

use super::*;
use crate::camera::Camera;
use crate::viewport::{Headless, InteractionFlags};

fn engine() -> SupportImages<Headless> {
    SupportImages::new(Headless::new(800.0, 600.0), Config::default())
}

fn sized(url: &str, x: f64, y: f64, w: f64, h: f64) -> OverlayDescriptor {
    OverlayDescriptor::from_url(url).with_bounds(Rect::new(x, y, w, h))
}

fn kinds(e: &mut SupportImages<Headless>) -> Vec<&'static str> {
    e.take_notifications().iter().map(Notification::kind).collect()
}

// =============================================================
// Construction
// =============================================================

#[test]
fn new_tracks_viewport_zoom() {
    let vp = Headless::new(800.0, 600.0).with_camera(Camera::new(0.0, 0.0, 0.5));
    let e = SupportImages::new(vp, Config::default());
    assert_eq!(e.collection().handle_size(), 10.0);
    assert_eq!(e.collection().min_size(), 20.0);
}

#[test]
fn invalid_handle_size_falls_back_to_default() {
    let config = Config { handle_size: -2.0, ..Config::default() };
    let e = SupportImages::new(Headless::new(10.0, 10.0), config);
    assert_eq!(e.collection().handle_size(), DEFAULT_HANDLE_SIZE);
}

// =============================================================
// Adding and image resources
// =============================================================

#[test]
fn add_centers_in_visible_extent() {
    let mut e = engine();
    let id = e.add(sized("a.png", 0.0, 0.0, 100.0, 50.0), true);
    assert_eq!(e.image(&id).unwrap().bounds, Rect::new(350.0, 275.0, 100.0, 50.0));
    assert_eq!(kinds(&mut e), vec!["add"]);
}

#[test]
fn add_without_centering_keeps_bounds() {
    let mut e = engine();
    let id = e.add(sized("a.png", 7.0, 8.0, 100.0, 50.0), false);
    assert_eq!(e.image(&id).unwrap().bounds, Rect::new(7.0, 8.0, 100.0, 50.0));
}

#[test]
fn centered_add_stays_centered_when_size_arrives() {
    let mut e = engine();
    let id = e.add("a.png", true);
    assert_eq!(e.request_image("a.png"), ImageRequest::Start);
    e.on_image_loaded("a.png", 200.0, 100.0);
    assert_eq!(e.image(&id).unwrap().bounds, Rect::new(300.0, 250.0, 200.0, 100.0));
    assert_eq!(kinds(&mut e), vec!["add", "render"]);
}

#[test]
fn add_after_load_backfills_immediately() {
    let mut e = engine();
    e.on_image_loaded("a.png", 200.0, 100.0);
    let id = e.add("a.png", true);
    assert_eq!(e.image(&id).unwrap().bounds, Rect::new(300.0, 250.0, 200.0, 100.0));
}

#[test]
fn image_load_never_overrides_user_size() {
    let mut e = engine();
    let id = e.add(sized("a.png", 0.0, 0.0, 50.0, 0.0), false);
    e.on_image_loaded("a.png", 200.0, 100.0);
    let o = e.image(&id).unwrap();
    assert_eq!((o.bounds.width, o.bounds.height), (50.0, 100.0));
    assert_eq!(o.resource_size(), Some(ResourceSize::new(200.0, 100.0)));
}

#[test]
fn repeated_image_load_is_idempotent() {
    let mut e = engine();
    e.add("a.png", false);
    e.take_notifications();
    e.on_image_loaded("a.png", 200.0, 100.0);
    e.on_image_loaded("a.png", 200.0, 100.0);
    assert_eq!(kinds(&mut e), vec!["render"]);
}

#[test]
fn image_failure_is_recorded_quietly() {
    let mut e = engine();
    let id = e.add("broken.png", false);
    e.take_notifications();
    let _ = e.request_image("broken.png");
    e.on_image_failed("broken.png");
    assert_eq!(e.request_image("broken.png"), ImageRequest::Failed);
    assert!(kinds(&mut e).is_empty());
    assert_eq!(e.image(&id).unwrap().resource_size(), None);
}

// =============================================================
// Persistence
// =============================================================

#[test]
fn json_round_trip_preserves_order_bounds_and_selection() {
    let mut e = engine();
    let a = e.add(sized("a.png", 1.0, 2.0, 30.0, 40.0), false);
    e.add(sized("b.png", 5.0, 6.0, 70.0, 80.0), false);
    e.select(&a);
    let text = e.to_json().unwrap();

    let mut restored = engine();
    restored.load_json(&text).unwrap();
    assert_eq!(restored.to_document(), e.to_document());
    assert_eq!(restored.selected_image().map(|o| o.id.clone()), Some(a));
    assert_eq!(restored.images().len(), 2);
    assert_eq!(restored.images()[0].url.as_deref(), Some("a.png"));
}

#[test]
fn invalid_json_leaves_collection_untouched() {
    let mut e = engine();
    e.add("keep.png", false);
    assert!(matches!(e.load_json("{not json"), Err(DocumentError::Parse(_))));
    assert_eq!(e.images().len(), 1);
}

#[test]
fn load_ignores_unselectable_selection() {
    let id = OverlayId::generate();
    let text = format!(
        r#"{{"selected":"{id}","images":[{{"id":"{id}","url":"a.png","locked":true,
            "bounds":{{"x":0,"y":0,"width":10,"height":10}}}}]}}"#
    );
    let mut e = engine();
    e.load_json(&text).unwrap();
    assert_eq!(e.images().len(), 1);
    assert!(e.selected_image().is_none());
}

#[test]
fn load_requests_one_redraw() {
    let mut e = engine();
    e.load(Document { selected: None, images: vec![OverlayDescriptor::from_url("a.png")] });
    assert_eq!(kinds(&mut e), vec!["render"]);
}

#[test]
fn load_backfills_from_cache() {
    let mut e = engine();
    e.on_image_loaded("a.png", 64.0, 32.0);
    e.load(Document { selected: None, images: vec![OverlayDescriptor::from_url("a.png")] });
    let o = &e.images()[0];
    assert_eq!((o.bounds.width, o.bounds.height), (64.0, 32.0));
}

// =============================================================
// Host lifecycle
// =============================================================

#[test]
fn render_relayouts_for_current_zoom() {
    let mut e = engine();
    let id = e.add(sized("a.png", 0.0, 0.0, 100.0, 50.0), false);
    e.select(&id);
    e.viewport_mut().camera.zoom = 0.5;
    e.take_notifications();
    e.render();
    assert_eq!(e.handles()[0], Rect::new(-5.0, -5.0, 10.0, 10.0));
    assert_eq!(kinds(&mut e), vec!["render"]);
}

#[test]
fn zoom_relayouts_handles() {
    let mut e = engine();
    let id = e.add(sized("a.png", 0.0, 0.0, 100.0, 50.0), false);
    e.select(&id);
    e.viewport_mut().camera.zoom = 0.25;
    e.take_notifications();
    e.on_zoom();
    assert_eq!(e.collection().handle_size(), 20.0);
    assert_eq!(kinds(&mut e), vec!["zoom"]);
}

#[test]
fn pan_is_announced() {
    let mut e = engine();
    e.on_pan();
    assert_eq!(kinds(&mut e), vec!["pan"]);
}

#[test]
fn viewport_load_matches_surface() {
    let mut e = engine();
    e.set_pixel_ratio(2.0);
    e.on_viewport_load();
    assert_eq!((e.surface().device_width, e.surface().device_height), (1600.0, 1200.0));
    assert_eq!(kinds(&mut e), vec!["load"]);
}

#[test]
fn window_resize_burst_fires_once() {
    let mut e = engine();
    let t0 = Instant::now();
    e.on_viewport_load();
    let queries = e.viewport().container_queries();

    e.on_window_resize(t0);
    e.on_window_resize(t0 + Duration::from_millis(40));
    e.viewport_mut().container.width = 1000.0;
    assert!(!e.tick(t0 + Duration::from_millis(100)));
    assert!(e.tick(t0 + Duration::from_millis(140)));
    assert!(!e.tick(t0 + Duration::from_millis(500)));

    assert_eq!(e.viewport().container_queries(), queries + 1);
    assert_eq!(e.surface().css_width, 1000.0);
    assert_eq!(kinds(&mut e), vec!["load", "viewport-resized"]);
}

// =============================================================
// Pointer flow
// =============================================================

#[test]
fn drag_through_engine() {
    let mut e = engine();
    let id = e.add(sized("a.png", 0.0, 0.0, 100.0, 50.0), false);
    e.take_notifications();

    let down = e.pointer_event(Point::new(50.0, 25.0));
    assert_eq!(e.on_pointer_down(&down), Dispatch::Consumed);
    assert!(!e.viewport().flags.panning);
    let mv = e.pointer_event(Point::new(70.0, 30.0));
    assert_eq!(e.on_pointer_move(&mv), Dispatch::Consumed);
    assert_eq!(e.on_pointer_up(&mv), Dispatch::Consumed);

    assert_eq!(e.image(&id).unwrap().bounds, Rect::new(20.0, 5.0, 100.0, 50.0));
    assert_eq!(kinds(&mut e), vec!["selection", "selection-changed", "position", "move-completed"]);
    assert_eq!(e.viewport().flags, InteractionFlags::default());
}

#[test]
fn escape_through_engine() {
    let mut e = engine();
    let id = e.add(sized("a.png", 0.0, 0.0, 100.0, 50.0), false);
    let down = e.pointer_event(Point::new(50.0, 25.0));
    let _ = e.on_pointer_down(&down);
    let mv = e.pointer_event(Point::new(70.0, 30.0));
    let _ = e.on_pointer_move(&mv);
    assert_eq!(e.on_key_down(&Key("Escape".into())), Dispatch::Consumed);
    assert_eq!(e.image(&id).unwrap().bounds, Rect::new(0.0, 0.0, 100.0, 50.0));
    assert!(e.gesture().is_idle());
}

#[test]
fn focus_loss_through_engine() {
    let mut e = engine();
    e.add(sized("a.png", 0.0, 0.0, 100.0, 50.0), false);
    let down = e.pointer_event(Point::new(50.0, 25.0));
    let _ = e.on_pointer_down(&down);
    let mv = e.pointer_event(Point::new(60.0, 25.0));
    let _ = e.on_pointer_move(&mv);
    e.take_notifications();
    e.on_focus_lost();
    assert_eq!(kinds(&mut e), vec!["move-completed"]);
    assert_eq!(e.viewport().flags, InteractionFlags::default());
}

#[test]
fn locking_mid_drag_ends_the_gesture() {
    let mut e = engine();
    let id = e.add(sized("a.png", 0.0, 0.0, 100.0, 50.0), false);
    let down = e.pointer_event(Point::new(50.0, 25.0));
    let _ = e.on_pointer_down(&down);
    e.set_locked(&id, true);
    assert!(e.gesture().is_idle());
    assert!(e.selected_image().is_none());
    assert_eq!(e.viewport().flags, InteractionFlags::default());
}

#[test]
fn removing_mid_drag_restores_flags() {
    let mut e = engine();
    let id = e.add(sized("a.png", 0.0, 0.0, 100.0, 50.0), false);
    let down = e.pointer_event(Point::new(50.0, 25.0));
    let _ = e.on_pointer_down(&down);
    e.remove(&id);
    assert!(e.gesture().is_idle());
    assert_eq!(e.viewport().flags, InteractionFlags::default());
}

// =============================================================
// Teardown
// =============================================================

#[test]
fn destroy_mid_gesture_restores_flags_once() {
    let mut e = engine();
    e.add(sized("a.png", 0.0, 0.0, 100.0, 50.0), false);
    let down = e.pointer_event(Point::new(50.0, 25.0));
    let _ = e.on_pointer_down(&down);
    e.take_notifications();

    e.destroy();
    e.destroy();
    assert!(e.is_destroyed());
    assert_eq!(e.viewport().flags, InteractionFlags::default());
    assert_eq!(kinds(&mut e), vec!["destroy"]);
}

#[test]
fn destroyed_engine_ignores_host_events() {
    let mut e = engine();
    e.add(sized("a.png", 0.0, 0.0, 100.0, 50.0), false);
    e.destroy();
    e.take_notifications();

    let down = e.pointer_event(Point::new(50.0, 25.0));
    assert_eq!(e.on_pointer_down(&down), Dispatch::Continue);
    e.on_pan();
    e.on_window_resize(Instant::now());
    assert!(!e.tick(Instant::now() + Duration::from_secs(1)));
    assert!(kinds(&mut e).is_empty());
}

// =============================================================
// Notifications
// =============================================================

#[test]
fn notification_kind_matches_serialized_tag() {
    let id = OverlayId::generate();
    let r = Rect::new(0.0, 0.0, 1.0, 1.0);
    let all = [
        Notification::Load,
        Notification::Pan,
        Notification::Zoom,
        Notification::Render,
        Notification::ViewportResized,
        Notification::Selection { id: id.clone() },
        Notification::SelectionChanged { selected: None },
        Notification::Deselected { id: id.clone() },
        Notification::Position { id: id.clone() },
        Notification::Resize { id: id.clone() },
        Notification::Add { id: id.clone() },
        Notification::Remove { id: id.clone() },
        Notification::Changed { id: id.clone() },
        Notification::MoveCompleted { id: id.clone(), before: r, after: r },
        Notification::ResizeCompleted { id, before: r, after: r },
        Notification::Destroy,
    ];
    for n in all {
        let value = serde_json::to_value(&n).unwrap();
        assert_eq!(value["type"], n.kind(), "{n:?}");
    }
}

#[test]
fn move_completed_serializes_bounds() {
    let id = OverlayId::generate();
    let n = Notification::MoveCompleted {
        id: id.clone(),
        before: Rect::new(0.0, 0.0, 10.0, 10.0),
        after: Rect::new(5.0, 0.0, 10.0, 10.0),
    };
    let value = serde_json::to_value(&n).unwrap();
    assert_eq!(value["after"]["x"], 5.0);
    assert_eq!(value["id"], id.to_string());
}
