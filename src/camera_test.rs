#![allow(clippy::float_cmp)]

use super::*;
use crate::viewport::Headless;

const EPSILON: f64 = 1e-10;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn point_approx_eq(a: Point, b: Point) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y)
}

// --- Camera ---

#[test]
fn camera_default_is_identity() {
    let cam = Camera::default();
    assert_eq!(cam.pan_x, 0.0);
    assert_eq!(cam.pan_y, 0.0);
    assert_eq!(cam.zoom, 1.0);
}

#[test]
fn screen_to_world_removes_pan_then_divides_by_zoom() {
    let cam = Camera::new(100.0, 40.0, 2.0);
    let w = cam.screen_to_world(Point::new(300.0, 140.0));
    assert!(point_approx_eq(w, Point::new(100.0, 50.0)));
}

// --- CoordinateBridge ---

#[test]
fn bridge_subtracts_container_origin() {
    let vp = Headless::new(800.0, 600.0)
        .with_container_origin(50.0, 20.0)
        .with_camera(Camera::new(10.0, 10.0, 2.0));
    let mut bridge = CoordinateBridge::new();
    let w = bridge.screen_to_world(Point::new(80.0, 50.0), &vp);
    assert!(point_approx_eq(w, Point::new(10.0, 10.0)));
}

#[test]
fn bridge_queries_container_once_until_invalidated() {
    let vp = Headless::new(800.0, 600.0);
    let mut bridge = CoordinateBridge::new();
    bridge.screen_to_world(Point::new(1.0, 1.0), &vp);
    bridge.screen_to_world(Point::new(2.0, 2.0), &vp);
    bridge.screen_to_world(Point::new(3.0, 3.0), &vp);
    assert_eq!(vp.container_queries(), 1);

    bridge.invalidate();
    assert!(!bridge.is_cached());
    bridge.screen_to_world(Point::new(4.0, 4.0), &vp);
    assert_eq!(vp.container_queries(), 2);
}

#[test]
fn bridge_uses_stale_origin_until_invalidated() {
    let mut vp = Headless::new(800.0, 600.0);
    let mut bridge = CoordinateBridge::new();
    bridge.screen_to_world(Point::new(0.0, 0.0), &vp);

    vp.container.x = 100.0;
    let stale = bridge.screen_to_world(Point::new(100.0, 0.0), &vp);
    assert!(point_approx_eq(stale, Point::new(100.0, 0.0)));

    bridge.invalidate();
    let fresh = bridge.screen_to_world(Point::new(100.0, 0.0), &vp);
    assert!(point_approx_eq(fresh, Point::new(0.0, 0.0)));
}

#[test]
fn bridge_reads_live_pan_and_zoom() {
    let mut vp = Headless::new(800.0, 600.0);
    let mut bridge = CoordinateBridge::new();
    bridge.screen_to_world(Point::new(0.0, 0.0), &vp);
    vp.camera = Camera::new(20.0, 0.0, 2.0);
    let w = bridge.screen_to_world(Point::new(40.0, 0.0), &vp);
    assert!(point_approx_eq(w, Point::new(10.0, 0.0)));
}
