use proptest::prelude::*;
use shapekit_core::Point;
use shapekit_scene::{device_transform, effective_position, PointerInput, TransformAttrs};

use crate::support::{approx, scene};

#[test]
fn test_effective_position_identity() {
    let attrs = TransformAttrs::default();
    assert_eq!(effective_position(3.0, 4.0, &attrs), Point::new(3.0, 4.0));
}

#[test]
fn test_effective_position_scale_rotate_translate() {
    let attrs = TransformAttrs {
        tx: 10.0,
        ty: 5.0,
        scale_x: 2.0,
        scale_y: 2.0,
        rotation: 90.0,
        ..TransformAttrs::default()
    };
    let p = effective_position(1.0, 0.0, &attrs);
    assert!(approx(p.x, 10.0), "x = {}", p.x);
    assert!(approx(p.y, 7.0), "y = {}", p.y);
}

#[test]
fn test_device_transform_matches_effective_position() {
    let attrs = TransformAttrs {
        tx: -4.0,
        ty: 12.0,
        scale_x: 1.5,
        scale_y: 0.5,
        rotation: 33.0,
        ..TransformAttrs::default()
    };
    let m = device_transform(&attrs, 1.0);
    let mapped = m.transform_point(Point::new(7.0, -3.0));
    let expected = effective_position(7.0, -3.0, &attrs);
    assert!(approx(mapped.x, expected.x));
    assert!(approx(mapped.y, expected.y));
}

#[test]
fn test_device_transform_zoom_scales_everything() {
    let attrs = TransformAttrs {
        tx: 10.0,
        ty: 20.0,
        ..TransformAttrs::default()
    };
    let m = device_transform(&attrs, 2.0);
    assert_eq!(m.transform_point(Point::new(1.0, 1.0)), Point::new(22.0, 42.0));
}

#[test]
fn test_device_transform_skew() {
    let attrs = TransformAttrs {
        skew_x: 1.0,
        ..TransformAttrs::default()
    };
    let m = device_transform(&attrs, 1.0);
    assert_eq!(m.transform_point(Point::new(0.0, 10.0)), Point::new(10.0, 10.0));
}

#[test]
fn test_zoomed_pointer_is_normalized() {
    let mut scene = scene();
    scene.zoom_to(2.0).unwrap();
    scene.dispatch_pointer(&PointerInput::moved(100.0, 100.0)).unwrap();
    assert_eq!(scene.pointer_position(), Point::new(50.0, 50.0));
}

#[test]
fn test_origin_offsets_normalization() {
    let mut scene = scene();
    scene.set_origin(10.0, 20.0);
    scene.zoom_to(2.0).unwrap();
    assert_eq!(scene.to_local(30.0, 40.0), Point::new(10.0, 10.0));
}

proptest! {
    #[test]
    fn prop_zoom_inversion(z in 0.05f64..20.0, rx in -1000.0f64..1000.0, ry in -1000.0f64..1000.0) {
        let mut scene = scene();
        scene.zoom_to(z).unwrap();
        let local = scene.to_local(rx, ry);
        prop_assert!((local.x - rx / z).abs() < 1e-9);
        prop_assert!((local.y - ry / z).abs() < 1e-9);
    }

    #[test]
    fn prop_unit_zoom_is_identity(rx in -1000.0f64..1000.0, ry in -1000.0f64..1000.0) {
        let scene = scene();
        prop_assert_eq!(scene.to_local(rx, ry), Point::new(rx, ry));
    }
}
