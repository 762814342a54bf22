use ::image::RgbaImage;
use proptest::prelude::*;
use shapekit_core::Point;
use shapekit_scene::{
    CircleShape, InputContext, NullContext, PathCommand, PathProbe, Scene, ShapeBase,
};

use crate::support::scene;

#[test]
fn test_topmost_rect_wins() {
    let mut scene = scene();
    let _r1 = scene.add_rect(0.0, 0.0, 50.0, 50.0);
    let r2 = scene.add_rect(25.0, 25.0, 50.0, 50.0);
    assert_eq!(scene.hit_test(Point::new(40.0, 40.0)), Some(r2));
}

#[test]
fn test_lower_shape_hit_outside_upper() {
    let mut scene = scene();
    let r1 = scene.add_rect(0.0, 0.0, 50.0, 50.0);
    scene.add_rect(25.0, 25.0, 50.0, 50.0);
    assert_eq!(scene.hit_test(Point::new(10.0, 10.0)), Some(r1));
    assert_eq!(scene.hit_test(Point::new(100.0, 100.0)), None);
}

#[test]
fn test_rect_box_is_corner_anchored_and_scaled() {
    let mut scene = scene();
    let id = scene.add_rect(10.0, 10.0, 20.0, 10.0);
    assert_eq!(scene.hit_test(Point::new(10.0, 10.0)), Some(id));
    assert_eq!(scene.hit_test(Point::new(29.0, 19.0)), Some(id));
    assert_eq!(scene.hit_test(Point::new(31.0, 15.0)), None);

    scene.scale(2.0, 2.0);
    // Origin now maps to (20, 20) and the box is 40 x 20.
    assert_eq!(scene.hit_test(Point::new(15.0, 15.0)), None);
    assert_eq!(scene.hit_test(Point::new(55.0, 35.0)), Some(id));
}

#[test]
fn test_rotated_rect() {
    let mut scene = scene();
    let id = scene.add_rect(0.0, 0.0, 40.0, 10.0);
    scene.translate(100.0, 100.0).rotate(90.0);
    // Rotated a quarter turn clockwise the box extends down from (100, 100).
    assert_eq!(scene.hit_test(Point::new(95.0, 130.0)), Some(id));
    assert_eq!(scene.hit_test(Point::new(130.0, 95.0)), None);
}

#[test]
fn test_rounded_rect_uses_probe() {
    let mut scene = scene();
    let id = scene.add_rect(0.0, 0.0, 40.0, 40.0);
    scene.attr("radius", 15.0).unwrap();
    assert_eq!(scene.hit_test(Point::new(20.0, 20.0)), Some(id));
    // The very corner is cut off by the radius.
    assert_eq!(scene.hit_test(Point::new(1.0, 1.0)), None);
}

#[test]
fn test_skewed_rect_uses_probe() {
    let mut scene = scene();
    let id = scene.add_rect(0.0, 0.0, 10.0, 10.0);
    scene.skew_x(1.0);
    // (0, 10) maps to (10, 10), so (2, 9) falls left of the sheared edge.
    assert_eq!(scene.hit_test(Point::new(15.0, 9.0)), Some(id));
    assert_eq!(scene.hit_test(Point::new(2.0, 9.0)), None);
}

#[test]
fn test_circle_distance_and_stroke() {
    let mut scene = scene();
    let id = scene.add_circle(50.0, 50.0, 10.0);
    assert_eq!(scene.hit_test(Point::new(59.0, 50.0)), Some(id));
    assert_eq!(scene.hit_test(Point::new(61.5, 50.0)), None);

    scene.attr("stroke", "#f00").unwrap();
    scene.attr("line_width", 4.0).unwrap();
    assert_eq!(scene.hit_test(Point::new(61.5, 50.0)), Some(id));
    assert_eq!(scene.hit_test(Point::new(62.5, 50.0)), None);
}

#[test]
fn test_circle_uniform_scale() {
    let mut scene = scene();
    let id = scene.add_circle(0.0, 0.0, 10.0);
    scene.translate(100.0, 100.0).scale(2.0, 2.0);
    assert_eq!(scene.hit_test(Point::new(119.0, 100.0)), Some(id));
    assert_eq!(scene.hit_test(Point::new(121.0, 100.0)), None);
}

#[test]
fn test_circle_non_uniform_scale_uses_probe() {
    let mut scene = scene();
    let id = scene.add_circle(0.0, 0.0, 10.0);
    scene.translate(100.0, 100.0).scale(3.0, 1.0);
    assert_eq!(scene.hit_test(Point::new(125.0, 100.0)), Some(id));
    assert_eq!(scene.hit_test(Point::new(100.0, 112.0)), None);
}

#[test]
fn test_arc_sector() {
    let mut scene = scene();
    let id = scene.add_arc(50.0, 50.0, 20.0, 0.0, 90.0);
    // 0..90 degrees on a y-down surface is the lower-right quarter.
    assert_eq!(scene.hit_test(Point::new(60.0, 60.0)), Some(id));
    assert_eq!(scene.hit_test(Point::new(40.0, 40.0)), None);
    assert_eq!(scene.hit_test(Point::new(40.0, 60.0)), None);
}

#[test]
fn test_arc_stroke_reaches_past_straight_edges() {
    let mut scene = scene();
    let id = scene.add_arc(50.0, 50.0, 20.0, 0.0, 90.0);
    // Just above the 0 degree edge, outside the swept angle.
    assert_eq!(scene.hit_test(Point::new(60.0, 48.0)), None);

    scene.attr("stroke", "#000000").unwrap();
    scene.attr("line_width", 6.0).unwrap();
    assert_eq!(scene.hit_test(Point::new(60.0, 48.0)), Some(id));
    assert_eq!(scene.hit_test(Point::new(48.0, 60.0)), Some(id));
    assert_eq!(scene.hit_test(Point::new(60.0, 45.0)), None);
}

#[test]
fn test_full_arc_behaves_like_circle() {
    let mut scene = scene();
    let id = scene.add_arc(50.0, 50.0, 20.0, 0.0, 360.0);
    assert_eq!(scene.hit_test(Point::new(40.0, 40.0)), Some(id));
    assert_eq!(scene.hit_test(Point::new(75.0, 50.0)), None);
}

#[test]
fn test_ellipse_analytic() {
    let mut scene = scene();
    let id = scene.add_ellipse(100.0, 100.0, 40.0, 10.0);
    assert_eq!(scene.hit_test(Point::new(135.0, 100.0)), Some(id));
    assert_eq!(scene.hit_test(Point::new(100.0, 115.0)), None);
    assert_eq!(scene.hit_test(Point::new(135.0, 108.0)), None);
}

#[test]
fn test_ellipse_non_uniform_scale_uses_probe() {
    let mut scene = scene();
    let id = scene.add_ellipse(0.0, 0.0, 10.0, 10.0);
    scene.translate(100.0, 100.0).scale(1.0, 3.0);
    assert_eq!(scene.hit_test(Point::new(100.0, 125.0)), Some(id));
    assert_eq!(scene.hit_test(Point::new(115.0, 100.0)), None);
}

#[test]
fn test_line_distance() {
    let mut scene = scene();
    let id = scene.add_line(0.0, 0.0, 100.0, 0.0);
    // Default width 1 plus a tolerance of 2.
    assert_eq!(scene.hit_test(Point::new(50.0, 2.5)), Some(id));
    assert_eq!(scene.hit_test(Point::new(50.0, 3.5)), None);
    assert_eq!(scene.hit_test(Point::new(104.0, 0.0)), None);
}

#[test]
fn test_translated_line_follows_transform() {
    let mut scene = scene();
    let id = scene.add_line(0.0, 0.0, 100.0, 0.0);
    scene.translate(0.0, 50.0);
    assert_eq!(scene.hit_test(Point::new(50.0, 50.0)), Some(id));
    assert_eq!(scene.hit_test(Point::new(50.0, 0.0)), None);
}

#[test]
fn test_degenerate_line_never_hits() {
    let mut scene = scene();
    scene.add_line(10.0, 10.0, 10.0, 10.0);
    assert_eq!(scene.hit_test(Point::new(10.0, 10.0)), None);
}

#[test]
fn test_text_box_uses_measured_width() {
    let mut scene = scene();
    let id = scene.add_text(10.0, 10.0, "hello");
    // Five glyphs at 0.6 x 10px each.
    assert_eq!(scene.hit_test(Point::new(39.0, 19.0)), Some(id));
    assert_eq!(scene.hit_test(Point::new(41.0, 15.0)), None);
    assert_eq!(scene.hit_test(Point::new(20.0, 21.0)), None);
}

#[test]
fn test_image_needs_pixels() {
    let mut scene = scene();
    let id = scene.add_image(10.0, 10.0, "logo.png");
    assert_eq!(scene.hit_test(Point::new(12.0, 12.0)), None);

    assert_eq!(scene.notify_image_ready("logo.png", RgbaImage::new(8, 4)), 1);
    assert_eq!(scene.hit_test(Point::new(12.0, 12.0)), Some(id));
    assert_eq!(scene.hit_test(Point::new(12.0, 15.0)), None);
}

#[test]
fn test_path_probe_hit() {
    let mut scene = scene();
    let id = scene.add_path(vec![
        PathCommand::MoveTo { x: 0.0, y: 0.0 },
        PathCommand::LineTo { x: 40.0, y: 0.0 },
        PathCommand::LineTo { x: 0.0, y: 40.0 },
        PathCommand::Close,
    ]);
    assert_eq!(scene.hit_test(Point::new(5.0, 5.0)), Some(id));
    assert_eq!(scene.hit_test(Point::new(30.0, 30.0)), None);

    scene.translate(100.0, 0.0);
    assert_eq!(scene.hit_test(Point::new(105.0, 5.0)), Some(id));
    assert_eq!(scene.hit_test(Point::new(5.0, 5.0)), None);
}

#[test]
fn test_missing_point_in_path_is_fatal() {
    let result = Scene::with_probe(
        Box::new(PathProbe::new(10, 10)),
        Box::new(NullContext::new(10, 10)),
        InputContext::new().shared(),
    );
    let err = result.err().expect("construction must fail");
    assert!(err.is_capability_error());
}

#[test]
fn test_null_surface_with_default_probe_is_fine() {
    let mut scene = Scene::new(NullContext::new(50, 50)).unwrap();
    let id = scene.add(ShapeBase::at(10.0, 10.0), CircleShape::new(5.0));
    assert_eq!(scene.hit_test(Point::new(12.0, 12.0)), Some(id));
}

proptest! {
    #[test]
    fn prop_topmost_wins(
        rects in prop::collection::vec((0.0f64..100.0, 0.0f64..100.0, 1.0f64..60.0, 1.0f64..60.0), 1..12),
        px in 0.0f64..160.0,
        py in 0.0f64..160.0,
    ) {
        let mut scene = scene();
        let mut expected = None;
        for (x, y, w, h) in &rects {
            let id = scene.add_rect(*x, *y, *w, *h);
            let (u, v) = (px - x, py - y);
            if u >= 0.0 && u <= *w && v >= 0.0 && v <= *h {
                expected = Some(id);
            }
        }
        prop_assert_eq!(scene.hit_test(Point::new(px, py)), expected);
    }
}
