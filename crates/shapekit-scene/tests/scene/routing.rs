use shapekit_core::Point;
use shapekit_scene::{
    handler, EventType, InputContext, MouseButton, PathProbe, PixmapContext, PointerInput, Scene,
};
use shapekit_settings::{HoverTracking, InteractionSettings};

use crate::support::{entries, log, record, record_type, scene};

fn tracking_scene() -> Scene {
    let settings = InteractionSettings {
        hover_tracking: HoverTracking::Always,
        ..InteractionSettings::default()
    };
    Scene::with_context(
        PathProbe::new(200, 200),
        InputContext::with_settings(settings).shared(),
    )
    .unwrap()
}

#[test]
fn test_hover_enter_and_leave() {
    let mut scene = scene();
    let a = scene.add_rect(0.0, 0.0, 50.0, 50.0);
    let events = log();
    scene.bind(EventType::MouseOver, record(&events, "over"));
    scene.bind(EventType::MouseOut, record(&events, "out"));
    scene.bind(EventType::MouseMove, record(&events, "move"));

    scene.dispatch_pointer(&PointerInput::moved(10.0, 10.0)).unwrap();
    scene.dispatch_pointer(&PointerInput::moved(20.0, 20.0)).unwrap();
    scene.dispatch_pointer(&PointerInput::moved(150.0, 150.0)).unwrap();

    let id = a.raw();
    assert_eq!(
        entries(&events),
        vec![
            format!("over:{}", id),
            format!("move:{}", id),
            format!("move:{}", id),
            format!("out:{}", id),
        ]
    );
    assert_eq!(scene.hovered(), None);
}

#[test]
fn test_hover_transfer_is_out_then_over() {
    let mut scene = tracking_scene();
    let a = scene.add_rect(0.0, 0.0, 50.0, 50.0);
    let b = scene.add_rect(100.0, 0.0, 50.0, 50.0);
    let events = log();
    scene.find("rect");
    scene.bind(EventType::MouseOver, record(&events, "over"));
    scene.bind(EventType::MouseOut, record(&events, "out"));

    scene.dispatch_pointer(&PointerInput::moved(10.0, 10.0)).unwrap();
    events.borrow_mut().clear();
    scene.dispatch_pointer(&PointerInput::moved(110.0, 10.0)).unwrap();

    assert_eq!(
        entries(&events),
        vec![format!("out:{}", a.raw()), format!("over:{}", b.raw())]
    );
    assert_eq!(scene.hovered(), Some(b));
}

#[test]
fn test_lazy_hover_tracking_starts_on_first_bind() {
    let mut scene = scene();
    scene.add_rect(0.0, 0.0, 50.0, 50.0);
    scene.dispatch_pointer(&PointerInput::moved(10.0, 10.0)).unwrap();
    assert_eq!(scene.hovered(), None);
    assert!(!scene.input_context().borrow().hover_tracking());

    scene.bind(EventType::MouseOut, record(&log(), "out"));
    assert!(scene.input_context().borrow().hover_tracking());
    scene.dispatch_pointer(&PointerInput::moved(11.0, 10.0)).unwrap();
    assert!(scene.hovered().is_some());
}

#[test]
fn test_no_hover_change_while_pressed() {
    let mut scene = tracking_scene();
    let a = scene.add_rect(0.0, 0.0, 50.0, 50.0);
    scene.add_rect(100.0, 0.0, 50.0, 50.0);

    scene.dispatch_pointer(&PointerInput::down(10.0, 10.0)).unwrap();
    scene.dispatch_pointer(&PointerInput::moved(110.0, 10.0)).unwrap();
    assert_eq!(scene.hovered(), Some(a));

    scene.dispatch_pointer(&PointerInput::up(110.0, 10.0)).unwrap();
    scene.dispatch_pointer(&PointerInput::moved(111.0, 10.0)).unwrap();
    assert_ne!(scene.hovered(), Some(a));
}

#[test]
fn test_down_focus_and_blur_order() {
    let mut scene = scene();
    let a = scene.add_rect(0.0, 0.0, 50.0, 50.0);
    let b = scene.add_rect(100.0, 0.0, 50.0, 50.0);
    let events = log();
    scene.find("*");
    scene.bind(EventType::MouseDown, record(&events, "down"));
    scene.bind(EventType::Focus, record(&events, "focus"));
    scene.bind(EventType::Blur, record(&events, "blur"));

    scene.dispatch_pointer(&PointerInput::down(10.0, 10.0)).unwrap();
    assert_eq!(scene.focused(), Some(a));
    scene.dispatch_pointer(&PointerInput::down(110.0, 10.0)).unwrap();
    assert_eq!(scene.focused(), Some(b));
    scene.dispatch_pointer(&PointerInput::down(110.0, 11.0)).unwrap();
    scene.dispatch_pointer(&PointerInput::down(190.0, 190.0)).unwrap();
    assert_eq!(scene.focused(), None);

    let (a, b) = (a.raw(), b.raw());
    assert_eq!(
        entries(&events),
        vec![
            format!("down:{}", a),
            format!("focus:{}", a),
            format!("down:{}", b),
            format!("focus:{}", b),
            format!("blur:{}", a),
            format!("down:{}", b),
            format!("blur:{}", b),
        ]
    );
}

#[test]
fn test_down_resolves_fresh_target() {
    let mut scene = scene();
    let a = scene.add_rect(0.0, 0.0, 50.0, 50.0);
    let b = scene.add_rect(100.0, 0.0, 50.0, 50.0);
    let events = log();
    scene.find("*");
    scene.bind(EventType::MouseDown, record(&events, "down"));

    scene.dispatch_pointer(&PointerInput::down(10.0, 10.0)).unwrap();
    scene.dispatch_pointer(&PointerInput::up(10.0, 10.0)).unwrap();
    // No move in between: the down still lands on b.
    scene.dispatch_pointer(&PointerInput::down(110.0, 10.0)).unwrap();
    assert_eq!(
        entries(&events),
        vec![format!("down:{}", a.raw()), format!("down:{}", b.raw())]
    );
}

#[test]
fn test_button_only_visible_during_down() {
    let mut scene = scene();
    scene.add_rect(0.0, 0.0, 50.0, 50.0);
    let buttons = log();
    let seen = buttons.clone();
    let h = handler(move |_, e| {
        seen.borrow_mut().push(format!("{}={:?}", e.event_type, e.button));
        Ok(true)
    });
    scene.bind(EventType::MouseDown, h.clone());
    scene.bind(EventType::MouseUp, h);

    scene
        .dispatch_pointer(&PointerInput::down(10.0, 10.0).with_button(MouseButton::Right))
        .unwrap();
    scene.dispatch_pointer(&PointerInput::up(10.0, 10.0)).unwrap();
    assert_eq!(
        entries(&buttons),
        vec!["mousedown=Some(Right)".to_string(), "mouseup=None".to_string()]
    );
}

#[test]
fn test_touch_synthesizes_click_and_double_click() {
    let mut scene = scene();
    scene.add_rect(0.0, 0.0, 50.0, 50.0);
    let events = log();
    scene.bind(EventType::Click, record_type(&events));
    scene.bind(EventType::DblClick, record_type(&events));

    scene.dispatch_pointer(&PointerInput::down(10.0, 10.0).touch().at(0.0)).unwrap();
    scene.dispatch_pointer(&PointerInput::up(10.0, 10.0).touch().at(100.0)).unwrap();
    scene.dispatch_pointer(&PointerInput::down(10.0, 10.0).touch().at(200.0)).unwrap();
    scene.dispatch_pointer(&PointerInput::up(10.0, 10.0).touch().at(399.0)).unwrap();

    assert_eq!(entries(&events), vec!["click", "click", "dblclick"]);
}

#[test]
fn test_touch_double_click_window_is_exclusive() {
    let mut scene = scene();
    scene.add_rect(0.0, 0.0, 50.0, 50.0);
    let events = log();
    scene.bind(EventType::DblClick, record_type(&events));

    scene.dispatch_pointer(&PointerInput::down(10.0, 10.0).touch()).unwrap();
    scene.dispatch_pointer(&PointerInput::up(10.0, 10.0).touch().at(1000.0)).unwrap();
    scene.dispatch_pointer(&PointerInput::down(10.0, 10.0).touch()).unwrap();
    scene.dispatch_pointer(&PointerInput::up(10.0, 10.0).touch().at(1300.0)).unwrap();

    assert!(entries(&events).is_empty());
}

#[test]
fn test_touch_move_suppresses_click() {
    let mut scene = scene();
    scene.add_rect(0.0, 0.0, 50.0, 50.0);
    let events = log();
    scene.bind(EventType::Click, record_type(&events));
    scene.bind(EventType::MouseUp, record_type(&events));

    scene.dispatch_pointer(&PointerInput::down(10.0, 10.0).touch()).unwrap();
    scene.dispatch_pointer(&PointerInput::moved(12.0, 10.0).touch()).unwrap();
    scene.dispatch_pointer(&PointerInput::up(12.0, 10.0).touch()).unwrap();
    assert_eq!(entries(&events), vec!["mouseup"]);
}

#[test]
fn test_mouse_click_and_dblclick_go_to_hover() {
    let mut scene = scene();
    scene.add_rect(0.0, 0.0, 50.0, 50.0);
    let events = log();
    scene.bind(EventType::Click, record_type(&events));
    scene.bind(EventType::DblClick, record_type(&events));

    scene.dispatch_pointer(&PointerInput::down(10.0, 10.0)).unwrap();
    scene.dispatch_pointer(&PointerInput::up(10.0, 10.0)).unwrap();
    scene.dispatch_pointer(&PointerInput::click(10.0, 10.0)).unwrap();
    scene.dispatch_pointer(&PointerInput::double_click(10.0, 10.0)).unwrap();
    assert_eq!(entries(&events), vec!["click", "dblclick"]);
}

#[test]
fn test_false_prevents_default_but_batch_continues() {
    let mut scene = scene();
    scene.add_rect(0.0, 0.0, 50.0, 50.0);
    let events = log();
    scene.bind(EventType::MouseDown, handler(|_, _| Ok(false)));
    scene.bind(EventType::MouseDown, record(&events, "second"));

    let dispatch = scene.dispatch_pointer(&PointerInput::down(10.0, 10.0)).unwrap();
    assert!(dispatch.default_prevented);
    assert_eq!(dispatch.invoked, 2);
    assert_eq!(entries(&events).len(), 1);
}

#[test]
fn test_handler_error_aborts_batch() {
    let mut scene = scene();
    scene.add_rect(0.0, 0.0, 50.0, 50.0);
    let events = log();
    scene.bind(EventType::MouseDown, handler(|_, _| anyhow::bail!("boom")));
    scene.bind(EventType::Focus, record(&events, "focus"));

    let err = scene
        .dispatch_pointer(&PointerInput::down(10.0, 10.0))
        .unwrap_err();
    assert!(err.is_handler_error());
    assert_eq!(err.to_string(), "boom");
    assert!(entries(&events).is_empty());
}

#[test]
fn test_failed_handler_leaves_surface_painted() {
    let surface = PixmapContext::new(60, 60).unwrap();
    let mut scene = Scene::new(surface).unwrap();
    scene.add_rect(0.0, 0.0, 50.0, 50.0);
    scene.attr("fill", "#ff0000").unwrap();
    scene.bind(EventType::MouseDown, handler(|_, _| anyhow::bail!("boom")));
    scene.redraw();

    assert!(scene
        .dispatch_pointer(&PointerInput::down(10.0, 10.0))
        .is_err());
    let pixels = scene.snapshot().unwrap();
    assert_eq!(pixels.get_pixel(20, 20).0, [255, 0, 0, 255]);
}

#[test]
fn test_shape_handlers_before_surface_handlers() {
    let mut scene = scene();
    scene.add_rect(0.0, 0.0, 50.0, 50.0);
    let events = log();
    scene.bind_live(EventType::MouseDown, "*", record(&events, "live"));
    scene.bind(EventType::MouseDown, record(&events, "shape"));

    let dispatch = scene.dispatch_pointer(&PointerInput::down(10.0, 10.0)).unwrap();
    assert_eq!(dispatch.queued, 2);
    let got: Vec<String> = entries(&events)
        .into_iter()
        .map(|e| e.split(':').next().unwrap_or_default().to_string())
        .collect();
    assert_eq!(got, vec!["shape", "live"]);
}

#[test]
fn test_live_binding_matches_at_dispatch_time() {
    let mut scene = scene();
    let a = scene.add_rect(0.0, 0.0, 50.0, 50.0);
    let events = log();
    scene.bind_live(EventType::MouseDown, "#target", record(&events, "live"));

    scene.dispatch_pointer(&PointerInput::down(10.0, 10.0)).unwrap();
    assert!(entries(&events).is_empty());

    scene.select(&[a]).set_name("target");
    scene.dispatch_pointer(&PointerInput::down(10.0, 10.0)).unwrap();
    assert_eq!(entries(&events), vec![format!("live:{}", a.raw())]);
}

#[test]
fn test_handler_may_remove_its_target() {
    let mut scene = scene();
    let a = scene.add_rect(0.0, 0.0, 50.0, 50.0);
    let events = log();
    scene.bind(
        EventType::MouseDown,
        handler(move |scene, _| {
            scene.remove(a)?;
            Ok(true)
        }),
    );
    scene.bind(EventType::Focus, record(&events, "focus"));

    scene.dispatch_pointer(&PointerInput::down(10.0, 10.0)).unwrap();
    assert!(scene.shape(a).is_none());
    assert!(entries(&events).is_empty());
    assert_eq!(scene.hit_test(Point::new(10.0, 10.0)), None);
}

#[test]
fn test_event_carries_local_coordinates() {
    let mut scene = scene();
    scene.add_rect(0.0, 0.0, 50.0, 50.0);
    scene.zoom_to(2.0).unwrap();
    let seen = log();
    let sink = seen.clone();
    scene.bind(
        EventType::MouseDown,
        handler(move |_, e| {
            sink.borrow_mut().push(format!("{},{}", e.x, e.y));
            Ok(true)
        }),
    );
    scene.dispatch_pointer(&PointerInput::down(60.0, 40.0)).unwrap();
    assert_eq!(entries(&seen), vec!["30,20"]);
}

#[test]
fn test_nothing_queued_means_empty_dispatch() {
    let mut scene = scene();
    scene.add_rect(0.0, 0.0, 50.0, 50.0);
    let dispatch = scene.dispatch_pointer(&PointerInput::down(10.0, 10.0)).unwrap();
    assert!(dispatch.is_empty());
    assert_eq!(dispatch.invoked, 0);
}

#[test]
fn test_bind_named_rejects_unknown_event() {
    let mut scene = scene();
    scene.add_rect(0.0, 0.0, 50.0, 50.0);
    assert!(scene.bind_named("mousedown", record(&log(), "x")).is_ok());
    let err = scene.bind_named("wheel", record(&log(), "x")).err().unwrap();
    assert!(err.is_shape_error());
}
