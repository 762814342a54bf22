use std::cell::Cell;
use std::rc::Rc;

use shapekit_scene::{
    handler, EventType, InputContext, KeyInput, KeyPhase, Modifiers, PathProbe, PointerInput,
    Scene,
};

use crate::support::{entries, log, record, scene};

/// Give `scene` the keyboard with a pointer-down on empty space.
fn activate(scene: &mut Scene) {
    scene
        .dispatch_pointer(&PointerInput::down(199.0, 199.0))
        .unwrap();
    scene.dispatch_pointer(&PointerInput::up(199.0, 199.0)).unwrap();
}

fn binding_log(scene: &mut Scene, combo: &str) -> crate::support::Log {
    let events = log();
    let sink = events.clone();
    scene.bind_key(
        KeyPhase::KeyDown,
        combo,
        handler(move |_, e| {
            sink.borrow_mut().push(e.binding.clone().unwrap_or_default());
            Ok(true)
        }),
    );
    events
}

#[test]
fn test_modifier_combo_resolves() {
    let mut scene = scene();
    let events = binding_log(&mut scene, "Shift+Ctrl+S");
    activate(&mut scene);

    let save = KeyInput::down(83).with_modifiers(Modifiers {
        ctrl: true,
        shift: true,
        ..Modifiers::NONE
    });
    let dispatch = scene.dispatch_key(&save).unwrap();
    assert_eq!(dispatch.invoked, 1);
    scene.dispatch_key(&KeyInput::down(83)).unwrap();
    assert_eq!(entries(&events), vec!["ctrl+shift+s"]);
}

#[test]
fn test_key_event_carries_timestamp() {
    let mut scene = scene();
    let seen = Rc::new(Cell::new(0.0));
    let sink = seen.clone();
    scene.bind_key(
        KeyPhase::KeyDown,
        "escape",
        handler(move |_, e| {
            sink.set(e.timestamp);
            Ok(true)
        }),
    );
    activate(&mut scene);

    scene.dispatch_key(&KeyInput::down(27).at(1250.0)).unwrap();
    assert_eq!(seen.get(), 1250.0);
}

#[test]
fn test_meta_counts_as_ctrl() {
    let mut scene = scene();
    let events = binding_log(&mut scene, "cmd+z");
    activate(&mut scene);

    let undo = KeyInput::down(90).with_modifiers(Modifiers {
        meta: true,
        ..Modifiers::NONE
    });
    scene.dispatch_key(&undo).unwrap();
    assert_eq!(entries(&events), vec!["ctrl+z"]);
}

#[test]
fn test_shift_digit_matches_either_report() {
    let mut scene = scene();
    let events = binding_log(&mut scene, "shift+4");
    activate(&mut scene);

    let digit = KeyInput::down(52).with_char('4').with_modifiers(Modifiers::shift());
    let symbol = KeyInput::down(52).with_char('$').with_modifiers(Modifiers::shift());
    scene.dispatch_key(&digit).unwrap();
    scene.dispatch_key(&symbol).unwrap();
    assert_eq!(entries(&events), vec!["shift+4", "shift+4"]);
}

#[test]
fn test_bare_symbol_binding_with_shift() {
    let mut scene = scene();
    let events = binding_log(&mut scene, "$");
    activate(&mut scene);

    let symbol = KeyInput::down(52).with_char('4').with_modifiers(Modifiers::shift());
    scene.dispatch_key(&symbol).unwrap();
    assert_eq!(entries(&events), vec!["$"]);
}

#[test]
fn test_special_keys_by_name() {
    let mut scene = scene();
    let esc = binding_log(&mut scene, "Escape");
    let f5 = binding_log(&mut scene, "f5");
    activate(&mut scene);

    scene.dispatch_key(&KeyInput::down(27)).unwrap();
    scene.dispatch_key(&KeyInput::down(116)).unwrap();
    assert_eq!(entries(&esc), vec!["esc"]);
    assert_eq!(entries(&f5), vec!["f5"]);
}

#[test]
fn test_any_binding_is_fallback() {
    let mut scene = scene();
    let exact = binding_log(&mut scene, "a");
    let any = log();
    scene.bind_any_key(KeyPhase::KeyDown, record(&any, "any"));
    activate(&mut scene);

    scene.dispatch_key(&KeyInput::down(65)).unwrap();
    scene.dispatch_key(&KeyInput::down(66)).unwrap();
    assert_eq!(entries(&exact), vec!["a"]);
    assert_eq!(entries(&any), vec!["any"]);
}

#[test]
fn test_bind_with_key_event_type_binds_any_key() {
    let mut scene = scene();
    let events = log();
    scene.bind(EventType::KeyUp, record(&events, "up"));
    activate(&mut scene);

    scene.dispatch_key(&KeyInput::down(65)).unwrap();
    scene.dispatch_key(&KeyInput::new(KeyPhase::KeyUp, 65)).unwrap();
    assert_eq!(entries(&events), vec!["up"]);
}

#[test]
fn test_keyup_reuses_keydown_code() {
    let mut scene = scene();
    let events = log();
    let sink = events.clone();
    scene.bind_key(
        KeyPhase::KeyUp,
        "esc",
        handler(move |_, e| {
            sink.borrow_mut().push(e.event_type.to_string());
            Ok(true)
        }),
    );
    activate(&mut scene);

    scene.dispatch_key(&KeyInput::down(27)).unwrap();
    scene.dispatch_key(&KeyInput::new(KeyPhase::KeyUp, 0)).unwrap();
    assert_eq!(entries(&events), vec!["keyup"]);
    assert_eq!(scene.input_context().borrow().last_key_code(), Some(27));
}

#[test]
fn test_keys_go_to_active_surface_only() {
    let ctx = InputContext::new().shared();
    let mut first = Scene::with_context(PathProbe::new(100, 100), ctx.clone()).unwrap();
    let mut second = Scene::with_context(PathProbe::new(100, 100), ctx.clone()).unwrap();
    let one = log();
    let two = log();
    first.bind_key(KeyPhase::KeyDown, "x", record(&one, "first"));
    second.bind_key(KeyPhase::KeyDown, "x", record(&two, "second"));

    let x = KeyInput::down(88);
    first.dispatch_key(&x).unwrap();
    second.dispatch_key(&x).unwrap();
    assert!(entries(&one).is_empty() && entries(&two).is_empty());

    second.dispatch_pointer(&PointerInput::down(5.0, 5.0)).unwrap();
    assert_eq!(ctx.borrow().active_surface(), Some(second.surface_id()));
    first.dispatch_key(&x).unwrap();
    second.dispatch_key(&x).unwrap();
    assert!(entries(&one).is_empty());
    assert_eq!(entries(&two), vec!["second"]);

    first.dispatch_pointer(&PointerInput::down(5.0, 5.0)).unwrap();
    first.dispatch_key(&x).unwrap();
    second.dispatch_key(&x).unwrap();
    assert_eq!(entries(&one), vec!["first"]);
    assert_eq!(entries(&two).len(), 1);
}

#[test]
fn test_global_key_events_ignore_focus() {
    let ctx = InputContext::new().shared();
    let mut owner = Scene::with_context(PathProbe::new(100, 100), ctx.clone()).unwrap();
    let mut global = Scene::with_context(PathProbe::new(100, 100), ctx.clone()).unwrap();
    let events = log();
    global
        .set_global_key_events(true)
        .bind_key(KeyPhase::KeyDown, "g", record(&events, "g"));

    owner.dispatch_pointer(&PointerInput::down(5.0, 5.0)).unwrap();
    global.dispatch_key(&KeyInput::down(71)).unwrap();
    ctx.borrow_mut().pointer_down_elsewhere();
    global.dispatch_key(&KeyInput::down(71)).unwrap();
    assert_eq!(entries(&events), vec!["g", "g"]);
    assert!(global.global_key_events());
}

#[test]
fn test_pointer_down_elsewhere_releases_keyboard() {
    let mut scene = scene();
    let events = binding_log(&mut scene, "k");
    activate(&mut scene);
    scene.input_context().borrow_mut().pointer_down_elsewhere();

    let dispatch = scene.dispatch_key(&KeyInput::down(75)).unwrap();
    assert!(dispatch.is_empty());
    assert!(entries(&events).is_empty());
    // The code is remembered even when nothing is listening.
    assert_eq!(scene.input_context().borrow().last_key_code(), Some(75));
}

#[test]
fn test_key_handler_error_propagates() {
    let mut scene = scene();
    scene.bind_key(
        KeyPhase::KeyDown,
        "q",
        handler(|_, _| Err(anyhow::anyhow!("quit refused"))),
    );
    activate(&mut scene);
    let err = scene.dispatch_key(&KeyInput::down(81)).unwrap_err();
    assert!(err.is_handler_error());
    assert!(err.to_string().contains("quit refused"));
}

#[test]
fn test_key_dispatch_redraws_unless_playing() {
    let mut scene = scene();
    let draws = Rc::new(Cell::new(0u32));
    let counter = draws.clone();
    scene.before_draw(move |_| counter.set(counter.get() + 1));
    scene.bind_key(KeyPhase::KeyDown, "r", handler(|_, _| Ok(true)));
    activate(&mut scene);

    let before = draws.get();
    scene.dispatch_key(&KeyInput::down(82)).unwrap();
    assert_eq!(draws.get(), before + 1);

    scene.start_loop(|_| Ok(()));
    let before = draws.get();
    scene.dispatch_key(&KeyInput::down(82)).unwrap();
    assert_eq!(draws.get(), before);
}
