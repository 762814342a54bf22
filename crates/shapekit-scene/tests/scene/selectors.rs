use shapekit_scene::{EventType, PointerInput};

use crate::support::{entries, log, record, scene};

#[test]
fn test_find_by_type_and_name() {
    let mut scene = scene();
    let a = scene.add_rect(0.0, 0.0, 10.0, 10.0);
    let b = scene.add_circle(50.0, 50.0, 5.0);
    let c = scene.add_rect(100.0, 0.0, 10.0, 10.0);
    scene.select(&[c]).set_name("target");

    assert_eq!(scene.find_all("*"), vec![a, b, c]);
    assert_eq!(scene.find_all("rect"), vec![a, c]);
    assert_eq!(scene.find_all("circle"), vec![b]);
    assert_eq!(scene.find_all("#target"), vec![c]);
    assert!(scene.find_all("#missing").is_empty());
    assert!(scene.find_all("polygon").is_empty());
}

#[test]
fn test_malformed_selectors_match_nothing() {
    let mut scene = scene();
    scene.add_rect(0.0, 0.0, 10.0, 10.0);
    for bad in ["", "#", "Rect", ".rect", "rect, circle", "#a b"] {
        assert!(scene.find_all(bad).is_empty(), "selector {:?}", bad);
    }
    assert!(scene.find("Rect").selection().is_empty());
}

#[test]
fn test_invalid_name_is_ignored() {
    let mut scene = scene();
    let a = scene.add_rect(0.0, 0.0, 10.0, 10.0);
    scene.set_name("first");
    scene.set_name("Not valid");
    assert_eq!(scene.shape(a).unwrap().name(), Some("first"));

    scene.clear_name();
    assert_eq!(scene.shape(a).unwrap().name(), None);
    assert!(scene.find_all("#first").is_empty());
}

#[test]
fn test_find_then_bind_applies_to_all_matches() {
    let mut scene = scene();
    let a = scene.add_rect(0.0, 0.0, 10.0, 10.0);
    let b = scene.add_rect(20.0, 0.0, 10.0, 10.0);
    scene.add_circle(100.0, 100.0, 5.0);
    let events = log();
    scene.find("rect").bind(EventType::MouseDown, record(&events, "down"));

    scene.dispatch_pointer(&PointerInput::down(5.0, 5.0)).unwrap();
    scene.dispatch_pointer(&PointerInput::down(25.0, 5.0)).unwrap();
    scene.dispatch_pointer(&PointerInput::down(100.0, 100.0)).unwrap();
    assert_eq!(
        entries(&events),
        vec![format!("down:{}", a.raw()), format!("down:{}", b.raw())]
    );
}

#[test]
fn test_remove_matching() {
    let mut scene = scene();
    scene.add_rect(0.0, 0.0, 10.0, 10.0);
    let keep = scene.add_circle(50.0, 50.0, 5.0);
    scene.add_rect(100.0, 0.0, 10.0, 10.0);

    assert_eq!(scene.remove_matching("rect").unwrap(), 2);
    assert_eq!(scene.ids(), vec![keep]);
    assert_eq!(scene.remove_matching("bad selector").unwrap(), 0);
    assert_eq!(scene.remove_matching("*").unwrap(), 1);
    assert!(scene.is_empty());
}

#[test]
fn test_select_drops_unknown_ids() {
    let mut scene = scene();
    let a = scene.add_rect(0.0, 0.0, 10.0, 10.0);
    let b = scene.add_rect(20.0, 0.0, 10.0, 10.0);
    scene.remove(b).unwrap();
    assert_eq!(scene.select(&[a, b]).selection(), &[a]);
}
