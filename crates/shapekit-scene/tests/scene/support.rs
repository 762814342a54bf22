//! Helpers shared by the scene integration tests.

use shapekit_core::{shared, SharedVec};
use shapekit_scene::{handler, Handler, Scene};

pub type Log = SharedVec<String>;

pub fn log() -> Log {
    shared(Vec::new())
}

/// Handler that appends `label` (and the target, if any) to `log`.
pub fn record(log: &Log, label: &str) -> Handler {
    let log = log.clone();
    let label = label.to_string();
    handler(move |_, event| {
        let entry = match event.target {
            Some(target) => format!("{}:{}", label, target.raw()),
            None => label.clone(),
        };
        log.borrow_mut().push(entry);
        Ok(true)
    })
}

/// Handler that appends the event type name to `log`.
pub fn record_type(log: &Log) -> Handler {
    let log = log.clone();
    handler(move |_, event| {
        log.borrow_mut().push(event.event_type.to_string());
        Ok(true)
    })
}

pub fn entries(log: &Log) -> Vec<String> {
    log.borrow().clone()
}

pub fn scene() -> Scene {
    Scene::headless(200, 200)
}

pub fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}
