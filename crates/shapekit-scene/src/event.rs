//! Event types, the event data handed to handlers, and raw host input.

use serde::{Deserialize, Serialize};
use shapekit_core::ShapeError;
use smallvec::SmallVec;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use crate::model::ShapeId;
use crate::scene::Scene;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    MouseMove,
    MouseOver,
    MouseOut,
    MouseDown,
    MouseUp,
    Click,
    DblClick,
    Focus,
    Blur,
    KeyDown,
    KeyPress,
    KeyUp,
}

impl EventType {
    pub const ALL: [EventType; 12] = [
        EventType::MouseMove,
        EventType::MouseOver,
        EventType::MouseOut,
        EventType::MouseDown,
        EventType::MouseUp,
        EventType::Click,
        EventType::DblClick,
        EventType::Focus,
        EventType::Blur,
        EventType::KeyDown,
        EventType::KeyPress,
        EventType::KeyUp,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::MouseMove => "mousemove",
            EventType::MouseOver => "mouseover",
            EventType::MouseOut => "mouseout",
            EventType::MouseDown => "mousedown",
            EventType::MouseUp => "mouseup",
            EventType::Click => "click",
            EventType::DblClick => "dblclick",
            EventType::Focus => "focus",
            EventType::Blur => "blur",
            EventType::KeyDown => "keydown",
            EventType::KeyPress => "keypress",
            EventType::KeyUp => "keyup",
        }
    }

    /// Binding one of these turns hover tracking on.
    pub fn needs_hover_tracking(&self) -> bool {
        matches!(self, EventType::MouseOver | EventType::MouseOut)
    }

    pub fn key_phase(&self) -> Option<KeyPhase> {
        match self {
            EventType::KeyDown => Some(KeyPhase::KeyDown),
            EventType::KeyPress => Some(KeyPhase::KeyPress),
            EventType::KeyUp => Some(KeyPhase::KeyUp),
            _ => None,
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventType {
    type Err = ShapeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ShapeError::UnknownEventType(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerKind {
    #[default]
    Mouse,
    Touch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerPhase {
    Move,
    Down,
    Up,
    Click,
    DoubleClick,
}

/// Raw pointer input in device coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointerInput {
    pub phase: PointerPhase,
    #[serde(default)]
    pub kind: PointerKind,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub button: Option<MouseButton>,
    /// Milliseconds.
    #[serde(default)]
    pub timestamp: f64,
}

impl PointerInput {
    pub fn new(phase: PointerPhase, x: f64, y: f64) -> Self {
        Self {
            phase,
            kind: PointerKind::Mouse,
            x,
            y,
            button: None,
            timestamp: 0.0,
        }
    }

    pub fn moved(x: f64, y: f64) -> Self {
        Self::new(PointerPhase::Move, x, y)
    }

    /// Primary-button press.
    pub fn down(x: f64, y: f64) -> Self {
        Self::new(PointerPhase::Down, x, y).with_button(MouseButton::Left)
    }

    pub fn up(x: f64, y: f64) -> Self {
        Self::new(PointerPhase::Up, x, y).with_button(MouseButton::Left)
    }

    pub fn click(x: f64, y: f64) -> Self {
        Self::new(PointerPhase::Click, x, y).with_button(MouseButton::Left)
    }

    pub fn double_click(x: f64, y: f64) -> Self {
        Self::new(PointerPhase::DoubleClick, x, y).with_button(MouseButton::Left)
    }

    pub fn with_button(mut self, button: MouseButton) -> Self {
        self.button = Some(button);
        self
    }

    pub fn touch(mut self) -> Self {
        self.kind = PointerKind::Touch;
        self
    }

    pub fn at(mut self, timestamp: f64) -> Self {
        self.timestamp = timestamp;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyPhase {
    KeyDown,
    KeyPress,
    KeyUp,
}

impl KeyPhase {
    pub fn event_type(&self) -> EventType {
        match self {
            KeyPhase::KeyDown => EventType::KeyDown,
            KeyPhase::KeyPress => EventType::KeyPress,
            KeyPhase::KeyUp => EventType::KeyUp,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    pub alt: bool,
    pub ctrl: bool,
    pub meta: bool,
    pub shift: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        alt: false,
        ctrl: false,
        meta: false,
        shift: false,
    };

    pub fn shift() -> Self {
        Self {
            shift: true,
            ..Self::NONE
        }
    }

    pub fn ctrl() -> Self {
        Self {
            ctrl: true,
            ..Self::NONE
        }
    }

    /// Binding prefix in canonical order; meta counts as ctrl.
    pub fn prefix(&self) -> String {
        let mut out = String::new();
        if self.alt {
            out.push_str("alt+");
        }
        if self.ctrl || self.meta {
            out.push_str("ctrl+");
        }
        if self.shift {
            out.push_str("shift+");
        }
        out
    }
}

/// Raw keyboard input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyInput {
    pub phase: KeyPhase,
    pub code: u32,
    #[serde(default)]
    pub character: Option<char>,
    #[serde(default)]
    pub modifiers: Modifiers,
    /// Milliseconds.
    #[serde(default)]
    pub timestamp: f64,
}

impl KeyInput {
    pub fn new(phase: KeyPhase, code: u32) -> Self {
        Self {
            phase,
            code,
            character: None,
            modifiers: Modifiers::NONE,
            timestamp: 0.0,
        }
    }

    pub fn down(code: u32) -> Self {
        Self::new(KeyPhase::KeyDown, code)
    }

    pub fn with_char(mut self, character: char) -> Self {
        self.character = Some(character);
        self
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn at(mut self, timestamp: f64) -> Self {
        self.timestamp = timestamp;
        self
    }
}

/// What a handler sees.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub event_type: EventType,
    /// `None` for key events.
    pub target: Option<ShapeId>,
    /// Local (pre-zoom) pointer position.
    pub x: f64,
    pub y: f64,
    pub last_x: f64,
    pub last_y: f64,
    /// Button pressed in this dispatch; only set while a down is dispatched.
    pub button: Option<MouseButton>,
    pub pointer: PointerKind,
    pub timestamp: f64,
    /// Canonical binding that matched, for key events.
    pub binding: Option<String>,
}

impl Event {
    pub fn dx(&self) -> f64 {
        self.x - self.last_x
    }

    pub fn dy(&self) -> f64 {
        self.y - self.last_y
    }
}

/// Outcome of one input dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Dispatch {
    /// Handler lists queued.
    pub queued: usize,
    /// Handlers invoked.
    pub invoked: usize,
    /// Some handler returned `false`.
    pub default_prevented: bool,
}

impl Dispatch {
    pub fn is_empty(&self) -> bool {
        self.queued == 0
    }
}

/// Event callback. Returning `Ok(false)` prevents the default action
/// without stopping the rest of the batch; an error aborts the batch.
pub type Handler = Rc<dyn Fn(&mut Scene, &Event) -> anyhow::Result<bool>>;

pub type HandlerList = SmallVec<[Handler; 2]>;

pub fn handler<F>(f: F) -> Handler
where
    F: Fn(&mut Scene, &Event) -> anyhow::Result<bool> + 'static,
{
    Rc::new(f)
}
