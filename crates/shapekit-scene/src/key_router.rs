//! Keyboard routing.
//!
//! Raw key codes plus modifiers resolve to canonical binding strings such
//! as `ctrl+shift+s`, looked up in the per-surface, per-phase tables kept
//! in the side table. Only the surface that received the most recent
//! pointer-down gets key events, unless it opted into global handling.

use std::collections::HashMap;
use std::fmt;

use shapekit_core::Result;

use crate::event::{Dispatch, Event, Handler, HandlerList, KeyInput, KeyPhase, PointerKind};
use crate::scene::Scene;
use crate::side_table::Owner;

/// Wildcard binding.
pub const ANY_KEY: &str = "any";

pub fn special_key_name(code: u32) -> Option<&'static str> {
    let name = match code {
        8 => "backspace",
        9 => "tab",
        13 => "return",
        19 => "pause",
        20 => "capslock",
        27 => "esc",
        32 => "space",
        33 => "pageup",
        34 => "pagedown",
        35 => "end",
        36 => "home",
        37 => "left",
        38 => "up",
        39 => "right",
        40 => "down",
        45 => "insert",
        46 => "del",
        96 => "0",
        97 => "1",
        98 => "2",
        99 => "3",
        100 => "4",
        101 => "5",
        102 => "6",
        103 => "7",
        104 => "8",
        105 => "9",
        106 => "*",
        107 => "+",
        109 => "-",
        110 => ".",
        111 => "/",
        112 => "f1",
        113 => "f2",
        114 => "f3",
        115 => "f4",
        116 => "f5",
        117 => "f6",
        118 => "f7",
        119 => "f8",
        120 => "f9",
        121 => "f10",
        122 => "f11",
        123 => "f12",
        144 => "numlock",
        145 => "scroll",
        187 => "+",
        189 => "-",
        191 => "/",
        _ => return None,
    };
    Some(name)
}

const SHIFT_PAIRS: &[(&str, &str)] = &[
    ("`", "~"),
    ("1", "!"),
    ("2", "@"),
    ("3", "#"),
    ("4", "$"),
    ("5", "%"),
    ("6", "^"),
    ("7", "&"),
    ("8", "*"),
    ("9", "("),
    ("0", ")"),
    ("-", "_"),
    ("=", "+"),
    (";", ":"),
    ("'", "\""),
    (",", "<"),
    (".", ">"),
    ("/", "?"),
    ("\\", "|"),
];

/// Symbol produced by shift on a US layout, e.g. `4` → `$`.
pub fn shifted(key: &str) -> Option<&'static str> {
    SHIFT_PAIRS
        .iter()
        .find(|(plain, _)| *plain == key)
        .map(|(_, symbol)| *symbol)
}

/// Inverse of [`shifted`], e.g. `$` → `4`.
pub fn unshifted(key: &str) -> Option<&'static str> {
    SHIFT_PAIRS
        .iter()
        .find(|(_, symbol)| *symbol == key)
        .map(|(plain, _)| *plain)
}

/// Key name for an event: the special name for `code` if it has one,
/// otherwise the reported character, otherwise the character for `code`,
/// lowercased.
pub fn key_name(code: u32, character: Option<char>) -> String {
    if let Some(name) = special_key_name(code) {
        return name.to_string();
    }
    character
        .or_else(|| char::from_u32(code))
        .map(|c| c.to_lowercase().collect())
        .unwrap_or_default()
}

/// Normalize a user-written combo: lowercase, modifiers in `alt`, `ctrl`,
/// `shift` order, `meta`/`cmd` folded into `ctrl`, and the long names of
/// escape, enter and delete shortened.
pub fn canonicalize_binding(combo: &str) -> String {
    let lower = combo.trim().to_lowercase();
    if lower == ANY_KEY {
        return lower;
    }

    let (mods, key) = if lower == "+" {
        ("", "+")
    } else if let Some(rest) = lower.strip_suffix("++") {
        (rest, "+")
    } else {
        match lower.rfind('+') {
            Some(i) => (&lower[..i], &lower[i + 1..]),
            None => ("", lower.as_str()),
        }
    };

    let (mut alt, mut ctrl, mut shift) = (false, false, false);
    for m in mods.split('+').filter(|m| !m.is_empty()) {
        match m {
            "alt" | "option" => alt = true,
            "ctrl" | "control" | "meta" | "cmd" | "command" => ctrl = true,
            "shift" => shift = true,
            other => {
                tracing::warn!("Unknown modifier '{}' in key binding '{}'", other, combo);
                return lower;
            }
        }
    }

    let key = match key {
        "escape" => "esc",
        "enter" => "return",
        "delete" => "del",
        " " | "spacebar" => "space",
        other => other,
    };

    let mut out = String::with_capacity(lower.len());
    if alt {
        out.push_str("alt+");
    }
    if ctrl {
        out.push_str("ctrl+");
    }
    if shift {
        out.push_str("shift+");
    }
    out.push_str(key);
    out
}

/// Binding string → handler list, for one surface and phase.
#[derive(Default, Clone)]
pub struct KeyBindingTable {
    bindings: HashMap<String, HandlerList>,
}

impl KeyBindingTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(&mut self, combo: &str, handler: Handler) {
        self.bindings
            .entry(canonicalize_binding(combo))
            .or_default()
            .push(handler);
    }

    pub fn bind_any(&mut self, handler: Handler) {
        self.bind(ANY_KEY, handler);
    }

    pub fn contains(&self, combo: &str) -> bool {
        self.bindings.contains_key(&canonicalize_binding(combo))
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// First binding matching `prefix` + `key`:
    ///
    /// 1. the exact combo,
    /// 2. the shifted symbol of `key`, then its unshifted digit or sign,
    /// 3. with shift as the only modifier, the bare symbol,
    /// 4. the wildcard.
    pub fn resolve(&self, prefix: &str, key: &str) -> Option<(String, HandlerList)> {
        let mut candidates = vec![format!("{}{}", prefix, key)];
        if let Some(symbol) = shifted(key) {
            candidates.push(format!("{}{}", prefix, symbol));
        }
        if let Some(plain) = unshifted(key) {
            candidates.push(format!("{}{}", prefix, plain));
        }
        if prefix == "shift+" {
            if let Some(symbol) = shifted(key) {
                candidates.push(symbol.to_string());
            } else if unshifted(key).is_some() {
                candidates.push(key.to_string());
            }
        }
        candidates.push(ANY_KEY.to_string());

        candidates.into_iter().find_map(|binding| {
            self.bindings
                .get(&binding)
                .filter(|list| !list.is_empty())
                .map(|list| (binding.clone(), list.clone()))
        })
    }
}

impl fmt::Debug for KeyBindingTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<_> = self.bindings.keys().collect();
        keys.sort();
        f.debug_struct("KeyBindingTable")
            .field("bindings", &keys)
            .finish()
    }
}

impl Scene {
    /// Bind `handler` to `combo` (e.g. `"ctrl+s"`, `"shift+4"`, `"esc"`)
    /// in the given phase on this surface.
    pub fn bind_key(&mut self, phase: KeyPhase, combo: &str, handler: Handler) -> &mut Self {
        let surface = self.surface_id();
        self.side_table_mut()
            .bag_mut(Owner::Surface(surface))
            .key_table_mut(phase)
            .bind(combo, handler);
        self
    }

    /// Bind `handler` to every key in the given phase.
    pub fn bind_any_key(&mut self, phase: KeyPhase, handler: Handler) -> &mut Self {
        self.bind_key(phase, ANY_KEY, handler)
    }

    pub fn set_global_key_events(&mut self, global: bool) -> &mut Self {
        self.global_key_events = global;
        self
    }

    pub fn global_key_events(&self) -> bool {
        self.global_key_events
    }

    /// Route one key event to this surface's bindings.
    ///
    /// Keypress and keyup reuse the code of the preceding keydown. Nothing
    /// fires unless this surface owns the keyboard or takes global key
    /// events. After the handlers run the surface is redrawn unless a frame
    /// loop is playing.
    pub fn dispatch_key(&mut self, input: &KeyInput) -> Result<Dispatch> {
        let (code, active) = {
            let mut ctx = self.input.borrow_mut();
            if input.phase == KeyPhase::KeyDown {
                ctx.last_key_code = Some(input.code);
            }
            (
                ctx.last_key_code.unwrap_or(input.code),
                ctx.active_surface(),
            )
        };

        if active != Some(self.surface_id()) && !self.global_key_events {
            return Ok(Dispatch::default());
        }

        let key = key_name(code, input.character);
        let prefix = input.modifiers.prefix();
        let resolved = self
            .side_table()
            .get(Owner::Surface(self.surface_id()))
            .and_then(|bag| bag.key_table(input.phase))
            .and_then(|table| table.resolve(&prefix, &key));
        let Some((binding, handlers)) = resolved else {
            tracing::trace!("No binding for {}{} ({})", prefix, key, input.phase.event_type());
            return Ok(Dispatch::default());
        };

        tracing::debug!("Key {} matched '{}'", input.phase.event_type(), binding);
        let pointer = self.pointer_position();
        let event = Event {
            event_type: input.phase.event_type(),
            target: None,
            x: pointer.x,
            y: pointer.y,
            last_x: self.state.last_x,
            last_y: self.state.last_y,
            button: None,
            pointer: PointerKind::Mouse,
            timestamp: input.timestamp,
            binding: Some(binding),
        };

        let mut dispatch = Dispatch {
            queued: 1,
            ..Dispatch::default()
        };
        self.invoke_handlers(&handlers, &event, &mut dispatch)?;
        if !self.is_playing() {
            self.redraw();
        }
        Ok(dispatch)
    }
}
