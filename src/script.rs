//! Scripted input sessions.
//!
//! A script describes a surface, the shapes on it, a few key bindings and
//! a sequence of raw pointer/key inputs. The demo binary builds the scene
//! on a raster surface, replays the inputs and saves the final frame.
//!
//! ```json
//! {
//!   "width": 200, "height": 120,
//!   "shapes": [
//!     { "shape": { "type": "rect", "width": 40, "height": 30 },
//!       "x": 10, "y": 10, "name": "box", "draggable": true,
//!       "attrs": { "fill": "#3366cc" } }
//!   ],
//!   "keys": [ { "combo": "del", "action": "remove_focused" } ],
//!   "steps": [
//!     { "pointer": { "phase": "down", "x": 20, "y": 20, "button": "left" } },
//!     { "pointer": { "phase": "move", "x": 60, "y": 40 } },
//!     { "pointer": { "phase": "up", "x": 60, "y": 40 } }
//!   ]
//! }
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use shapekit_scene::{
    handler, ArcShape, AttrValue, CircleShape, DragCallbacks, EllipseShape, EventType,
    InputContext, KeyInput, KeyPhase, PathCommand, PixmapContext, PointerInput, RectShape,
    RenderContext, Scene, ShapeBase, ShapeId, Style, TextShape,
};
use shapekit_scene::style::Color;
use shapekit_settings::InteractionSettings;
use std::collections::BTreeMap;
use std::path::Path;

/// Geometry of one scripted shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ShapeSpec {
    Rect {
        width: f64,
        height: f64,
        #[serde(default)]
        radius: f64,
    },
    Ellipse {
        width: f64,
        height: f64,
    },
    Circle {
        radius: f64,
    },
    /// Angles in degrees.
    Arc {
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        #[serde(default)]
        anticlockwise: bool,
    },
    Line {
        x2: f64,
        y2: f64,
    },
    Text {
        text: String,
    },
    /// Positioned by its first `move_to`; `x`/`y` are ignored.
    Path {
        commands: Vec<PathCommand>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeEntry {
    pub shape: ShapeSpec,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub name: Option<String>,
    /// Written through `Scene::attr` after the shape is added.
    #[serde(default)]
    pub attrs: BTreeMap<String, AttrValue>,
    #[serde(default)]
    pub draggable: bool,
}

/// What a scripted key binding does.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    RemoveFocused,
    ZoomIn,
    ZoomOut,
    Log(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyBinding {
    pub combo: String,
    #[serde(default = "default_key_phase")]
    pub phase: KeyPhase,
    pub action: Action,
}

fn default_key_phase() -> KeyPhase {
    KeyPhase::KeyDown
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Pointer(PointerInput),
    Key(KeyInput),
    /// Run this many frames of the loop, then stop it.
    Frames(u32),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Script {
    pub width: u32,
    pub height: u32,
    /// Paint string for the backdrop; `None` or `"none"` leaves it transparent.
    pub background: Option<String>,
    pub settings: InteractionSettings,
    pub shapes: Vec<ShapeEntry>,
    pub keys: Vec<KeyBinding>,
    pub steps: Vec<Step>,
}

impl Default for Script {
    fn default() -> Self {
        Self {
            width: 400,
            height: 300,
            background: Some("#ffffff".to_string()),
            settings: InteractionSettings::default(),
            shapes: Vec::new(),
            keys: Vec::new(),
            steps: Vec::new(),
        }
    }
}

/// Totals gathered while replaying.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Summary {
    pub steps: usize,
    pub handlers: usize,
    pub prevented: usize,
    pub frames: u64,
}

impl Script {
    pub fn parse(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse script")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read script {}", path.display()))?;
        Self::parse(&json).with_context(|| format!("Invalid script {}", path.display()))
    }

    /// Build the scene on a raster surface, with every shape and binding
    /// in place and the first frame drawn.
    pub fn build(&self) -> Result<Scene> {
        self.settings.validate().context("Invalid interaction settings")?;
        let surface = PixmapContext::new(self.width, self.height)
            .with_context(|| format!("Cannot create a {}x{} surface", self.width, self.height))?;
        let input = InputContext::with_settings(self.settings.clone()).shared();
        let mut scene = Scene::with_context(surface, input)?;

        let background = match &self.background {
            Some(paint) => Color::parse_paint(paint)
                .map_err(|e| anyhow::anyhow!(e))
                .context("Invalid background")?,
            None => None,
        };
        if let Some(color) = background {
            let (w, h) = (self.width as f64, self.height as f64);
            scene.before_draw(move |ctx: &mut dyn RenderContext| {
                ctx.apply_style(&Style {
                    fill: Some(color),
                    ..Style::default()
                });
                ctx.begin_path();
                ctx.rect(0.0, 0.0, w, h);
                ctx.fill();
            });
        }

        for (index, entry) in self.shapes.iter().enumerate() {
            add_entry(&mut scene, entry)
                .with_context(|| format!("Shape #{} could not be added", index))?;
        }
        scene.find("*").bind(
            EventType::Click,
            handler(|_, event| {
                tracing::info!("Click on {:?} at ({}, {})", event.target, event.x, event.y);
                Ok(true)
            }),
        );
        for binding in &self.keys {
            scene.bind_key(binding.phase, &binding.combo, action_handler(&binding.action));
        }

        scene.redraw();
        Ok(scene)
    }

    /// Feed every step to `scene`.
    pub fn run(&self, scene: &mut Scene) -> Result<Summary> {
        let mut summary = Summary::default();
        for (index, step) in self.steps.iter().enumerate() {
            let dispatch = match step {
                Step::Pointer(input) => Some(scene.dispatch_pointer(input)),
                Step::Key(input) => Some(scene.dispatch_key(input)),
                Step::Frames(count) => {
                    run_frames(scene, *count).with_context(|| format!("Step #{} failed", index))?;
                    None
                }
            };
            if let Some(dispatch) = dispatch {
                let dispatch = dispatch.with_context(|| format!("Step #{} failed", index))?;
                summary.handlers += dispatch.invoked;
                if dispatch.default_prevented {
                    summary.prevented += 1;
                }
            }
            summary.steps += 1;
        }
        summary.frames = scene.frame_count();
        Ok(summary)
    }
}

fn add_entry(scene: &mut Scene, entry: &ShapeEntry) -> Result<ShapeId> {
    let base = ShapeBase::at(entry.x, entry.y);
    let id = match &entry.shape {
        ShapeSpec::Rect {
            width,
            height,
            radius,
        } => scene.add(base, RectShape::new(*width, *height).with_radius(*radius)),
        ShapeSpec::Ellipse { width, height } => scene.add(base, EllipseShape::new(*width, *height)),
        ShapeSpec::Circle { radius } => scene.add(base, CircleShape::new(*radius)),
        ShapeSpec::Arc {
            radius,
            start_angle,
            end_angle,
            anticlockwise,
        } => scene.add(
            base,
            ArcShape::new(*radius, *start_angle, *end_angle).anticlockwise(*anticlockwise),
        ),
        ShapeSpec::Line { x2, y2 } => scene.add_line(entry.x, entry.y, *x2, *y2),
        ShapeSpec::Text { text } => scene.add(base, TextShape::new(text.as_str())),
        ShapeSpec::Path { commands } => scene.add_path(commands.clone()),
    };

    if let Some(name) = &entry.name {
        scene.set_name(name);
    }
    for (name, value) in &entry.attrs {
        scene
            .attr(name, value.clone())
            .with_context(|| format!("Attribute '{}'", name))?;
    }
    if entry.draggable {
        scene.drag(DragCallbacks::new().on_end(|scene, event| {
            if let Some(id) = event.target {
                let at = scene.shape(id).map(|s| s.position());
                tracing::info!("Dropped {} at {:?}", id, at);
            }
            Ok(())
        }));
    }
    Ok(id)
}

fn action_handler(action: &Action) -> shapekit_scene::Handler {
    match action.clone() {
        Action::RemoveFocused => handler(|scene, _| {
            if let Some(id) = scene.focused() {
                scene.remove(id)?;
            }
            Ok(true)
        }),
        Action::ZoomIn => handler(|scene, _| {
            scene.zoom_in();
            Ok(true)
        }),
        Action::ZoomOut => handler(|scene, _| {
            scene.zoom_out();
            Ok(true)
        }),
        Action::Log(message) => handler(move |_, event| {
            tracing::info!("{} ({:?})", message, event.binding);
            Ok(true)
        }),
    }
}

fn run_frames(scene: &mut Scene, count: u32) -> Result<()> {
    let mut ticket = scene.resume_loop();
    for _ in 0..count {
        match scene.frame(ticket)? {
            Some(next) => ticket = next,
            None => break,
        }
    }
    scene.stop();
    Ok(())
}
