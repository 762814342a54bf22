//! # ShapeKit Scene
//!
//! Shapes on a 2D drawing surface, and the machinery that makes them
//! interactive:
//!
//! - [`transform`]: effective position and device matrix of a shape
//! - [`model`]: the shape variants and their hit-tests
//! - [`render`]: the drawing-surface contract and two built-in surfaces
//! - [`side_table`]: handler lists and markers keyed by shape or surface
//! - [`event_router`]: hover, focus and click routing of pointer input
//! - [`drag`]: the drag gesture state machine
//! - [`key_router`]: keyboard bindings and the active surface
//! - [`scene`]: the [`Scene`] tying it all together
//!
//! ```rust,ignore
//! use shapekit_scene::{handler, EventType, PointerInput, Scene};
//!
//! let mut scene = Scene::headless(200, 200);
//! scene.add_rect(10.0, 10.0, 50.0, 50.0);
//! scene.bind(EventType::MouseDown, handler(|_, e| {
//!     println!("down at {}, {}", e.x, e.y);
//!     Ok(true)
//! }));
//! scene.dispatch_pointer(&PointerInput::down(20.0, 20.0))?;
//! ```

pub mod drag;
pub mod event;
pub mod event_router;
pub mod input;
pub mod key_router;
pub mod model;
pub mod render;
pub mod scene;
pub mod selector;
pub mod side_table;
pub mod style;
pub mod transform;

pub use drag::{DragCallbacks, DragPhase};
pub use event::{
    handler, Dispatch, Event, EventType, Handler, HandlerList, KeyInput, KeyPhase, Modifiers,
    MouseButton, PointerInput, PointerKind, PointerPhase,
};
pub use input::{InputContext, SurfaceId};
pub use key_router::{canonicalize_binding, KeyBindingTable};
pub use model::{
    ArcShape, AttrValue, CircleShape, EllipseShape, ImageShape, LineShape, PathCommand,
    PathShape, Property, RectShape, Shape, ShapeBase, ShapeId, ShapeKind, TextShape,
};
pub use render::{NullContext, PathProbe, PixmapContext, RenderContext};
pub use scene::{DrawHook, FrameTicket, LoopCallback, Scene};
pub use selector::Selector;
pub use side_table::{Bag, Owner, SideTable};
pub use style::{Color, Font, Shadow, Style};
pub use transform::{device_transform, effective_position, TransformAttrs};
