//! # ShapeKit
//!
//! Interaction engine for shapes drawn on a 2D surface: hit-testing,
//! hover/focus/click routing, drag gestures and keyboard bindings.
//!
//! ## Architecture
//!
//! ShapeKit is organized as a workspace with multiple crates:
//!
//! 1. **shapekit-core** - Errors, geometry primitives, shared constants
//! 2. **shapekit-settings** - Interaction settings (TOML/JSON)
//! 3. **shapekit-scene** - Shapes, surfaces, event routing, drag, keys
//! 4. **shapekit** - This crate: logging setup, the replay script format
//!    and the demo binary

pub mod script;

pub use shapekit_core::{Affine, CapabilityError, Error, Point, Result, ShapeError};
pub use shapekit_scene::{
    handler, DragCallbacks, Event, EventType, InputContext, KeyInput, KeyPhase, Modifiers,
    PathProbe, PixmapContext, PointerInput, RenderContext, Scene, ShapeId,
};
pub use shapekit_settings::{HoverTracking, InteractionSettings, SettingsError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("SHAPEKIT_BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Console output on stderr, filtered through `RUST_LOG` with `info` as
/// the fallback directive.
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {}", e))?;

    Ok(())
}
