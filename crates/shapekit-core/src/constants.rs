//! Interaction constants.
//!
//! These are the built-in defaults; `shapekit-settings` can override
//! every one of them per input context.

/// Two touch releases on the same target closer than this (in ms) form a double click.
pub const DOUBLE_CLICK_WINDOW_MS: f64 = 300.0;

/// Extra distance, in local units, added to a line's width when hit-testing it.
pub const LINE_HIT_TOLERANCE: f64 = 2.0;

/// Increment used by zoom-in and zoom-out.
pub const ZOOM_STEP: f64 = 0.1;

/// Bézier control-point factor for approximating a quarter ellipse.
pub const ELLIPSE_KAPPA: f64 = 0.552_284_749_830_793_3;

/// Average glyph advance as a fraction of the font size, used when a
/// surface has no font metrics.
pub const AVERAGE_GLYPH_ADVANCE: f64 = 0.6;
