//! Error handling for ShapeKit
//!
//! Provides the error types used across the scene engine:
//! - Capability errors (rendering surfaces missing a required feature)
//! - Shape errors (attribute access, event names, zoom values)
//!
//! Handler callbacks report failures through `anyhow::Error`, which the
//! top-level [`Error`] carries unchanged back to the dispatch caller.

use thiserror::Error;

/// Capability error type
///
/// Raised when a rendering surface lacks a feature the engine cannot work
/// without. These are reported when a scene is constructed, never lazily
/// on the first hit-test.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CapabilityError {
    /// The probe surface cannot answer point-in-path queries
    #[error("Rendering surface '{surface}' does not support point-in-path queries")]
    PointInPathUnsupported {
        /// Name of the offending surface implementation.
        surface: String,
    },

    /// The surface cannot read back its pixels
    #[error("Rendering surface '{surface}' does not support pixel readback")]
    PixelReadbackUnsupported {
        /// Name of the offending surface implementation.
        surface: String,
    },
}

/// Shape error type
///
/// Represents invalid requests made against shapes or scene parameters.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ShapeError {
    /// Attribute name not known to this shape kind
    #[error("Unknown attribute '{name}' on {kind}")]
    UnknownAttribute {
        /// The shape's type tag.
        kind: String,
        /// The requested attribute name.
        name: String,
    },

    /// Attribute value has the wrong kind
    #[error("Attribute '{name}' expects a {expected} value")]
    InvalidAttributeValue {
        /// The attribute name.
        name: String,
        /// The expected value kind ("number", "text" or "bool").
        expected: String,
    },

    /// Event type name not recognized
    #[error("Unknown event type '{0}'")]
    UnknownEventType(String),

    /// Zoom factor must be finite and positive
    #[error("Invalid zoom factor {0}")]
    InvalidZoom(f64),
}

/// Main error type for ShapeKit
///
/// A unified error type that can represent any error raised by the engine.
/// This is the primary error type used in public APIs.
#[derive(Error, Debug)]
pub enum Error {
    /// Capability error
    #[error(transparent)]
    Capability(#[from] CapabilityError),

    /// Shape error
    #[error(transparent)]
    Shape(#[from] ShapeError),

    /// An event handler or frame callback failed
    #[error(transparent)]
    Handler(#[from] anyhow::Error),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a capability error
    pub fn is_capability_error(&self) -> bool {
        matches!(self, Error::Capability(_))
    }

    /// Check if this is a shape error
    pub fn is_shape_error(&self) -> bool {
        matches!(self, Error::Shape(_))
    }

    /// Check if this error came out of a handler callback
    pub fn is_handler_error(&self) -> bool {
        matches!(self, Error::Handler(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
