//! # ShapeKit Core
//!
//! Core types shared by every ShapeKit crate: the error hierarchy,
//! 2D points and affine matrices, shared-ownership aliases and the
//! interaction constants the event router falls back to.

pub mod constants;
pub mod error;
pub mod geometry;
pub mod types;

pub use error::{CapabilityError, Error, Result, ShapeError};
pub use geometry::{rotate_point, Affine, Point};
pub use types::{shared, Shared, SharedVec};
