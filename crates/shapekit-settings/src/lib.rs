//! ShapeKit Settings Crate
//!
//! Holds the tunable parameters of the interaction engine and reads or
//! writes them as TOML or JSON.

pub mod config;
pub mod error;

pub use config::{HoverTracking, InteractionSettings};
pub use error::{SettingsError, SettingsResult};
