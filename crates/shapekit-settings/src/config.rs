//! Interaction settings for ShapeKit
//!
//! Every value has a built-in default (see `shapekit_core::constants`), so
//! a settings file only needs to name what it overrides. Files are TOML or
//! JSON, chosen by extension.

use serde::{Deserialize, Serialize};
use shapekit_core::constants::{DOUBLE_CLICK_WINDOW_MS, LINE_HIT_TOLERANCE, ZOOM_STEP};
use std::path::{Path, PathBuf};

use crate::error::{SettingsError, SettingsResult};

/// When mouseover/mouseout tracking runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HoverTracking {
    /// Off until something binds mouseover or mouseout.
    #[default]
    Lazy,
    /// On from the start.
    Always,
}

impl std::fmt::Display for HoverTracking {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HoverTracking::Lazy => write!(f, "lazy"),
            HoverTracking::Always => write!(f, "always"),
        }
    }
}

/// Tunable parameters of the interaction engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionSettings {
    /// Touch releases closer together than this (ms) synthesize a dblclick.
    pub double_click_ms: f64,
    /// Distance added to a line's width when hit-testing it.
    pub line_hit_tolerance: f64,
    /// Hover tracking policy.
    pub hover_tracking: HoverTracking,
    /// Initial global-key flag for new surfaces.
    pub global_key_events: bool,
    /// Rasterize non-dragged shapes once per drag instead of every frame.
    pub drag_snapshot: bool,
    /// Zoom increment for zoom-in/zoom-out.
    pub zoom_step: f64,
    /// Zoom factor of a new surface.
    pub initial_zoom: f64,
}

impl Default for InteractionSettings {
    fn default() -> Self {
        Self {
            double_click_ms: DOUBLE_CLICK_WINDOW_MS,
            line_hit_tolerance: LINE_HIT_TOLERANCE,
            hover_tracking: HoverTracking::default(),
            global_key_events: false,
            drag_snapshot: true,
            zoom_step: ZOOM_STEP,
            initial_zoom: 1.0,
        }
    }
}

impl InteractionSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Platform location of the settings file, e.g. `~/.config/shapekit/interaction.toml`.
    pub fn default_config_path() -> SettingsResult<PathBuf> {
        let dir = dirs::config_dir().ok_or_else(|| {
            SettingsError::ConfigDirectory("platform has no configuration directory".into())
        })?;
        Ok(dir.join("shapekit").join("interaction.toml"))
    }

    /// Load settings from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let content = std::fs::read_to_string(path)?;

        let settings: Self = match Format::of(path)? {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        settings.validate()?;
        tracing::info!("Loaded interaction settings from {}", path.display());
        Ok(settings)
    }

    /// Load from `path` if it exists, defaults otherwise.
    pub fn load_or_default(path: &Path) -> SettingsResult<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            tracing::debug!("No settings at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Save settings to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match Format::of(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate settings
    pub fn validate(&self) -> SettingsResult<()> {
        if !(self.double_click_ms.is_finite() && self.double_click_ms > 0.0) {
            return Err(SettingsError::invalid("double_click_ms", "must be > 0"));
        }

        if !(self.line_hit_tolerance.is_finite() && self.line_hit_tolerance >= 0.0) {
            return Err(SettingsError::invalid("line_hit_tolerance", "must be >= 0"));
        }

        if !(self.zoom_step.is_finite() && self.zoom_step > 0.0) {
            return Err(SettingsError::invalid("zoom_step", "must be > 0"));
        }

        if !(self.initial_zoom.is_finite() && self.initial_zoom > 0.0) {
            return Err(SettingsError::invalid("initial_zoom", "must be > 0"));
        }

        Ok(())
    }
}

enum Format {
    Json,
    Toml,
}

impl Format {
    fn of(path: &Path) -> SettingsResult<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Format::Json),
            Some("toml") => Ok(Format::Toml),
            other => Err(SettingsError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }
}
