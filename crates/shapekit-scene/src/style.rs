//! Paint style attached to every shape.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An sRGB colour with straight alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse a paint string. Empty strings and `"none"` mean "no paint".
    pub fn parse_paint(s: &str) -> Result<Option<Color>, String> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("none") {
            return Ok(None);
        }
        s.parse().map(Some)
    }
}

impl FromStr for Color {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(hex) = s.strip_prefix('#') {
            if !hex.is_ascii() {
                return Err(format!("invalid colour '{}'", s));
            }
            let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).map(|v| v * 17);
            let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16);
            let bad = |_| format!("invalid colour '{}'", s);
            return match hex.len() {
                3 => Ok(Color::rgb(
                    nibble(0).map_err(bad)?,
                    nibble(1).map_err(bad)?,
                    nibble(2).map_err(bad)?,
                )),
                6 | 8 => Ok(Color::rgba(
                    byte(0).map_err(bad)?,
                    byte(2).map_err(bad)?,
                    byte(4).map_err(bad)?,
                    if hex.len() == 8 { byte(6).map_err(bad)? } else { 255 },
                )),
                _ => Err(format!("invalid colour '{}'", s)),
            };
        }

        match s.to_ascii_lowercase().as_str() {
            "black" => Ok(Color::BLACK),
            "white" => Ok(Color::WHITE),
            "red" => Ok(Color::rgb(255, 0, 0)),
            "green" => Ok(Color::rgb(0, 128, 0)),
            "blue" => Ok(Color::rgb(0, 0, 255)),
            "yellow" => Ok(Color::rgb(255, 255, 0)),
            "orange" => Ok(Color::rgb(255, 165, 0)),
            "gray" | "grey" => Ok(Color::rgb(128, 128, 128)),
            "transparent" => Ok(Color::TRANSPARENT),
            _ => Err(format!("invalid colour '{}'", s)),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

macro_rules! keyword_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
        pub enum $name {
            #[default]
            $(#[serde(rename = $text)] $variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    _ => Err(format!("invalid {} '{}'", stringify!($name), s)),
                }
            }
        }
    };
}

keyword_enum!(
    /// Corner style where stroked segments meet.
    LineJoin { Miter => "miter", Round => "round", Bevel => "bevel" }
);

keyword_enum!(
    /// End style of open stroked segments.
    LineCap { Butt => "butt", Round => "round", Square => "square" }
);

keyword_enum!(
    /// Compositing operator for new paint over existing pixels.
    Composite {
        SourceOver => "source-over",
        SourceIn => "source-in",
        SourceOut => "source-out",
        SourceAtop => "source-atop",
        DestinationOver => "destination-over",
        DestinationIn => "destination-in",
        DestinationOut => "destination-out",
        DestinationAtop => "destination-atop",
        Lighter => "lighter",
        Copy => "copy",
        Xor => "xor",
    }
);

/// Drop shadow. Drawn only when an offset or blur is non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Shadow {
    pub color: Color,
    pub offset_x: f64,
    pub offset_y: f64,
    pub blur: f64,
}

impl Default for Shadow {
    fn default() -> Self {
        Self {
            color: Color::TRANSPARENT,
            offset_x: 0.0,
            offset_y: 0.0,
            blur: 0.0,
        }
    }
}

impl Shadow {
    pub fn is_visible(&self) -> bool {
        self.offset_x != 0.0 || self.offset_y != 0.0 || self.blur != 0.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Font {
    pub style: String,
    pub weight: String,
    pub size: f64,
    pub family: String,
}

impl Default for Font {
    fn default() -> Self {
        Self {
            style: "normal".into(),
            weight: "normal".into(),
            size: 10.0,
            family: "Arial".into(),
        }
    }
}

impl Font {
    /// CSS shorthand, e.g. `normal bold 12px Arial`.
    pub fn css(&self) -> String {
        format!("{} {} {}px {}", self.style, self.weight, self.size, self.family)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Style {
    pub fill: Option<Color>,
    pub stroke: Option<Color>,
    pub line_width: f64,
    pub line_join: LineJoin,
    pub line_cap: LineCap,
    pub alpha: f64,
    pub composite: Composite,
    pub shadow: Shadow,
    pub font: Font,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            fill: Some(Color::BLACK),
            stroke: None,
            line_width: 1.0,
            line_join: LineJoin::default(),
            line_cap: LineCap::default(),
            alpha: 1.0,
            composite: Composite::default(),
            shadow: Shadow::default(),
            font: Font::default(),
        }
    }
}

impl Style {
    /// Width the stroke adds around the outline, 0 when unstroked.
    pub fn stroke_extent(&self) -> f64 {
        if self.stroke.is_some() {
            self.line_width
        } else {
            0.0
        }
    }
}
