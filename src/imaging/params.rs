//! Parameter types for the annotate operation.
//!
//! These structs describe *what* to draw, not *how*. They are the interface
//! between the caller (CLI, config, batch driver) and the layout engine in
//! [`calculations`](super::calculations) / [`render`](super::render).
//!
//! ## Types
//!
//! - [`Quality`]: JPEG encoding quality (1–100, default 100). Clamped on construction.
//! - [`BorderStyle`]: caption strip only, or a uniform frame plus caption strip.
//! - [`LayoutOptions`]: line height, border style and quality for one invocation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default height of one caption line slot, in pixels.
pub const DEFAULT_LINE_HEIGHT: u32 = 60;

/// Default JPEG quality for annotated output.
pub const DEFAULT_QUALITY: u32 = 100;

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(DEFAULT_QUALITY)
    }
}

/// Where the black border goes around the photo.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BorderStyle {
    /// Caption strip below the photo only.
    #[default]
    Bottom,
    /// Uniform frame around the photo plus the caption strip.
    All,
}

impl FromStr for BorderStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bottom" => Ok(Self::Bottom),
            "all" => Ok(Self::All),
            other => Err(format!(
                "invalid border style '{other}' (expected 'bottom' or 'all')"
            )),
        }
    }
}

impl fmt::Display for BorderStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bottom => f.write_str("bottom"),
            Self::All => f.write_str("all"),
        }
    }
}

/// Layout parameters for a single annotate call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutOptions {
    /// Height of one caption line slot in pixels. Must be positive.
    pub line_height: u32,
    pub border_style: BorderStyle,
    pub quality: Quality,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            line_height: DEFAULT_LINE_HEIGHT,
            border_style: BorderStyle::default(),
            quality: Quality::default(),
        }
    }
}
