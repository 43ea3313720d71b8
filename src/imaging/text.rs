//! Typeface loading, text measurement and antialiased drawing.
//!
//! Layout only needs to know how wide a string is at a given pixel size, so it
//! asks through the [`MeasureText`] trait. [`Typeface`]
//! answers it with real glyph metrics; tests can plug in a fixed-advance fake.

use super::calculations::LinePlacement;
use super::render::RenderError;
use ab_glyph::{Font, FontArc, PxScale, ScaleFont};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_text_mut, text_size};
use std::path::Path;

/// DejaVu Sans, bundled so the binary renders captions without system fonts.
static EMBEDDED_FONT: &[u8] = include_bytes!("../../fonts/DejaVuSans.ttf");

/// Width measurement for a single line of text.
pub trait MeasureText {
    /// Rendered width in pixels of `text` at `size` px.
    fn text_width(&self, text: &str, size: u32) -> u32;
}

/// An immutable font, cheap to clone and safe to share across workers.
#[derive(Clone)]
pub struct Typeface {
    font: FontArc,
    name: String,
}

impl Typeface {
    /// The bundled DejaVu Sans face.
    pub fn embedded() -> Result<Self, RenderError> {
        let font = FontArc::try_from_slice(EMBEDDED_FONT)
            .map_err(|e| RenderError::Font(format!("embedded font: {e}")))?;
        Ok(Self {
            font,
            name: "DejaVu Sans".to_string(),
        })
    }

    /// Load a TrueType/OpenType font from disk.
    pub fn from_file(path: &Path) -> Result<Self, RenderError> {
        let data = std::fs::read(path)
            .map_err(|e| RenderError::Font(format!("{}: {e}", path.display())))?;
        let font = FontArc::try_from_vec(data)
            .map_err(|e| RenderError::Font(format!("{}: {e}", path.display())))?;
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self { font, name })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Distance from the top of the line box to the baseline at `size` px.
    fn ascent(&self, size: u32) -> f32 {
        self.font.as_scaled(PxScale::from(size as f32)).ascent()
    }

    /// Draw one placed line, centered on its `center_x` with its baseline at
    /// `baseline_y`.
    pub fn draw_line(&self, canvas: &mut RgbImage, line: &LinePlacement, color: Rgb<u8>) {
        let scale = PxScale::from(line.font_size as f32);
        let width = self.text_width(&line.text, line.font_size) as i32;
        let x = line.center_x as i32 - width / 2;
        let y = line.baseline_y as i32 - self.ascent(line.font_size).round() as i32;
        draw_text_mut(canvas, color, x, y, scale, &self.font, &line.text);
    }
}

impl MeasureText for Typeface {
    fn text_width(&self, text: &str, size: u32) -> u32 {
        text_size(PxScale::from(size as f32), &self.font, text).0
    }
}

impl std::fmt::Debug for Typeface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Typeface").field("name", &self.name).finish()
    }
}
