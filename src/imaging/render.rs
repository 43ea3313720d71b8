//! Layout & render engine: turn a decoded photo plus caption lines into a new
//! framed raster.
//!
//! [`render`] is pure with respect to the filesystem. It neither decodes nor
//! writes. The caller hands in a decoded image and gets back pixels plus the
//! [`CanvasPlan`] that produced them; encoding is the backend's job.

use super::calculations::{CanvasPlan, plan_canvas};
use super::params::LayoutOptions;
use super::text::Typeface;
use image::{DynamicImage, GenericImageView, Rgb, RgbImage, imageops};
use thiserror::Error;

/// Canvas fill behind and around the photo.
pub const BACKGROUND: Rgb<u8> = Rgb([0, 0, 0]);
/// Caption text color.
pub const TEXT_COLOR: Rgb<u8> = Rgb([255, 255, 255]);

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Invalid layout: {0}")]
    InvalidLayout(String),
    #[error("Font error: {0}")]
    Font(String),
}

/// Output of one render call.
#[derive(Debug, Clone)]
pub struct Rendered {
    pub image: RgbImage,
    pub plan: CanvasPlan,
}

/// Frame `source` and draw `lines` into the caption strip.
///
/// With no lines the source pixels come back untouched on an identity plan.
pub fn render(
    source: &DynamicImage,
    lines: &[String],
    options: &LayoutOptions,
    typeface: &Typeface,
) -> Result<Rendered, RenderError> {
    let (src_w, src_h) = source.dimensions();
    let plan = plan_canvas((src_w, src_h), lines, options, typeface)?;
    let photo = source.to_rgb8();

    if plan.is_identity() {
        return Ok(Rendered { image: photo, plan });
    }

    log::debug!(
        "canvas {}x{} (photo at {},{}), font sizes {:?}",
        plan.width,
        plan.height,
        plan.image_x,
        plan.image_y,
        plan.lines.iter().map(|l| l.font_size).collect::<Vec<_>>()
    );

    let mut canvas = RgbImage::from_pixel(plan.width, plan.height, BACKGROUND);
    imageops::overlay(
        &mut canvas,
        &photo,
        i64::from(plan.image_x),
        i64::from(plan.image_y),
    );
    for line in &plan.lines {
        typeface.draw_line(&mut canvas, line, TEXT_COLOR);
    }

    Ok(Rendered {
        image: canvas,
        plan,
    })
}
