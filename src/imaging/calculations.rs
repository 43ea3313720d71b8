//! Pure layout calculations for the annotated canvas.
//!
//! Everything here is deterministic and free of I/O and pixels: given the
//! source dimensions, the caption lines and the [`LayoutOptions`], produce a
//! [`CanvasPlan`] describing where the photo and each line go. Text width is
//! the only external input and comes through [`MeasureText`].
//!
//! ## Geometry
//!
//! ```text
//! Bottom                          All
//! ┌──────────────┐                ┌──────────────────┐
//! │              │                │      top = L     │
//! │    photo     │                │  ┌────────────┐  │
//! │              │                │L │   photo    │ L│
//! ├──────────────┤                │  └────────────┘  │
//! │  pad = 20    │                │      pad = L     │
//! │  line slots  │  n × L         │    line slots    │  n × L
//! │  margin      │  round(0.12L)  │    margin        │  round(0.12L)
//! └──────────────┘                └──────────────────┘
//! ```

use super::params::{BorderStyle, LayoutOptions};
use super::render::RenderError;
use super::text::MeasureText;

/// Smallest font size tried; used as-is when nothing fits.
pub const MIN_FONT_SIZE: u32 = 12;
/// Largest font size tried. A fixed ceiling, never exceeded.
pub const MAX_FONT_SIZE: u32 = 48;
/// Side padding (and gap above the text) for [`BorderStyle::Bottom`].
pub const BOTTOM_STYLE_SIDE_PADDING: u32 = 20;
/// Trailing gap after the last line, as a fraction of the line height.
pub const BOTTOM_MARGIN_RATIO: f64 = 0.12;

/// Trailing gap below the last caption line.
///
/// ```
/// # use exif_frame::imaging::calculations::bottom_margin;
/// assert_eq!(bottom_margin(40), 5); // 4.8 rounds up
/// assert_eq!(bottom_margin(50), 6);
/// assert_eq!(bottom_margin(60), 7); // 7.2 rounds down
/// ```
pub fn bottom_margin(line_height: u32) -> u32 {
    (line_height as f64 * BOTTOM_MARGIN_RATIO).round() as u32
}

/// Border sizes and canvas dimensions, before any text is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BorderGeometry {
    pub top_border: u32,
    pub bottom_border: u32,
    pub side_padding: u32,
    pub width: u32,
    pub height: u32,
    /// Where the unscaled photo's top-left corner lands.
    pub image_x: u32,
    pub image_y: u32,
}

/// Compute border geometry for `line_count` caption lines.
///
/// Returns `None` if the resulting canvas would not fit in `u32` pixels.
pub fn border_geometry(
    source: (u32, u32),
    line_count: u32,
    line_height: u32,
    style: BorderStyle,
) -> Option<BorderGeometry> {
    let (src_w, src_h) = source;
    let text_height = line_height.checked_mul(line_count)?;
    let margin = bottom_margin(line_height);

    let (top_border, side_padding, width) = match style {
        BorderStyle::Bottom => (0, BOTTOM_STYLE_SIDE_PADDING, src_w),
        BorderStyle::All => (
            line_height,
            line_height,
            src_w.checked_add(line_height.checked_mul(2)?)?,
        ),
    };
    let bottom_border = text_height.checked_add(side_padding)?.checked_add(margin)?;
    let height = src_h.checked_add(top_border)?.checked_add(bottom_border)?;
    let image_x = match style {
        BorderStyle::All => side_padding,
        BorderStyle::Bottom => 0,
    };

    Some(BorderGeometry {
        top_border,
        bottom_border,
        side_padding,
        width,
        height,
        image_x,
        image_y: top_border,
    })
}

/// Largest size in `MAX_FONT_SIZE..=MIN_FONT_SIZE` whose width fits
/// `max_width`, or [`MIN_FONT_SIZE`] when even that overflows.
///
/// `max_width` may be negative when the side padding exceeds the canvas; then
/// nothing fits.
pub fn fit_font_size(measurer: &impl MeasureText, text: &str, max_width: i64) -> u32 {
    (MIN_FONT_SIZE..=MAX_FONT_SIZE)
        .rev()
        .find(|&size| i64::from(measurer.text_width(text, size)) <= max_width)
        .unwrap_or(MIN_FONT_SIZE)
}

/// One caption line, sized and positioned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinePlacement {
    pub text: String,
    pub font_size: u32,
    /// Baseline y: slot top plus half the font size, rounded down to whole
    /// pixels.
    pub baseline_y: u32,
    /// Horizontal center of the line (canvas midpoint).
    pub center_x: u32,
}

/// The full layout for one annotate call. Computed fresh per image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanvasPlan {
    pub top_border: u32,
    pub bottom_border: u32,
    pub side_padding: u32,
    pub width: u32,
    pub height: u32,
    pub image_x: u32,
    pub image_y: u32,
    pub lines: Vec<LinePlacement>,
}

impl CanvasPlan {
    /// The no-op plan: canvas equals the source, nothing drawn.
    pub fn identity(width: u32, height: u32) -> Self {
        Self {
            top_border: 0,
            bottom_border: 0,
            side_padding: 0,
            width,
            height,
            image_x: 0,
            image_y: 0,
            lines: Vec::new(),
        }
    }

    pub fn is_identity(&self) -> bool {
        self.lines.is_empty()
    }

    /// Top of the first line slot: below the photo and the padding gap.
    pub fn text_top(&self, source_height: u32) -> u32 {
        self.top_border + source_height + self.side_padding
    }
}

/// Plan the annotated canvas for a `source` of the given `(width, height)`.
///
/// Fails with [`RenderError::InvalidLayout`] on zero dimensions, a zero line
/// height, or a canvas too large to address.
pub fn plan_canvas(
    source: (u32, u32),
    lines: &[String],
    options: &LayoutOptions,
    measurer: &impl MeasureText,
) -> Result<CanvasPlan, RenderError> {
    let (src_w, src_h) = source;
    if src_w == 0 || src_h == 0 {
        return Err(RenderError::InvalidLayout(format!(
            "source dimensions must be positive, got {src_w}x{src_h}"
        )));
    }
    if options.line_height == 0 {
        return Err(RenderError::InvalidLayout(
            "line height must be positive".into(),
        ));
    }

    if lines.is_empty() {
        return Ok(CanvasPlan::identity(src_w, src_h));
    }

    let Ok(line_count) = u32::try_from(lines.len()) else {
        return Err(RenderError::InvalidLayout("too many lines".into()));
    };
    let style = options.border_style;
    let Some(geometry) = border_geometry(source, line_count, options.line_height, style) else {
        return Err(RenderError::InvalidLayout(format!(
            "canvas for {src_w}x{src_h} with {line_count} lines of {}px overflows",
            options.line_height
        )));
    };

    let mut plan = CanvasPlan {
        top_border: geometry.top_border,
        bottom_border: geometry.bottom_border,
        side_padding: geometry.side_padding,
        width: geometry.width,
        height: geometry.height,
        image_x: geometry.image_x,
        image_y: geometry.image_y,
        lines: Vec::with_capacity(lines.len()),
    };

    let max_text_width = i64::from(plan.width) - 2 * i64::from(plan.side_padding);
    let text_y = plan.text_top(src_h);
    let center_x = plan.width / 2;

    for (text, i) in lines.iter().zip(0u32..) {
        let font_size = fit_font_size(measurer, text, max_text_width);
        plan.lines.push(LinePlacement {
            text: text.clone(),
            font_size,
            baseline_y: text_y + i * options.line_height + font_size / 2,
            center_x,
        });
    }

    Ok(plan)
}
