//! Image processing: layout, text rendering and the JPEG codec, all pure Rust.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** | `image::ImageReader` |
//! | **EXIF metadata** | `kamadak-exif` |
//! | **Measure / draw text** | `imageproc::drawing` over an `ab_glyph` font |
//! | **Compose canvas** | `image::imageops::overlay` |
//! | **Encode → JPEG** | `JpegEncoder::new_with_quality` |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for border geometry and font fitting (unit testable)
//! - **Parameters**: Data structures describing the layout
//! - **Text**: [`Typeface`] + the [`MeasureText`] seam
//! - **Render**: The engine turning a photo and caption lines into a new raster
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: The per-file pipeline combining all of the above

pub mod backend;
pub mod calculations;
pub mod operations;
mod params;
pub mod render;
pub mod rust_backend;
pub mod text;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use calculations::{CanvasPlan, LinePlacement, plan_canvas};
pub use operations::{AnnotateOutcome, ImagingError, annotate_image};
pub use params::{BorderStyle, DEFAULT_LINE_HEIGHT, DEFAULT_QUALITY, LayoutOptions, Quality};
pub use render::{RenderError, Rendered, render};
pub use rust_backend::RustBackend;
pub use text::{MeasureText, Typeface};
