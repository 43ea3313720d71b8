//! High-level annotate operation.
//!
//! Combines metadata formatting, the render engine and a backend into the
//! single per-file pipeline the batch driver runs:
//!
//! ```text
//! read_metadata → format_lines → decode → render → encode → write
//! ```
//!
//! Each call either writes one complete output file or fails; collaborator
//! errors propagate unchanged.

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::params::LayoutOptions;
use super::render::{RenderError, render};
use super::text::Typeface;
use crate::metadata::format_lines;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImagingError {
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// What a successful annotate call produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotateOutcome {
    pub source: Dimensions,
    pub output: Dimensions,
    pub lines: Vec<String>,
}

/// Annotate `source` with its own EXIF caption and write the JPEG to `output`.
pub fn annotate_image(
    backend: &impl ImageBackend,
    typeface: &Typeface,
    source: &Path,
    output: &Path,
    options: &LayoutOptions,
) -> Result<AnnotateOutcome, ImagingError> {
    let record = backend.read_metadata(source)?;
    let lines = format_lines(&record);
    let photo = backend.decode(source)?;

    let rendered = render(&photo, &lines, options, typeface)?;
    let bytes = backend.encode(&rendered.image, options.quality)?;
    std::fs::write(output, bytes)?;

    Ok(AnnotateOutcome {
        source: Dimensions {
            width: photo.width(),
            height: photo.height(),
        },
        output: rendered.image.dimensions().into(),
        lines,
    })
}
