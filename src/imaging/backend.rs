//! Image backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the three collaborator operations the
//! annotate pipeline needs around the render engine: decode, read_metadata
//! and encode.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), pure Rust and statically
//! linked. Tests use a recording mock.

use super::params::Quality;
use crate::metadata::MetadataRecord;
use image::{DynamicImage, RgbImage};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Decode failed: {0}")]
    Decode(String),
    #[error("Metadata read failed: {0}")]
    Metadata(String),
    #[error("Encode failed: {0}")]
    Encode(String),
}

/// Pixel dimensions of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl From<(u32, u32)> for Dimensions {
    fn from((width, height): (u32, u32)) -> Self {
        Self { width, height }
    }
}

/// Trait for image backends.
///
/// Implementations must be `Sync`: the batch driver shares one backend across
/// rayon workers.
pub trait ImageBackend: Sync {
    /// Decode an image file into pixels.
    fn decode(&self, path: &Path) -> Result<DynamicImage, BackendError>;

    /// Read the photo's EXIF block into a flat record.
    ///
    /// A file without EXIF yields an all-empty record, not an error.
    fn read_metadata(&self, path: &Path) -> Result<MetadataRecord, BackendError>;

    /// Encode pixels as JPEG. Quality is clamped to 1–100.
    fn encode(&self, image: &RgbImage, quality: Quality) -> Result<Vec<u8>, BackendError>;
}
