//! Batch annotation of a photo directory.
//!
//! Collects the JPEGs directly inside the input directory and annotates each
//! one into the output directory as `processed_<name>`.
//!
//! ## Output Structure
//!
//! ```text
//! trip/
//! ├── exif-frame.toml                 # Optional batch config
//! ├── IMG_0001.jpg
//! ├── IMG_0002.JPG
//! └── images with exif/               # Default output subfolder
//!     ├── processed_IMG_0001.jpg
//!     └── processed_IMG_0002.JPG
//! ```
//!
//! ## Parallel Processing
//!
//! Files are annotated in parallel using [rayon](https://docs.rs/rayon). One
//! file failing is reported as a [`ProcessEvent::Failed`] and never aborts the
//! rest of the batch. Progress is streamed over an optional `mpsc` channel so
//! the CLI can print while workers run.

use crate::config::{self, ConfigError, FrameConfig, ProcessingConfig};
use crate::imaging::{
    BorderStyle, ImageBackend, LayoutOptions, Quality, RenderError, RustBackend, Typeface,
    annotate_image,
};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;

/// Prefix added to every output file name.
pub const OUTPUT_PREFIX: &str = "processed_";

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Font error: {0}")]
    Font(#[from] RenderError),
    #[error("Input directory does not exist: {}", .0.display())]
    InputNotFound(PathBuf),
    #[error("No JPEG files found in {}", .0.display())]
    NoImages(PathBuf),
}

/// Values given on the command line. `None` falls through to the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub output_dir: Option<PathBuf>,
    pub subfolder: Option<String>,
    pub line_height: Option<u32>,
    pub border: Option<BorderStyle>,
    pub quality: Option<u32>,
    pub font: Option<PathBuf>,
    pub config_file: Option<PathBuf>,
    pub threads: Option<usize>,
}

/// Fully resolved settings for one batch.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub layout: LayoutOptions,
    /// Custom TrueType font; the embedded DejaVu Sans when absent.
    pub font: Option<PathBuf>,
    pub processing: ProcessingConfig,
}

impl RunConfig {
    /// Resolve settings: command-line flag, then config file, then default.
    ///
    /// The config file is `overrides.config_file` when given, otherwise
    /// `exif-frame.toml` in the input directory if it exists.
    pub fn resolve(input_dir: &Path, overrides: &Overrides) -> Result<Self, ProcessError> {
        let file = match &overrides.config_file {
            Some(path) => config::load_config(path)?,
            None => config::load_config_in(input_dir)?,
        };
        Ok(Self::merge(input_dir, overrides, &file))
    }

    fn merge(input_dir: &Path, overrides: &Overrides, file: &FrameConfig) -> Self {
        let subfolder = overrides
            .subfolder
            .as_deref()
            .unwrap_or(&file.output.subfolder);
        let output_dir = overrides
            .output_dir
            .clone()
            .unwrap_or_else(|| input_dir.join(subfolder));

        let from_file = file.layout_options();
        let quality = match overrides.quality {
            Some(requested) => {
                let quality = Quality::new(requested);
                if quality.value() != requested {
                    log::warn!(
                        "Quality {} out of range, using {}",
                        requested,
                        quality.value()
                    );
                }
                quality
            }
            None => from_file.quality,
        };

        Self {
            input_dir: input_dir.to_path_buf(),
            output_dir,
            layout: LayoutOptions {
                line_height: overrides.line_height.unwrap_or(from_file.line_height),
                border_style: overrides.border.unwrap_or(from_file.border_style),
                quality,
            },
            font: overrides.font.clone(),
            processing: ProcessingConfig {
                max_processes: overrides.threads.or(file.processing.max_processes),
            },
        }
    }
}

/// Progress events streamed while a batch runs.
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessEvent {
    Started {
        input_dir: PathBuf,
        output_dir: PathBuf,
        image_count: usize,
    },
    Annotated {
        file: String,
        lines: Vec<String>,
        width: u32,
        height: u32,
    },
    Failed {
        file: String,
        error: String,
    },
}

/// Result of a finished batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessSummary {
    pub processed: usize,
    pub failed: usize,
    pub output_dir: PathBuf,
}

/// JPEG files directly inside `dir`, sorted by file name.
///
/// Matches the `jpg` extension case-insensitively. Subdirectories are not
/// descended into, so the default output subfolder is never picked up.
pub fn find_jpegs(dir: &Path) -> Result<Vec<PathBuf>, std::io::Error> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let is_jpeg = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("jpg"));
        if is_jpeg && path.is_file() {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// `<output_dir>/processed_<file name>`.
pub fn output_path_for(output_dir: &Path, source: &Path) -> PathBuf {
    let name = source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    output_dir.join(format!("{OUTPUT_PREFIX}{name}"))
}

/// Annotate every JPEG in the input directory with the production backend.
pub fn run(
    config: &RunConfig,
    events: Option<Sender<ProcessEvent>>,
) -> Result<ProcessSummary, ProcessError> {
    let typeface = match &config.font {
        Some(path) => Typeface::from_file(path)?,
        None => Typeface::embedded()?,
    };
    log::debug!("Using font {}", typeface.name());
    run_with_backend(&RustBackend::new(), &typeface, config, events)
}

/// Annotate every JPEG using a specific backend (allows testing with mock).
pub fn run_with_backend(
    backend: &impl ImageBackend,
    typeface: &Typeface,
    config: &RunConfig,
    events: Option<Sender<ProcessEvent>>,
) -> Result<ProcessSummary, ProcessError> {
    if !config.input_dir.is_dir() {
        return Err(ProcessError::InputNotFound(config.input_dir.clone()));
    }

    let sources = find_jpegs(&config.input_dir)?;
    if sources.is_empty() {
        return Err(ProcessError::NoImages(config.input_dir.clone()));
    }

    fs::create_dir_all(&config.output_dir)?;
    log::info!(
        "Annotating {} images from {} into {}",
        sources.len(),
        config.input_dir.display(),
        config.output_dir.display()
    );

    let emit = |event: ProcessEvent| {
        if let Some(tx) = &events {
            // A dropped receiver only means nobody is listening.
            tx.send(event).ok();
        }
    };

    emit(ProcessEvent::Started {
        input_dir: config.input_dir.clone(),
        output_dir: config.output_dir.clone(),
        image_count: sources.len(),
    });

    let processed = sources
        .par_iter()
        .filter(|source| {
            let file = source
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let output = output_path_for(&config.output_dir, source);

            match annotate_image(backend, typeface, source, &output, &config.layout) {
                Ok(outcome) => {
                    emit(ProcessEvent::Annotated {
                        file,
                        lines: outcome.lines,
                        width: outcome.output.width,
                        height: outcome.output.height,
                    });
                    true
                }
                Err(e) => {
                    log::warn!("Failed to annotate {}: {}", source.display(), e);
                    emit(ProcessEvent::Failed {
                        file,
                        error: e.to_string(),
                    });
                    false
                }
            }
        })
        .count();

    let failed = sources.len() - processed;
    log::info!("Annotated {processed} images, {failed} failed");

    Ok(ProcessSummary {
        processed,
        failed,
        output_dir: config.output_dir.clone(),
    })
}
