//! # exif-frame
//!
//! Frames photographs with their own capture details. Each JPEG is placed on a
//! black canvas and up to three centered white lines are drawn underneath:
//!
//! ```text
//! ┌──────────────────────────┐
//! │                          │
//! │          photo           │
//! │                          │
//! ├──────────────────────────┤
//! │          Title           │  ← title, or description
//! │  Date | Camera | Lens    │
//! │ 35 mm | f/8 | 1/250 s |  │
//! │         ISO 100          │
//! └──────────────────────────┘
//! ```
//!
//! # Architecture
//!
//! ```text
//! read_metadata → format_lines → decode → plan_canvas → render → encode → write
//! ```
//!
//! The layout is a pure function of the source dimensions, the caption lines,
//! the [`imaging::LayoutOptions`] and a text measurer, so geometry is unit
//! tested without touching the filesystem or a real font. Decoding, EXIF
//! extraction and JPEG encoding sit behind the [`imaging::ImageBackend`] trait.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`metadata`] | Flat EXIF record and the three caption lines derived from it |
//! | [`imaging`] | Border geometry, font fitting, text drawing, backend, per-file annotate |
//! | [`process`] | Directory batch: JPEG discovery, setting resolution, parallel annotate |
//! | [`config`] | Optional `exif-frame.toml` loading and validation |
//! | [`output`] | CLI output formatting of batch progress |
//!
//! # Design Decisions
//!
//! ## Pure-Rust Imaging
//!
//! Decoding and encoding use the `image` crate, EXIF comes from `kamadak-exif`,
//! and text is rasterized with `imageproc` over an `ab_glyph` font. A DejaVu
//! Sans face is compiled into the binary, so there are no system font or
//! library dependencies.
//!
//! ## Originals Are Never Touched
//!
//! Output goes to a separate directory as `processed_<name>`. Re-running a
//! batch overwrites earlier outputs and nothing else.

pub mod config;
pub mod imaging;
pub mod metadata;
pub mod output;
pub mod process;
