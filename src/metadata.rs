//! Photo metadata record and caption line formatting.
//!
//! A [`MetadataRecord`] is the flat, already-resolved view of an image's EXIF
//! block: every field is a display string (empty when the tag is absent), plus
//! an optional capture timestamp. It is produced by
//! [`ImageBackend::read_metadata`](crate::imaging::ImageBackend::read_metadata)
//! and consumed once by [`format_lines`].
//!
//! ## Caption lines
//!
//! Up to three lines are produced, in this order:
//!
//! ```text
//! Harbour at dusk                                  ← title, else description
//! 2024-05-11 19:42:07 | X-T5 | XF23mmF1.4 R LM WR  ← date | camera | lens
//! 23 mm | f/2.8 | 1/250 s | ISO 400                ← focal | aperture | shutter | ISO
//! ```
//!
//! A line that ends up empty or whitespace-only is dropped, never emitted blank.
//! The date falls back to the literal `Unknown Date`.

use chrono::NaiveDateTime;

/// Placeholder shown on the camera line when no capture time is known.
pub const UNKNOWN_DATE: &str = "Unknown Date";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Flat metadata for one photo. Absent tags are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataRecord {
    pub title: String,
    pub description: String,
    pub captured_at: Option<NaiveDateTime>,
    pub camera_model: String,
    pub lens_model: String,
    pub focal_length: String,
    pub aperture: String,
    pub shutter_speed: String,
    pub iso: String,
}

/// Ordered caption lines, 0 to 3 entries, none of them blank.
pub type DisplayLines = Vec<String>;

/// Pick the first non-blank value from a priority-ordered list of sources.
///
/// ```text
/// title line: resolve(&[title, description])
/// ```
pub fn resolve(sources: &[&str]) -> Option<String> {
    sources
        .iter()
        .map(|s| s.trim())
        .find(|s| !s.is_empty())
        .map(String::from)
}

/// First caption line: the title, falling back to the description.
pub fn title_line(record: &MetadataRecord) -> String {
    resolve(&[&record.title, &record.description]).unwrap_or_default()
}

/// Second caption line: `<date> | <camera> | <lens>`.
pub fn camera_line(record: &MetadataRecord) -> String {
    let date = record
        .captured_at
        .map(|ts| ts.format(TIMESTAMP_FORMAT).to_string())
        .unwrap_or_else(|| UNKNOWN_DATE.to_string());
    format!("{} | {} | {}", date, record.camera_model, record.lens_model)
        .trim()
        .to_string()
}

/// Third caption line: `<focal> | <aperture> | <shutter> | ISO <iso>`.
pub fn technical_line(record: &MetadataRecord) -> String {
    format!(
        "{} | {} | {} | ISO {}",
        record.focal_length, record.aperture, record.shutter_speed, record.iso
    )
    .trim()
    .to_string()
}

/// Format a record into its caption lines, dropping blank ones.
pub fn format_lines(record: &MetadataRecord) -> DisplayLines {
    [
        title_line(record),
        camera_line(record),
        technical_line(record),
    ]
    .into_iter()
    .filter(|line| !line.trim().is_empty())
    .collect()
}
