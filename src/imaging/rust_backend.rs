//! Pure Rust image backend.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG) | `image::ImageReader` with format sniffing |
//! | EXIF metadata | `kamadak-exif` (`exif::Reader::read_from_container`) |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder::new_with_quality` |
//!
//! ## EXIF field mapping
//!
//! | Record field | Tag (primary IFD) |
//! |---|---|
//! | title | ImageDescription, then XPTitle |
//! | description | UserComment, then XPComment |
//! | captured_at | DateTimeOriginal |
//! | camera_model | Model |
//! | lens_model | LensModel, then LensSpecification (`24-70 mm, f/2.8-2.8`) |
//! | focal_length | FocalLength (with unit, `23 mm`) |
//! | aperture | FNumber (`f/2.8`) |
//! | shutter_speed | ExposureTime (with unit, `1/250 s`) |
//! | iso | PhotographicSensitivity |

use super::backend::{BackendError, ImageBackend};
use super::params::Quality;
use crate::metadata::{MetadataRecord, resolve};
use chrono::{NaiveDate, NaiveDateTime};
use exif::{Context, Exif, In, Tag, Value};
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageReader, RgbImage};
use std::fs::File;
use std::io::{BufReader, ErrorKind};
use std::path::Path;

/// Windows Explorer title, UTF-16LE bytes in IFD0.
const TAG_XP_TITLE: Tag = Tag(Context::Tiff, 0x9C9B);
/// Windows Explorer comment, UTF-16LE bytes in IFD0.
const TAG_XP_COMMENT: Tag = Tag(Context::Tiff, 0x9C9C);

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Open a file, mapping a missing path to [`BackendError::NotFound`].
fn open(path: &Path) -> Result<File, BackendError> {
    File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => BackendError::NotFound(path.to_path_buf()),
        _ => BackendError::Io(e),
    })
}

/// First string of an ASCII field, stripped of NULs and surrounding space.
fn ascii_field(exif: &Exif, tag: Tag) -> String {
    exif.get_field(tag, In::PRIMARY)
        .and_then(|field| match &field.value {
            Value::Ascii(values) => values.first().map(|v| {
                String::from_utf8_lossy(v)
                    .trim_matches('\0')
                    .trim()
                    .to_string()
            }),
            _ => None,
        })
        .unwrap_or_default()
}

/// A field rendered the way exif tools show it, unit included.
fn field_with_unit(exif: &Exif, tag: Tag) -> String {
    exif.get_field(tag, In::PRIMARY)
        .map(|field| field.display_value().with_unit(exif).to_string())
        .unwrap_or_default()
}

fn xp_field(exif: &Exif, tag: Tag) -> String {
    exif.get_field(tag, In::PRIMARY)
        .map(|field| match &field.value {
            Value::Byte(bytes) | Value::Undefined(bytes, _) => decode_utf16le(bytes),
            _ => String::new(),
        })
        .unwrap_or_default()
}

fn user_comment(exif: &Exif) -> String {
    exif.get_field(Tag::UserComment, In::PRIMARY)
        .map(|field| match &field.value {
            Value::Undefined(bytes, _) => decode_user_comment(bytes),
            _ => String::new(),
        })
        .unwrap_or_default()
}

/// Decode UTF-16LE bytes (XP* tags), dropping the NUL terminator.
fn decode_utf16le(bytes: &[u8]) -> String {
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();
    String::from_utf16_lossy(&units)
        .trim_matches('\0')
        .trim()
        .to_string()
}

/// Decode an EXIF UserComment: 8-byte character code prefix, then text.
fn decode_user_comment(bytes: &[u8]) -> String {
    if bytes.len() < 8 {
        return String::new();
    }
    let (code, text) = bytes.split_at(8);
    if code == b"UNICODE\0" {
        decode_utf16le(text)
    } else {
        String::from_utf8_lossy(text)
            .trim_matches('\0')
            .trim()
            .to_string()
    }
}

fn captured_at(exif: &Exif) -> Option<NaiveDateTime> {
    let field = exif.get_field(Tag::DateTimeOriginal, In::PRIMARY)?;
    let Value::Ascii(values) = &field.value else {
        return None;
    };
    let dt = exif::DateTime::from_ascii(values.first()?).ok()?;
    NaiveDate::from_ymd_opt(i32::from(dt.year), u32::from(dt.month), u32::from(dt.day))?
        .and_hms_opt(u32::from(dt.hour), u32::from(dt.minute), u32::from(dt.second))
}

fn record_from_exif(exif: &Exif) -> MetadataRecord {
    let title = ascii_field(exif, Tag::ImageDescription);
    let xp_title = xp_field(exif, TAG_XP_TITLE);
    let comment = user_comment(exif);
    let xp_comment = xp_field(exif, TAG_XP_COMMENT);
    let lens = ascii_field(exif, Tag::LensModel);
    let lens_spec = exif
        .get_field(Tag::LensSpecification, In::PRIMARY)
        .map(|f| f.display_value().to_string())
        .unwrap_or_default();

    MetadataRecord {
        title: resolve(&[&title, &xp_title]).unwrap_or_default(),
        description: resolve(&[&comment, &xp_comment]).unwrap_or_default(),
        captured_at: captured_at(exif),
        camera_model: ascii_field(exif, Tag::Model),
        lens_model: resolve(&[&lens, &lens_spec]).unwrap_or_default(),
        focal_length: field_with_unit(exif, Tag::FocalLength),
        aperture: field_with_unit(exif, Tag::FNumber),
        shutter_speed: field_with_unit(exif, Tag::ExposureTime),
        iso: exif
            .get_field(Tag::PhotographicSensitivity, In::PRIMARY)
            .map(|f| f.display_value().to_string())
            .unwrap_or_default(),
    }
}

impl ImageBackend for RustBackend {
    fn decode(&self, path: &Path) -> Result<DynamicImage, BackendError> {
        let reader = BufReader::new(open(path)?);
        ImageReader::new(reader)
            .with_guessed_format()?
            .decode()
            .map_err(|e| BackendError::Decode(format!("{}: {}", path.display(), e)))
    }

    fn read_metadata(&self, path: &Path) -> Result<MetadataRecord, BackendError> {
        let mut reader = BufReader::new(open(path)?);
        match exif::Reader::new().read_from_container(&mut reader) {
            Ok(exif) => Ok(record_from_exif(&exif)),
            Err(exif::Error::NotFound(_)) => {
                log::debug!("No EXIF data found in {}", path.display());
                Ok(MetadataRecord::default())
            }
            Err(exif::Error::Io(e)) => Err(BackendError::Io(e)),
            Err(e) => Err(BackendError::Metadata(format!("{}: {}", path.display(), e))),
        }
    }

    fn encode(&self, image: &RgbImage, quality: Quality) -> Result<Vec<u8>, BackendError> {
        let quality = Quality::new(quality.value());
        let mut bytes = Vec::new();
        let encoder = JpegEncoder::new_with_quality(&mut bytes, quality.value() as u8);
        image
            .write_with_encoder(encoder)
            .map_err(|e| BackendError::Encode(e.to_string()))?;
        Ok(bytes)
    }
}
