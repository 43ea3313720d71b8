//! End-to-end batch runs over a temporary photo directory.
//!
//! Source JPEGs are synthesized with `image` and given a real EXIF block
//! written by `kamadak-exif`, so the full read → caption → render → encode
//! path runs exactly as it does from the CLI.

use exif::experimental::Writer;
use exif::{Field, In, Rational, Tag, Value};
use exif_frame::config::CONFIG_FILE_NAME;
use exif_frame::imaging::BorderStyle;
use exif_frame::process::{self, Overrides, ProcessError, ProcessEvent, RunConfig};
use image::{GenericImageView, ImageEncoder, Rgb, RgbImage};
use std::fs;
use std::io::Cursor;
use std::path::Path;
use std::sync::mpsc;
use tempfile::TempDir;

fn ascii(tag: Tag, text: &str) -> Field {
    Field {
        tag,
        ifd_num: In::PRIMARY,
        value: Value::Ascii(vec![text.as_bytes().to_vec()]),
    }
}

fn rational(tag: Tag, num: u32, denom: u32) -> Field {
    Field {
        tag,
        ifd_num: In::PRIMARY,
        value: Value::Rational(vec![Rational { num, denom }]),
    }
}

/// TIFF-structured EXIF payload describing a typical camera shot.
fn exif_payload() -> Vec<u8> {
    let fields = [
        ascii(Tag::ImageDescription, "Harbour at dusk"),
        ascii(Tag::Model, "Test Camera"),
        ascii(Tag::LensModel, "50mm Prime"),
        ascii(Tag::DateTimeOriginal, "2024:06:01 19:42:10"),
        rational(Tag::FNumber, 28, 10),
        rational(Tag::ExposureTime, 1, 250),
        rational(Tag::FocalLength, 50, 1),
        Field {
            tag: Tag::PhotographicSensitivity,
            ifd_num: In::PRIMARY,
            value: Value::Short(vec![100]),
        },
    ];
    let mut writer = Writer::new();
    for field in &fields {
        writer.push_field(field);
    }
    let mut tiff = Cursor::new(Vec::new());
    writer.write(&mut tiff, false).unwrap();
    tiff.into_inner()
}

/// Encode a solid JPEG and splice an APP1 `Exif` segment in after SOI.
fn write_jpeg_with_exif(path: &Path, width: u32, height: u32) {
    let img = RgbImage::from_pixel(width, height, Rgb([90, 140, 60]));
    let mut jpeg = Vec::new();
    image::codecs::jpeg::JpegEncoder::new(&mut jpeg)
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .unwrap();

    let tiff = exif_payload();
    let segment_len = u16::try_from(2 + 6 + tiff.len()).unwrap();
    let mut out = Vec::with_capacity(jpeg.len() + tiff.len() + 10);
    out.extend_from_slice(&jpeg[..2]);
    out.extend_from_slice(&[0xFF, 0xE1]);
    out.extend_from_slice(&segment_len.to_be_bytes());
    out.extend_from_slice(b"Exif\0\0");
    out.extend_from_slice(&tiff);
    out.extend_from_slice(&jpeg[2..]);
    fs::write(path, out).unwrap();
}

fn annotated_lines(events: &[ProcessEvent], name: &str) -> Vec<String> {
    events
        .iter()
        .find_map(|e| match e {
            ProcessEvent::Annotated { file, lines, .. } if file == name => Some(lines.clone()),
            _ => None,
        })
        .unwrap_or_else(|| panic!("no Annotated event for {name}"))
}

#[test]
fn bottom_strip_with_full_caption() {
    let tmp = TempDir::new().unwrap();
    let source = tmp.path().join("harbour.jpg");
    write_jpeg_with_exif(&source, 200, 200);
    let original = fs::read(&source).unwrap();

    let overrides = Overrides {
        line_height: Some(40),
        quality: Some(90),
        ..Default::default()
    };
    let config = RunConfig::resolve(tmp.path(), &overrides).unwrap();
    let (tx, rx) = mpsc::channel();
    let summary = process::run(&config, Some(tx)).unwrap();
    let events: Vec<ProcessEvent> = rx.iter().collect();

    assert_eq!(summary.processed, 1);
    assert_eq!(summary.failed, 0);

    let lines = annotated_lines(&events, "harbour.jpg");
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "Harbour at dusk");
    assert_eq!(lines[1], "2024-06-01 19:42:10 | Test Camera | 50mm Prime");
    assert!(lines[2].ends_with("| ISO 100"), "technical line: {}", lines[2]);

    let output = tmp.path().join("images with exif/processed_harbour.jpg");
    let written = image::open(&output).unwrap();
    assert_eq!(written.dimensions(), (200, 345));

    // Caption strip is black with white text somewhere in it
    let strip = written.to_rgb8();
    let bright = (200..345)
        .flat_map(|y| (0..200).map(move |x| (x, y)))
        .filter(|&(x, y)| strip.get_pixel(x, y).0.iter().all(|&c| c > 200))
        .count();
    assert!(bright > 0);

    assert_eq!(fs::read(&source).unwrap(), original);
}

#[test]
fn config_file_selects_full_frame() {
    let tmp = TempDir::new().unwrap();
    write_jpeg_with_exif(&tmp.path().join("a.jpg"), 300, 200);
    fs::write(
        tmp.path().join(CONFIG_FILE_NAME),
        "[layout]\nline_height = 50\nborder = \"all\"\n\n[output]\nsubfolder = \"framed\"\n",
    )
    .unwrap();

    let config = RunConfig::resolve(tmp.path(), &Overrides::default()).unwrap();
    assert_eq!(config.layout.border_style, BorderStyle::All);

    let summary = process::run(&config, None).unwrap();
    assert_eq!(summary.output_dir, tmp.path().join("framed"));

    let written = image::open(tmp.path().join("framed/processed_a.jpg")).unwrap();
    assert_eq!(written.dimensions(), (400, 456));

    // Top-left corner lies in the frame
    let px = written.to_rgb8().get_pixel(5, 5).0;
    assert!(px.iter().all(|&c| c < 40), "frame pixel {px:?}");
}

#[test]
fn explicit_output_dir_is_created() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("in");
    fs::create_dir(&input).unwrap();
    write_jpeg_with_exif(&input.join("x.JPG"), 120, 90);
    let out = tmp.path().join("nested/out");

    let overrides = Overrides {
        output_dir: Some(out.clone()),
        ..Default::default()
    };
    let config = RunConfig::resolve(&input, &overrides).unwrap();
    let summary = process::run(&config, None).unwrap();

    assert_eq!(summary.processed, 1);
    assert!(out.join("processed_x.JPG").is_file());
    assert!(!input.join("images with exif").exists());
}

#[test]
fn rerun_overwrites_previous_output() {
    let tmp = TempDir::new().unwrap();
    write_jpeg_with_exif(&tmp.path().join("a.jpg"), 100, 100);
    let config = RunConfig::resolve(tmp.path(), &Overrides::default()).unwrap();

    process::run(&config, None).unwrap();
    let first = fs::read(config.output_dir.join("processed_a.jpg")).unwrap();
    let summary = process::run(&config, None).unwrap();
    let second = fs::read(config.output_dir.join("processed_a.jpg")).unwrap();

    assert_eq!(summary.processed, 1);
    assert_eq!(first, second);
}

#[test]
fn directory_without_jpegs() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("notes.txt"), "hello").unwrap();
    let config = RunConfig::resolve(tmp.path(), &Overrides::default()).unwrap();

    assert!(matches!(
        process::run(&config, None),
        Err(ProcessError::NoImages(_))
    ));
}
