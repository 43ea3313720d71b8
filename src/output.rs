//! CLI output formatting for batch runs.
//!
//! # Output Format
//!
//! ```text
//! Annotating 3 photos
//!     Source: trip/
//!     Output: trip/images with exif/
//! IMG_0001.jpg → processed_IMG_0001.jpg (6000×4400)
//!     Sunset over the bay
//!     2024-06-01 19:42:10 | Canon EOS R5 | RF24-70mm F2.8 L IS USM
//!     35 mm | f/8 | 1/250 s | ISO 100
//! IMG_0002.jpg → failed
//!     Error: Decode failed: ...
//!
//! Annotated 1 photo, 1 failed → trip/images with exif/
//! ```
//!
//! Per-file entries arrive in completion order since workers run in parallel.
//!
//! # Architecture
//!
//! Each output has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.

use crate::process::{OUTPUT_PREFIX, ProcessEvent, ProcessSummary};

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// `1 photo`, `2 photos`.
fn photos(n: usize) -> String {
    if n == 1 {
        "1 photo".to_string()
    } else {
        format!("{n} photos")
    }
}

/// Format one progress event from the batch driver.
pub fn format_process_event(event: &ProcessEvent) -> Vec<String> {
    match event {
        ProcessEvent::Started {
            input_dir,
            output_dir,
            image_count,
        } => vec![
            format!("Annotating {}", photos(*image_count)),
            format!("{}Source: {}/", indent(1), input_dir.display()),
            format!("{}Output: {}/", indent(1), output_dir.display()),
        ],
        ProcessEvent::Annotated {
            file,
            lines,
            width,
            height,
        } => {
            let mut out = vec![format!(
                "{} → {}{} ({}×{})",
                file, OUTPUT_PREFIX, file, width, height
            )];
            out.extend(lines.iter().map(|l| format!("{}{}", indent(1), l)));
            out
        }
        ProcessEvent::Failed { file, error } => vec![
            format!("{} → failed", file),
            format!("{}Error: {}", indent(1), error),
        ],
    }
}

/// Format the closing summary of a batch.
pub fn format_summary(summary: &ProcessSummary) -> Vec<String> {
    let counts = if summary.failed == 0 {
        format!("Annotated {}", photos(summary.processed))
    } else {
        format!(
            "Annotated {}, {} failed",
            photos(summary.processed),
            summary.failed
        )
    };
    vec![
        String::new(),
        format!("{} → {}/", counts, summary.output_dir.display()),
    ]
}

pub fn print_process_event(event: &ProcessEvent) {
    for line in format_process_event(event) {
        println!("{}", line);
    }
}

pub fn print_summary(summary: &ProcessSummary) {
    for line in format_summary(summary) {
        println!("{}", line);
    }
}
