//! Configuration file support.
//!
//! An optional `exif-frame.toml` supplies defaults for a batch. It is looked up
//! in the input directory, or passed explicitly with `--config`. Command-line
//! flags override it; built-in defaults fill whatever neither sets.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [layout]
//! line_height = 60          # Height of one caption line in pixels
//! border = "bottom"         # "bottom" (caption strip) or "all" (full frame)
//!
//! [output]
//! quality = 100             # JPEG quality (1-100)
//! subfolder = "images with exif"  # Output folder inside the input directory
//!
//! [processing]
//! max_processes = 4         # Max parallel workers (omit for auto = CPU cores)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::{BorderStyle, DEFAULT_LINE_HEIGHT, DEFAULT_QUALITY, LayoutOptions, Quality};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// File name looked up in the input directory.
pub const CONFIG_FILE_NAME: &str = "exif-frame.toml";

/// Output folder created inside the input directory when `--output` is absent.
pub const DEFAULT_SUBFOLDER: &str = "images with exif";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Batch configuration loaded from `exif-frame.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FrameConfig {
    pub layout: LayoutConfig,
    pub output: OutputConfig,
    pub processing: ProcessingConfig,
}

/// Caption layout settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutConfig {
    pub line_height: u32,
    pub border: BorderStyle,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            line_height: DEFAULT_LINE_HEIGHT,
            border: BorderStyle::default(),
        }
    }
}

/// Output encoding and placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// JPEG quality (1 = worst, 100 = best).
    pub quality: u32,
    /// Folder name inside the input directory.
    pub subfolder: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            quality: DEFAULT_QUALITY,
            subfolder: DEFAULT_SUBFOLDER.to_string(),
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

impl FrameConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.layout.line_height == 0 {
            return Err(ConfigError::Validation(
                "layout.line_height must be positive".into(),
            ));
        }
        if !(1..=100).contains(&self.output.quality) {
            return Err(ConfigError::Validation(
                "output.quality must be 1-100".into(),
            ));
        }
        if self.output.subfolder.trim().is_empty() {
            return Err(ConfigError::Validation(
                "output.subfolder must not be empty".into(),
            ));
        }
        if self.processing.max_processes == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_processes must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Layout options described by this config.
    pub fn layout_options(&self) -> LayoutOptions {
        LayoutOptions {
            line_height: self.layout.line_height,
            border_style: self.layout.border,
            quality: Quality::new(self.output.quality),
        }
    }
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_processes.map(|n| n.min(cores)).unwrap_or(cores)
}

/// Load and validate a config file.
pub fn load_config(path: &Path) -> Result<FrameConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: FrameConfig = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

/// Load `exif-frame.toml` from `dir` if present, otherwise return defaults.
pub fn load_config_in(dir: &Path) -> Result<FrameConfig, ConfigError> {
    let path = dir.join(CONFIG_FILE_NAME);
    if path.is_file() {
        log::debug!("Loading config from {}", path.display());
        load_config(&path)
    } else {
        Ok(FrameConfig::default())
    }
}

/// A documented config file with every option at its default.
pub fn stock_config_toml() -> &'static str {
    r#"# exif-frame configuration
# Place this file as exif-frame.toml in the input directory, or pass it
# with --config. Command-line flags override these values.

[layout]
# Height of one caption line in pixels. The frame (border = "all") and the
# bottom margin scale with it.
line_height = 60
# "bottom": caption strip below the photo only.
# "all":    uniform frame around the photo plus the caption strip.
border = "bottom"

[output]
# JPEG quality, 1 (smallest) to 100 (best).
quality = 100
# Output folder created inside the input directory when --output is not given.
subfolder = "images with exif"

[processing]
# Maximum parallel workers. Omit to use all CPU cores.
# max_processes = 4
"#
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_is_valid() {
        FrameConfig::default().validate().unwrap();
    }

    #[test]
    fn stock_config_parses_to_defaults() {
        let config: FrameConfig = toml::from_str(stock_config_toml()).unwrap();
        assert_eq!(config, FrameConfig::default());
    }

    #[test]
    fn partial_config_keeps_other_defaults() {
        let config: FrameConfig = toml::from_str(
            r#"
            [layout]
            border = "all"
            "#,
        )
        .unwrap();
        assert_eq!(config.layout.border, BorderStyle::All);
        assert_eq!(config.layout.line_height, 60);
        assert_eq!(config.output.quality, 100);
        assert_eq!(config.output.subfolder, "images with exif");
    }

    #[test]
    fn unknown_keys_rejected() {
        let result: Result<FrameConfig, _> = toml::from_str(
            r#"
            [layout]
            line_hieght = 40
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn unknown_border_rejected() {
        let result: Result<FrameConfig, _> = toml::from_str(
            r#"
            [layout]
            border = "left"
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn validation_rejects_bad_values() {
        let mut config = FrameConfig::default();
        config.layout.line_height = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));

        let mut config = FrameConfig::default();
        config.output.quality = 0;
        assert!(config.validate().is_err());
        config.output.quality = 101;
        assert!(config.validate().is_err());

        let mut config = FrameConfig::default();
        config.output.subfolder = "  ".into();
        assert!(config.validate().is_err());

        let mut config = FrameConfig::default();
        config.processing.max_processes = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn layout_options_from_config() {
        let mut config = FrameConfig::default();
        config.layout.line_height = 80;
        config.layout.border = BorderStyle::All;
        config.output.quality = 75;

        let options = config.layout_options();
        assert_eq!(options.line_height, 80);
        assert_eq!(options.border_style, BorderStyle::All);
        assert_eq!(options.quality.value(), 75);
    }

    #[test]
    fn load_config_in_missing_file_gives_defaults() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(load_config_in(tmp.path()).unwrap(), FrameConfig::default());
    }

    #[test]
    fn load_config_in_reads_file() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(
            tmp.path().join(CONFIG_FILE_NAME),
            "[output]\nquality = 85\n",
        )
        .unwrap();
        assert_eq!(load_config_in(tmp.path()).unwrap().output.quality, 85);
    }

    #[test]
    fn load_config_validates() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("custom.toml");
        std::fs::write(&path, "[layout]\nline_height = 0\n").unwrap();
        assert!(matches!(
            load_config(&path),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn effective_threads_caps_at_cores() {
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        assert_eq!(effective_threads(&ProcessingConfig::default()), cores);
        assert_eq!(
            effective_threads(&ProcessingConfig {
                max_processes: Some(cores + 10)
            }),
            cores
        );
        assert_eq!(
            effective_threads(&ProcessingConfig {
                max_processes: Some(1)
            }),
            1
        );
    }
}
