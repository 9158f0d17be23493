//! Run-wide page geometry and the typed design configuration.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use image::Rgba;
use serde::Deserialize;
use thiserror::Error;

use crate::designs::DesignRegistry;

/// Conversion factor used for every mm measurement of a run.
pub const MM_TO_INCH: f64 = 0.03937;
pub const DEFAULT_PAGE_SIZE: &str = "490x318";
pub const DEFAULT_DPI: u32 = 300;
pub const DEFAULT_MARGIN_MM: f64 = 10.0;
pub const DEFAULT_LINE_SPACING: i32 = 8;
/// Upper bound for percentage filler specs (ten filler pages per data page).
pub const MAX_FILLER_PERCENT: f64 = 1000.0;

/// Validation failures for user-provided settings.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("page size must be A3, A4 or WIDTHxHEIGHT in mm, got '{0}'")]
    PageSize(String),
    #[error("empty pages must be a count or a percentage up to 1000%, got '{0}'")]
    Filler(String),
    #[error("invalid color '{0}', expected #rrggbb or #rrggbbaa")]
    Color(String),
    #[error("unknown design '{0}'")]
    UnknownDesign(String),
    #[error("field '{field}' references unknown font '{font}'")]
    UnknownFont { field: String, font: String },
    #[error("resize factor must be a positive number, got {0}")]
    Resize(f64),
    #[error("badges per page must be at least 1")]
    PerPage,
    #[error("dpi must be at least 1")]
    Dpi,
}

/// Physical page size in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSpec {
    pub width_mm: u32,
    pub height_mm: u32,
}

impl PageSpec {
    pub const A3: PageSpec = PageSpec {
        width_mm: 420,
        height_mm: 297,
    };
    pub const A4: PageSpec = PageSpec {
        width_mm: 297,
        height_mm: 210,
    };

    /// Parse a preset name (`A3`, `A4`) or a `WIDTHxHEIGHT` pair in mm.
    pub fn parse(input: &str) -> Result<Self, ConfigError> {
        let trimmed = input.trim();
        if trimmed.eq_ignore_ascii_case("a3") {
            return Ok(Self::A3);
        }
        if trimmed.eq_ignore_ascii_case("a4") {
            return Ok(Self::A4);
        }
        let err = || ConfigError::PageSize(input.to_string());
        let (w, h) = trimmed.split_once(['x', 'X']).ok_or_else(err)?;
        let width_mm: u32 = w.trim().parse().map_err(|_| err())?;
        let height_mm: u32 = h.trim().parse().map_err(|_| err())?;
        if width_mm == 0 || height_mm == 0 {
            return Err(err());
        }
        Ok(Self {
            width_mm,
            height_mm,
        })
    }
}

impl FromStr for PageSpec {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for PageSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width_mm, self.height_mm)
    }
}

/// Page dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSize {
    pub width: u32,
    pub height: u32,
}

/// Immutable geometry shared by every component of a run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderConfig {
    pub page: PageSize,
    /// Uniform inset applied to all four edges, in pixels.
    pub margin: u32,
    /// Bleed allowance in pixels. Carried for spacing work, not applied yet.
    pub waste: f64,
    pub dpi: u32,
}

impl RenderConfig {
    pub fn new(
        page: PageSpec,
        dpi: u32,
        margin_mm: f64,
        waste_mm: f64,
    ) -> Result<Self, ConfigError> {
        if dpi == 0 {
            return Err(ConfigError::Dpi);
        }
        Ok(Self {
            page: PageSize {
                width: mm_to_px(f64::from(page.width_mm), dpi) as u32,
                height: mm_to_px(f64::from(page.height_mm), dpi) as u32,
            },
            margin: mm_to_px(margin_mm.max(0.0), dpi) as u32,
            waste: mm_to_px(waste_mm, dpi),
            dpi,
        })
    }

    /// Width and height left once the margin is removed from both sides.
    pub fn printable_area(&self) -> (u32, u32) {
        (
            self.page.width.saturating_sub(self.margin.saturating_mul(2)),
            self.page.height.saturating_sub(self.margin.saturating_mul(2)),
        )
    }
}

/// Convert millimetres to (fractional) pixels at the given resolution.
pub fn mm_to_px(mm: f64, dpi: u32) -> f64 {
    mm * MM_TO_INCH * f64::from(dpi)
}

/// How many blank filler pages to append after a group's data pages.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FillerSpec {
    Count(u32),
    Percent(f64),
}

impl Default for FillerSpec {
    fn default() -> Self {
        FillerSpec::Count(0)
    }
}

impl FillerSpec {
    /// Parse either a literal page count (`3`) or a share of data pages (`50%`).
    pub fn parse(input: &str) -> Result<Self, ConfigError> {
        let trimmed = input.trim();
        let err = || ConfigError::Filler(input.to_string());
        if let Some(percent) = trimmed.strip_suffix('%') {
            let value: f64 = percent.trim().parse().map_err(|_| err())?;
            if !value.is_finite() || !(0.0..=MAX_FILLER_PERCENT).contains(&value) {
                return Err(err());
            }
            return Ok(FillerSpec::Percent(value));
        }
        trimmed.parse().map(FillerSpec::Count).map_err(|_| err())
    }

    /// Number of filler pages for a group that produced `data_pages` pages.
    pub fn count(&self, data_pages: usize) -> usize {
        match *self {
            FillerSpec::Count(n) => n as usize,
            FillerSpec::Percent(p) => (data_pages as f64 * p / 100.0).ceil() as usize,
        }
    }
}

impl FromStr for FillerSpec {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Horizontal placement of each row of badges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Left,
    Center,
}

/// A font face referenced by name from text fields.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FontSpec {
    pub path: PathBuf,
    pub size: f32,
}

/// A single attendee attribute drawn onto the badge.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FieldSpec {
    /// Key looked up in the attendee record.
    pub key: String,
    pub font: String,
    pub x: i32,
    /// Bottom of the text block; text grows upward from here.
    pub y: i32,
    pub max_width: u32,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default = "default_line_spacing")]
    pub line_spacing: i32,
    #[serde(default)]
    pub uppercase: bool,
}

fn default_color() -> String {
    "#000000".to_string()
}

fn default_line_spacing() -> i32 {
    DEFAULT_LINE_SPACING
}

fn default_margin() -> f64 {
    DEFAULT_MARGIN_MM
}

/// Badge design configuration loaded from a JSON file.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DesignConfig {
    pub design: String,
    /// Bleed allowance in mm.
    #[serde(default)]
    pub waste: f64,
    /// Page margin in mm.
    #[serde(default = "default_margin")]
    pub page_margin: f64,
    #[serde(default)]
    pub fonts: BTreeMap<String, FontSpec>,
    #[serde(default)]
    pub fields: Vec<FieldSpec>,
    #[serde(skip)]
    base_dir: PathBuf,
}

impl DesignConfig {
    /// Read and validate a configuration file. Relative paths inside it
    /// resolve against the file's own directory.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read design config {}", path.display()))?;
        let mut config = Self::from_json(&raw)
            .with_context(|| format!("invalid design config {}", path.display()))?;
        config.base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Ok(config)
    }

    /// Parse and validate configuration text; relative paths resolve against
    /// the current directory.
    pub fn from_json(raw: &str) -> Result<Self> {
        let config: DesignConfig = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Check design name, font references and colors.
    pub fn validate(&self) -> Result<(), ConfigError> {
        DesignRegistry::get(&self.design)?;
        for field in &self.fields {
            if !self.fonts.contains_key(&field.font) {
                return Err(ConfigError::UnknownFont {
                    field: field.key.clone(),
                    font: field.font.clone(),
                });
            }
            parse_color(&field.color)?;
        }
        Ok(())
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Resolve a path from the configuration against its base directory.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }
}

/// Parse `#rrggbb` or `#rrggbbaa` into an RGBA color.
pub fn parse_color(input: &str) -> Result<Rgba<u8>, ConfigError> {
    let err = || ConfigError::Color(input.to_string());
    let hex = input.trim().strip_prefix('#').ok_or_else(err)?;
    if !(hex.len() == 6 || hex.len() == 8) || !hex.is_ascii() {
        return Err(err());
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| err());
    let alpha = if hex.len() == 8 { channel(6)? } else { 0xff };
    Ok(Rgba([channel(0)?, channel(2)?, channel(4)?, alpha]))
}
