use std::fs;
use std::path::Path;

use ab_glyph::{FontVec, PxScale};
use anyhow::{Context, Result};
use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_text_mut, text_size};

use crate::config::DEFAULT_LINE_SPACING;

/// Measures and draws single lines of text.
pub trait TextMeasure {
    /// Pixel width and height of `text` rendered on one line.
    fn text_size(&self, text: &str) -> (u32, u32);
    /// Draw `text` with its top-left corner at `(x, y)`.
    fn draw(&self, image: &mut RgbaImage, x: i32, y: i32, color: Rgba<u8>, text: &str);
}

/// A TrueType/OpenType face at a fixed pixel size.
pub struct BadgeFont {
    font: FontVec,
    scale: PxScale,
}

impl BadgeFont {
    pub fn load(path: &Path, size: f32) -> Result<Self> {
        let bytes =
            fs::read(path).with_context(|| format!("failed to read font {}", path.display()))?;
        Self::from_bytes(bytes, size).with_context(|| format!("invalid font {}", path.display()))
    }

    pub fn from_bytes(bytes: Vec<u8>, size: f32) -> Result<Self> {
        let font = FontVec::try_from_vec(bytes)?;
        Ok(Self {
            font,
            scale: PxScale::from(size),
        })
    }
}

impl std::fmt::Debug for BadgeFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BadgeFont")
            .field("scale", &self.scale)
            .finish_non_exhaustive()
    }
}

impl TextMeasure for BadgeFont {
    fn text_size(&self, text: &str) -> (u32, u32) {
        text_size(self.scale, &self.font, text)
    }

    fn draw(&self, image: &mut RgbaImage, x: i32, y: i32, color: Rgba<u8>, text: &str) {
        draw_text_mut(image, color, x, y, self.scale, &self.font, text);
    }
}

/// Break `text` into lines no wider than `max_width`.
///
/// Words are separated by single spaces and packed greedily. A line holding
/// one word wider than the box loses trailing characters until it fits; a
/// lone character that still overflows is kept as is.
pub fn wrap_text<F: TextMeasure + ?Sized>(font: &F, text: &str, max_width: u32) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    for word in text.split(' ').map(str::trim).filter(|w| !w.is_empty()) {
        if let Some(line) = lines.last_mut() {
            let candidate = format!("{line} {word}");
            if font.text_size(&candidate).0 <= max_width {
                *line = candidate;
                continue;
            }
        }
        lines.push(word.to_string());
    }

    for line in &mut lines {
        while font.text_size(line).0 > max_width && line.chars().nth(1).is_some() {
            line.pop();
        }
    }
    lines
}

/// Draw wrapped text whose block sits on `anchor`.
///
/// The first line starts `height(text)` above the anchor, measured on the
/// unwrapped string, and every following line moves down by its own height
/// plus `line_spacing`.
pub fn draw_info<F: TextMeasure + ?Sized>(
    image: &mut RgbaImage,
    max_width: u32,
    text: &str,
    anchor: (i32, i32),
    font: &F,
    color: Rgba<u8>,
    line_spacing: i32,
) {
    let (x, anchor_y) = anchor;
    let mut y = anchor_y - font.text_size(text).1 as i32;
    for line in wrap_text(font, text, max_width) {
        font.draw(image, x, y, color, &line);
        y += font.text_size(&line).1 as i32 + line_spacing;
    }
}

/// Text helpers handed to badge designs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextUtils {
    line_spacing: i32,
}

impl Default for TextUtils {
    fn default() -> Self {
        Self {
            line_spacing: DEFAULT_LINE_SPACING,
        }
    }
}

impl TextUtils {
    pub fn with_line_spacing(self, line_spacing: i32) -> Self {
        Self { line_spacing }
    }

    pub fn line_spacing(&self) -> i32 {
        self.line_spacing
    }

    pub fn wrap_text<F: TextMeasure + ?Sized>(
        &self,
        font: &F,
        text: &str,
        max_width: u32,
    ) -> Vec<String> {
        wrap_text(font, text, max_width)
    }

    pub fn draw_info<F: TextMeasure + ?Sized>(
        &self,
        image: &mut RgbaImage,
        max_width: u32,
        text: &str,
        anchor: (i32, i32),
        font: &F,
        color: Rgba<u8>,
    ) {
        draw_info(image, max_width, text, anchor, font, color, self.line_spacing);
    }
}
