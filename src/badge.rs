//! Per-attendee badge rendering.

use std::path::Path;

use anyhow::Result;
use image::RgbaImage;
use image::imageops::{self, FilterType};

use crate::graphics::TextUtils;
use crate::model::{Attendee, Group, InputDocument};

/// A badge layout: turns the raw input into groups and draws one badge.
pub trait BadgeDesign {
    fn name(&self) -> &str;

    /// Build groups from the input document. Relative template paths
    /// resolve against `base_dir`.
    fn groups(&self, input: InputDocument, base_dir: &Path) -> Result<Vec<Group>> {
        input
            .into_iter()
            .map(|(name, source)| Group::load(&name, source, base_dir))
            .collect()
    }

    /// Draw a badge on a copy of `template`. `None` asks for a blank badge.
    fn draw(
        &self,
        template: &RgbaImage,
        attendee: Option<&Attendee>,
        utils: &TextUtils,
    ) -> Result<RgbaImage>;
}

/// Render one badge and optionally scale it by `resize`.
pub fn render_badge(
    design: &dyn BadgeDesign,
    template: &RgbaImage,
    attendee: Option<&Attendee>,
    utils: &TextUtils,
    resize: Option<f64>,
) -> Result<RgbaImage> {
    let badge = design.draw(template, attendee, utils)?;
    Ok(match resize {
        Some(factor) => scale(&badge, factor),
        None => badge,
    })
}

fn scale(badge: &RgbaImage, factor: f64) -> RgbaImage {
    let width = (f64::from(badge.width()) * factor).round().max(1.0) as u32;
    let height = (f64::from(badge.height()) * factor).round().max(1.0) as u32;
    imageops::resize(badge, width, height, FilterType::Lanczos3)
}
