use std::collections::BTreeMap;

use anyhow::Result;
use image::{Rgba, RgbaImage};
use log::debug;

use crate::badge::BadgeDesign;
use crate::config::{ConfigError, DesignConfig, parse_color};
use crate::graphics::{BadgeFont, TextMeasure, TextUtils};
use crate::model::Attendee;

/// Describes a built-in badge design.
#[derive(Debug, Clone)]
pub struct DesignInfo {
    pub name: &'static str,
    pub description: &'static str,
    /// Configuration keys the design reads, beyond the page-wide ones.
    pub settings: &'static [DesignSetting],
}

/// One configuration key consumed by a design.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DesignSetting {
    pub key: &'static str,
    pub required: bool,
    pub help: &'static str,
}

macro_rules! setting {
    ($key:expr, $required:expr, $help:expr) => {
        DesignSetting {
            key: $key,
            required: $required,
            help: $help,
        }
    };
}

/// Registry of built-in designs recognised by the configuration loader.
pub struct DesignRegistry;

impl DesignRegistry {
    /// Return the set of available designs.
    pub fn list() -> Vec<&'static DesignInfo> {
        vec![&FIELDS, &BLANK]
    }

    /// Resolve a design by name (case-insensitive).
    pub fn get(name: &str) -> Result<&'static DesignInfo, ConfigError> {
        Self::list()
            .into_iter()
            .find(|info| info.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| ConfigError::UnknownDesign(name.to_string()))
    }

    /// Instantiate the design named by `config`, loading any fonts it uses.
    pub fn build(config: &DesignConfig) -> Result<Box<dyn BadgeDesign>> {
        let info = Self::get(&config.design)?;
        match info.name {
            "fields" => Ok(Box::new(FieldsDesign::from_config(config)?)),
            _ => Ok(Box::new(BlankDesign)),
        }
    }
}

static FIELDS_SETTINGS: &[DesignSetting] = &[
    setting!("fonts.<name>.path", true, "font file, relative to the config file"),
    setting!("fonts.<name>.size", true, "font size in pixels"),
    setting!("fields[].key", true, "attendee attribute to print"),
    setting!("fields[].font", true, "name of an entry in `fonts`"),
    setting!("fields[].x", true, "left edge of the text block"),
    setting!("fields[].y", true, "bottom of the text block; text grows upward"),
    setting!("fields[].max_width", true, "wrapping width in pixels"),
    setting!("fields[].color", false, "#rrggbb or #rrggbbaa, default #000000"),
    setting!("fields[].line_spacing", false, "pixels between lines, default 8"),
    setting!("fields[].uppercase", false, "print the value in capitals"),
];

static FIELDS: DesignInfo = DesignInfo {
    name: "fields",
    description: "Draws configured attendee attributes as wrapped text on the template.",
    settings: FIELDS_SETTINGS,
};

static BLANK: DesignInfo = DesignInfo {
    name: "blank",
    description: "Prints the bare template for every badge.",
    settings: &[],
};

/// Template passed through unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlankDesign;

impl BadgeDesign for BlankDesign {
    fn name(&self) -> &str {
        BLANK.name
    }

    fn draw(
        &self,
        template: &RgbaImage,
        _attendee: Option<&Attendee>,
        _utils: &TextUtils,
    ) -> Result<RgbaImage> {
        Ok(template.clone())
    }
}

/// One attendee attribute placed on the badge.
#[derive(Debug, Clone, PartialEq)]
pub struct TextField {
    pub key: String,
    pub font: String,
    /// Bottom-left of the text block.
    pub anchor: (i32, i32),
    pub max_width: u32,
    pub color: Rgba<u8>,
    pub line_spacing: i32,
    pub uppercase: bool,
}

/// Data-driven design drawing a list of text fields.
#[derive(Debug)]
pub struct FieldsDesign<F = BadgeFont> {
    fonts: BTreeMap<String, F>,
    fields: Vec<TextField>,
}

impl FieldsDesign<BadgeFont> {
    pub fn from_config(config: &DesignConfig) -> Result<Self> {
        let mut fonts = BTreeMap::new();
        for (name, spec) in &config.fonts {
            let font = BadgeFont::load(&config.resolve(&spec.path), spec.size)?;
            fonts.insert(name.clone(), font);
        }
        let fields = config
            .fields
            .iter()
            .map(|spec| {
                Ok(TextField {
                    key: spec.key.clone(),
                    font: spec.font.clone(),
                    anchor: (spec.x, spec.y),
                    max_width: spec.max_width,
                    color: parse_color(&spec.color)?,
                    line_spacing: spec.line_spacing,
                    uppercase: spec.uppercase,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;
        Self::new(fonts, fields).map_err(Into::into)
    }
}

impl<F: TextMeasure> FieldsDesign<F> {
    pub fn new(fonts: BTreeMap<String, F>, fields: Vec<TextField>) -> Result<Self, ConfigError> {
        if let Some(field) = fields.iter().find(|f| !fonts.contains_key(&f.font)) {
            return Err(ConfigError::UnknownFont {
                field: field.key.clone(),
                font: field.font.clone(),
            });
        }
        Ok(Self { fonts, fields })
    }
}

impl<F: TextMeasure> BadgeDesign for FieldsDesign<F> {
    fn name(&self) -> &str {
        FIELDS.name
    }

    fn draw(
        &self,
        template: &RgbaImage,
        attendee: Option<&Attendee>,
        utils: &TextUtils,
    ) -> Result<RgbaImage> {
        let mut badge = template.clone();
        let Some(attendee) = attendee else {
            return Ok(badge);
        };
        for field in &self.fields {
            let Some(mut text) = attendee.field(&field.key) else {
                debug!("attendee has no text for '{}', skipping", field.key);
                continue;
            };
            if field.uppercase {
                text = text.to_uppercase();
            }
            let font = &self.fonts[&field.font];
            utils.with_line_spacing(field.line_spacing).draw_info(
                &mut badge,
                field.max_width,
                &text,
                field.anchor,
                font,
                field.color,
            );
        }
        Ok(badge)
    }
}
