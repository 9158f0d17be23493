//! Attendee groups as read from the input document.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::RgbaImage;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One attendee record, passed to the badge design untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attendee(pub Value);

impl Attendee {
    /// Text form of a string or numeric attribute.
    pub fn field(&self, key: &str) -> Option<String> {
        match self.0.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

/// Raw group entry: template reference plus its attendees.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GroupSource {
    pub image: PathBuf,
    #[serde(default)]
    pub attendees: Vec<Attendee>,
}

/// Input document keyed by group name.
pub type InputDocument = BTreeMap<String, GroupSource>;

/// Parse the JSON input document.
pub fn parse_input(raw: &str) -> Result<InputDocument> {
    serde_json::from_str(raw).context("failed to parse attendee document")
}

/// A category of attendees sharing one badge template.
#[derive(Debug, Clone)]
pub struct Group {
    pub name: String,
    pub template: RgbaImage,
    pub attendees: Vec<Attendee>,
}

impl Group {
    pub fn new(name: impl Into<String>, template: RgbaImage, attendees: Vec<Attendee>) -> Self {
        Self {
            name: name.into(),
            template,
            attendees,
        }
    }

    /// Load the template image, resolving relative paths against `base_dir`.
    pub fn load(name: &str, source: GroupSource, base_dir: &Path) -> Result<Self> {
        let path = if source.image.is_absolute() {
            source.image
        } else {
            base_dir.join(&source.image)
        };
        let template = image::open(&path)
            .with_context(|| {
                format!("failed to load template {} for group '{name}'", path.display())
            })?
            .to_rgba8();
        Ok(Self::new(name, template, source.attendees))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn parses_groups_in_name_order() {
        let doc = parse_input(
            r#"{
                "Student": { "image": "student.png", "attendees": [{ "name": "Ada" }] },
                "Speaker": { "image": "speaker.png" }
            }"#,
        )
        .unwrap();
        let names: Vec<&str> = doc.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["Speaker", "Student"]);
        assert!(doc["Speaker"].attendees.is_empty());
        assert_eq!(doc["Student"].image, PathBuf::from("student.png"));
    }

    #[test]
    fn rejects_malformed_input() {
        assert!(parse_input("[1, 2]").is_err());
        assert!(parse_input(r#"{ "Student": { "attendees": [] } }"#).is_err());
    }

    #[test]
    fn reads_text_fields() {
        let attendee = Attendee(json!({ "name": "Ada", "badge": 42, "vip": true }));
        assert_eq!(attendee.field("name").as_deref(), Some("Ada"));
        assert_eq!(attendee.field("badge").as_deref(), Some("42"));
        assert_eq!(attendee.field("vip"), None);
        assert_eq!(attendee.field("missing"), None);
    }

    #[test]
    fn missing_template_is_an_error() {
        let source = GroupSource {
            image: PathBuf::from("does-not-exist.png"),
            attendees: Vec::new(),
        };
        let err = Group::load("Student", source, Path::new("/nonexistent")).unwrap_err();
        assert!(format!("{err:#}").contains("Student"));
    }
}
